//! Result boundary for presentation layers

use super::session::AnalysisSession;
use crate::ingest::{Period, RowError};
use crate::recommend::Recommendation;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summary of one analysis, amounts rounded to cents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Total spend
    pub total_cost: Decimal,
    /// Sum of monthly savings across recommendations
    pub total_savings: Decimal,
    /// Savings over total spend, in percent with one decimal
    pub savings_percentage: f64,
    /// Non-blank data rows seen
    pub total_rows: usize,
    /// Rows turned into records
    pub processed_rows: usize,
    /// Rows skipped
    pub skipped_rows: usize,
    /// Spend per service
    pub services: BTreeMap<String, Decimal>,
    /// Spend per billing month
    pub periods: BTreeMap<Period, Decimal>,
    /// Ranked recommendations
    pub recommendations: Vec<Recommendation>,
    /// Why rows were skipped
    pub row_errors: Vec<RowError>,
}

/// Round half away from zero to two decimals
pub fn cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Savings as a percentage of cost, one decimal; 0 when cost is 0
pub fn savings_percentage(savings: Decimal, cost: Decimal) -> f64 {
    if cost.is_zero() {
        return 0.0;
    }
    (savings / cost * Decimal::ONE_HUNDRED)
        .round_dp(1)
        .to_f64()
        .unwrap_or(0.0)
}

fn round_recommendation(rec: &Recommendation) -> Recommendation {
    let mut rounded = rec.clone();
    rounded.current_monthly_cost = cents(rec.current_monthly_cost);
    rounded.estimated_monthly_savings = cents(rec.estimated_monthly_savings);
    rounded.projected_monthly_cost = rounded.current_monthly_cost - rounded.estimated_monthly_savings;
    rounded
}

impl AnalysisReport {
    /// Build the report for a session
    pub fn from_session(session: &AnalysisSession) -> Self {
        let aggregate = &session.aggregate;
        let total_savings: Decimal = session
            .recommendations
            .iter()
            .map(|r| r.estimated_monthly_savings)
            .sum();

        Self {
            total_cost: cents(aggregate.total_cost),
            total_savings: cents(total_savings),
            savings_percentage: savings_percentage(total_savings, aggregate.total_cost),
            total_rows: session.total_rows,
            processed_rows: session.processed_rows(),
            skipped_rows: session.skipped_rows(),
            services: aggregate
                .cost_by_service
                .iter()
                .map(|(name, cost)| (name.clone(), cents(*cost)))
                .collect(),
            periods: aggregate
                .cost_by_period
                .iter()
                .map(|(period, cost)| (*period, cents(*cost)))
                .collect(),
            recommendations: session.recommendations.iter().map(round_recommendation).collect(),
            row_errors: session.row_errors.clone(),
        }
    }

    /// Annualized savings
    pub fn total_annual_savings(&self) -> Decimal {
        self.total_savings * Decimal::from(12)
    }
}
