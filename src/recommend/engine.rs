//! Recommendation scoring and ranking

use super::detector::DetectorRegistry;
use super::error::EngineError;
use super::heuristics::Heuristics;
use super::recommendation::{Opportunity, Recommendation};
use super::scoring::{round_confidence, SeverityThresholds};
use crate::aggregate::AggregateResult;
use crate::ingest::CostRecord;
use rust_decimal::{Decimal, RoundingStrategy};
use std::cmp::Ordering;

/// Runs detectors, classifies severity and ranks the results
///
/// # Examples
///
/// ```
/// use cost_optimizer::aggregate::aggregate;
/// use cost_optimizer::ingest::normalize;
/// use cost_optimizer::recommend::RecommendationEngine;
///
/// let csv = "Service,Region,Cost,Date\nEC2,us-east-1,450,2025-09\nEC2,us-east-1,420,2025-08\n";
/// let records = normalize(csv).unwrap().records;
/// let summary = aggregate(&records);
///
/// let recs = RecommendationEngine::default().recommend(&records, &summary).unwrap();
/// assert_eq!(recs[0].id, 1);
/// assert_eq!(recs[0].title, "EC2 Reserved Capacity");
/// ```
pub struct RecommendationEngine {
    registry: DetectorRegistry,
    thresholds: SeverityThresholds,
    heuristics: Heuristics,
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new(SeverityThresholds::default(), Heuristics::default())
    }
}

impl RecommendationEngine {
    /// Create an engine with the built-in detectors
    pub fn new(thresholds: SeverityThresholds, heuristics: Heuristics) -> Self {
        Self::with_registry(DetectorRegistry::with_builtin(), thresholds, heuristics)
    }

    /// Create an engine over a custom detector registry
    pub fn with_registry(
        registry: DetectorRegistry,
        thresholds: SeverityThresholds,
        heuristics: Heuristics,
    ) -> Self {
        Self {
            registry,
            thresholds,
            heuristics,
        }
    }

    /// Detector registry, for registering additional detectors
    pub fn registry(&self) -> &DetectorRegistry {
        &self.registry
    }

    /// Severity thresholds in use
    pub fn thresholds(&self) -> &SeverityThresholds {
        &self.thresholds
    }

    /// Detector heuristics in use
    pub fn heuristics(&self) -> &Heuristics {
        &self.heuristics
    }

    /// Produce ranked recommendations with ids `1..n`
    ///
    /// Deterministic for identical input.
    ///
    /// # Errors
    /// Returns [`EngineError::Consistency`] when `aggregate` was not built
    /// from `records`.
    pub fn recommend(
        &self,
        records: &[CostRecord],
        aggregate: &AggregateResult,
    ) -> Result<Vec<Recommendation>, EngineError> {
        check_consistency(records, aggregate)?;
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let opportunities = self.registry.run_all(records, aggregate, &self.heuristics);
        let found = opportunities.len();

        let mut scored: Vec<_> = opportunities
            .into_iter()
            .map(bound)
            .filter_map(|opportunity| {
                let severity = self.thresholds.classify(
                    opportunity.confidence,
                    opportunity.estimated_monthly_savings,
                    aggregate.total_cost,
                );
                if severity.is_none() {
                    log::debug!(
                        "Suppressed '{}' (confidence {}, savings {})",
                        opportunity.title,
                        opportunity.confidence,
                        opportunity.estimated_monthly_savings
                    );
                }
                severity.map(|s| (s, opportunity))
            })
            .collect();

        scored.sort_by(|(_, a), (_, b)| rank(a, b));

        let recommendations: Vec<Recommendation> = scored
            .into_iter()
            .zip(1u32..)
            .map(|((severity, opportunity), id)| {
                Recommendation::from_opportunity(id, severity, opportunity)
            })
            .collect();

        log::debug!(
            "Ranked {} recommendations ({} suppressed)",
            recommendations.len(),
            found - recommendations.len()
        );
        Ok(recommendations)
    }
}

fn check_consistency(records: &[CostRecord], aggregate: &AggregateResult) -> Result<(), EngineError> {
    if aggregate.row_count != records.len() {
        return Err(EngineError::Consistency {
            reason: format!(
                "aggregate covers {} rows but {} records were supplied",
                aggregate.row_count,
                records.len()
            ),
        });
    }
    let total: Decimal = records.iter().map(CostRecord::cost).sum();
    if total != aggregate.total_cost {
        return Err(EngineError::Consistency {
            reason: format!(
                "aggregate total {} does not match record total {}",
                aggregate.total_cost, total
            ),
        });
    }
    Ok(())
}

/// Enforce confidence and savings bounds on detector output
fn bound(mut opportunity: Opportunity) -> Opportunity {
    opportunity.confidence = round_confidence(opportunity.confidence);
    opportunity.current_monthly_cost = opportunity.current_monthly_cost.max(Decimal::ZERO);
    opportunity.estimated_monthly_savings = opportunity
        .estimated_monthly_savings
        .clamp(Decimal::ZERO, opportunity.current_monthly_cost);
    opportunity
}

/// Savings as reported, rounded half away from zero to cents
fn reported_savings(opportunity: &Opportunity) -> Decimal {
    opportunity
        .estimated_monthly_savings
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Savings desc, confidence desc, category name asc, title asc
///
/// Savings compare at cent precision so the order matches the rounded report.
fn rank(a: &Opportunity, b: &Opportunity) -> Ordering {
    reported_savings(b)
        .cmp(&reported_savings(a))
        .then_with(|| b.confidence.total_cmp(&a.confidence))
        .then_with(|| a.category.as_str().cmp(b.category.as_str()))
        .then_with(|| a.title.cmp(&b.title))
}
