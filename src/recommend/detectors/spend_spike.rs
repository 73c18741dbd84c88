//! Sudden month-over-month spend increases

use super::service_history;
use crate::aggregate::AggregateResult;
use crate::ingest::CostRecord;
use crate::recommend::detector::{affected_count, Detector};
use crate::recommend::heuristics::Heuristics;
use crate::recommend::recommendation::{ActionKind, Category, Opportunity};
use crate::recommend::scoring::Evidence;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

/// Flags services whose latest month is far above their earlier average
pub struct SpendSpikeDetector;

impl Detector for SpendSpikeDetector {
    fn name(&self) -> &str {
        "spend-spike"
    }

    fn category(&self) -> Category {
        Category::Other
    }

    fn detect(
        &self,
        records: &[CostRecord],
        aggregate: &AggregateResult,
        heuristics: &Heuristics,
    ) -> Vec<Opportunity> {
        let mut found = Vec::new();
        let Some(ratio) = Decimal::from_f64(heuristics.spike_ratio) else {
            return found;
        };

        for history in service_history(records) {
            let Some((&latest_period, &latest)) = history.by_period.iter().next_back() else {
                continue;
            };
            let earlier: Vec<Decimal> = history
                .by_period
                .range(..latest_period)
                .map(|(_, cost)| *cost)
                .collect();
            if earlier.is_empty() || earlier.len() < heuristics.spike_min_history {
                continue;
            }

            let mean = earlier.iter().copied().sum::<Decimal>() / Decimal::from(earlier.len());
            if mean <= Decimal::ZERO || latest <= mean * (Decimal::ONE + ratio) {
                continue;
            }

            let excess = latest - mean;
            let growth = (excess / mean).to_f64().unwrap_or(0.0);
            let evidence = Evidence {
                samples: earlier.len() + 1,
                margin: (growth - heuristics.spike_ratio) / heuristics.spike_ratio,
                periods_observed: earlier.len() + 1,
                total_periods: aggregate.period_count(),
            };
            let label = &history.label;

            found.push(Opportunity {
                category: Category::Other,
                title: format!("{} Spend Spike", label),
                description: format!(
                    "{} spend in {} is {:.0}% above its {}-month average",
                    label,
                    latest_period,
                    growth * 100.0,
                    earlier.len()
                ),
                action: format!(
                    "Review {} usage in {} for unplanned or runaway resources",
                    label, latest_period
                ),
                action_kind: ActionKind::ReviewSpend,
                confidence: evidence.confidence(),
                current_monthly_cost: latest,
                estimated_monthly_savings: excess,
                affected_resource_count: affected_count(
                    records
                        .iter()
                        .filter(|r| r.is_service(label) && r.period() == latest_period),
                ),
                resources: Vec::new(),
            });
        }

        found
    }
}
