//! Steady on-demand spend that can be committed
//!
//! Two rules share the category:
//! - always-on RDS instances: running hours and cost above cut-offs
//! - steady services: month-to-month spend with low variation

use super::service_history;
use crate::aggregate::AggregateResult;
use crate::ingest::CostRecord;
use crate::recommend::detector::{
    affected_count, monthly, savings, Detector, FlaggedGroup, OpportunitySpec,
};
use crate::recommend::heuristics::Heuristics;
use crate::recommend::recommendation::{ActionKind, Category, Opportunity};
use crate::recommend::scoring::Evidence;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Coefficient of variation (population standard deviation over mean)
///
/// Returns `None` for empty input or a zero mean.
pub fn coefficient_of_variation(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if mean <= 0.0 {
        return None;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Some(variance.sqrt() / mean)
}

/// Hours in an average month
pub const HOURS_PER_MONTH: f64 = 730.0;

/// Flags always-on RDS instances and reserved-eligible services whose
/// monthly spend is stable
pub struct ReservedCapacityDetector;

impl ReservedCapacityDetector {
    /// RDS rows running long enough to commit, excluding rows due for a downsize
    fn always_on_instances(
        records: &[CostRecord],
        aggregate: &AggregateResult,
        heuristics: &Heuristics,
    ) -> Option<Opportunity> {
        let min_hours = heuristics.reserved_min_running_hours;
        let mut group = FlaggedGroup::new();

        for record in records.iter().filter(|r| r.is_service("RDS")) {
            let signals = record.signals();
            let Some(hours) = signals.running_hours else {
                continue;
            };
            let downsize = signals.cpu_utilization.is_some_and(|cpu| {
                cpu < heuristics.rds_cpu_threshold && record.cost() > heuristics.rds_min_cost
            });
            if downsize || hours <= min_hours || record.cost() <= heuristics.reserved_min_cost {
                continue;
            }
            let margin = if HOURS_PER_MONTH > min_hours {
                (hours - min_hours) / (HOURS_PER_MONTH - min_hours)
            } else {
                1.0
            };
            group.add(record, margin, None);
        }

        let count = group.resource_len();
        group.into_opportunity(
            OpportunitySpec {
                category: Category::ReservedCapacity,
                title: "RDS Reserved Instances".to_string(),
                description: format!(
                    "{} RDS instance(s) run more than {} hours a month, each costing over ${}",
                    count, min_hours, heuristics.reserved_min_cost
                ),
                action: "Purchase reserved instances for always-on RDS databases".to_string(),
                action_kind: ActionKind::CommitReserved,
                savings_fraction: heuristics.reserved_savings_fraction,
            },
            aggregate,
        )
    }
}

impl Detector for ReservedCapacityDetector {
    fn name(&self) -> &str {
        "reserved-capacity"
    }

    fn category(&self) -> Category {
        Category::ReservedCapacity
    }

    fn detect(
        &self,
        records: &[CostRecord],
        aggregate: &AggregateResult,
        heuristics: &Heuristics,
    ) -> Vec<Opportunity> {
        let mut found = Vec::new();
        let always_on = Self::always_on_instances(records, aggregate, heuristics);
        let rds_flagged = always_on.is_some();
        found.extend(always_on);

        for history in service_history(records) {
            if !heuristics.is_reserved_eligible(&history.label) {
                continue;
            }
            // Already covered per instance
            if rds_flagged && history.label.eq_ignore_ascii_case("RDS") {
                continue;
            }
            if history.by_period.len() < heuristics.reserved_min_periods {
                continue;
            }

            let values: Vec<f64> = history
                .by_period
                .values()
                .map(|cost| cost.to_f64().unwrap_or(0.0))
                .collect();
            let Some(variation) = coefficient_of_variation(&values) else {
                continue;
            };
            if variation > heuristics.reserved_max_variation {
                continue;
            }

            let total: Decimal = history.by_period.values().copied().sum();
            let current = monthly(total, aggregate.period_count());
            let margin = if heuristics.reserved_max_variation > 0.0 {
                1.0 - variation / heuristics.reserved_max_variation
            } else {
                1.0
            };
            let evidence = Evidence {
                samples: history.by_period.len(),
                margin,
                periods_observed: history.by_period.len(),
                total_periods: aggregate.period_count(),
            };
            let label = &history.label;

            found.push(Opportunity {
                category: Category::ReservedCapacity,
                title: format!("{} Reserved Capacity", label),
                description: format!(
                    "{} spend is steady across {} months (variation {:.1}%)",
                    label,
                    history.by_period.len(),
                    variation * 100.0
                ),
                action: format!(
                    "Commit baseline {} usage with reserved capacity or a savings plan",
                    label
                ),
                action_kind: ActionKind::CommitReserved,
                confidence: evidence.confidence(),
                current_monthly_cost: current,
                estimated_monthly_savings: savings(current, heuristics.reserved_savings_fraction),
                affected_resource_count: affected_count(
                    records.iter().filter(|r| r.is_service(label)),
                ),
                resources: Vec::new(),
            });
        }

        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::ingest::{Period, UsageSignals};
    use rust_decimal_macros::dec;

    fn monthly_spend(service: &str, costs: &[Decimal]) -> Vec<CostRecord> {
        costs
            .iter()
            .enumerate()
            .map(|(i, cost)| {
                CostRecord::new(service, "us-east-1", *cost, Period::new(2025, i as u32 + 1).unwrap())
                    .unwrap()
            })
            .collect()
    }

    fn run(records: &[CostRecord]) -> Vec<Opportunity> {
        ReservedCapacityDetector.detect(records, &aggregate(records), &Heuristics::default())
    }

    #[test]
    fn test_coefficient_of_variation() {
        assert_eq!(coefficient_of_variation(&[]), None);
        assert_eq!(coefficient_of_variation(&[0.0, 0.0]), None);
        assert_eq!(coefficient_of_variation(&[5.0, 5.0, 5.0]), Some(0.0));
        let cv = coefficient_of_variation(&[420.0, 450.0]).unwrap();
        assert!((cv - 15.0 / 435.0).abs() < 1e-9);
    }

    #[test]
    fn test_steady_ec2_spend_is_flagged() {
        let records = monthly_spend("EC2", &[dec!(420), dec!(450)]);
        let found = run(&records);

        assert_eq!(found.len(), 1);
        let opp = &found[0];
        assert_eq!(opp.title, "EC2 Reserved Capacity");
        assert_eq!(opp.action_kind, ActionKind::CommitReserved);
        assert_eq!(opp.current_monthly_cost, dec!(435));
        assert_eq!(opp.estimated_monthly_savings, dec!(130.5));
        assert_eq!(opp.affected_resource_count, 1);
    }

    #[test]
    fn test_volatile_spend_is_not_flagged() {
        let records = monthly_spend("RDS", &[dec!(100), dec!(400), dec!(150)]);
        assert!(run(&records).is_empty());
    }

    #[test]
    fn test_single_period_is_not_enough() {
        assert!(run(&monthly_spend("EC2", &[dec!(450)])).is_empty());
    }

    #[test]
    fn test_ineligible_service_is_ignored() {
        assert!(run(&monthly_spend("S3", &[dec!(800), dec!(800)])).is_empty());
    }

    fn rds(id: &str, cost: Decimal, hours: f64, cpu: Option<f64>) -> CostRecord {
        CostRecord::new("RDS", "us-east-1", cost, Period::new(2025, 9).unwrap())
            .unwrap()
            .with_resource_id(id)
            .with_signals(UsageSignals {
                instance_type: Some("db.r5.xlarge".to_string()),
                running_hours: Some(hours),
                cpu_utilization: cpu,
                ..Default::default()
            })
    }

    #[test]
    fn test_always_on_rds_in_a_single_month_is_flagged() {
        let records = vec![
            rds("db-main", dec!(350), 730.0, Some(60.0)),
            rds("db-batch", dec!(200), 300.0, Some(60.0)),
            rds("db-cheap", dec!(120), 730.0, Some(60.0)),
        ];
        let found = run(&records);

        assert_eq!(found.len(), 1);
        let opp = &found[0];
        assert_eq!(opp.title, "RDS Reserved Instances");
        assert_eq!(opp.action_kind, ActionKind::CommitReserved);
        assert_eq!(opp.current_monthly_cost, dec!(350));
        assert_eq!(opp.estimated_monthly_savings, dec!(105));
        assert_eq!(opp.affected_resource_count, 1);
        assert_eq!(opp.resources[0].resource_id.as_deref(), Some("db-main"));
    }

    #[test]
    fn test_downsize_candidates_are_not_reserved() {
        let records = vec![rds("db-idle", dec!(350), 730.0, Some(10.0))];
        assert!(run(&records).is_empty());
    }

    #[test]
    fn test_always_on_rds_replaces_spend_variation_rule() {
        let mut records = vec![
            rds("db-main", dec!(400), 730.0, None),
            CostRecord::new("RDS", "us-east-1", dec!(410), Period::new(2025, 8).unwrap())
                .unwrap()
                .with_resource_id("db-main"),
        ];
        records.extend(monthly_spend("EC2", &[dec!(420), dec!(450)]));
        let found = run(&records);

        let titles: Vec<&str> = found.iter().map(|o| o.title.as_str()).collect();
        assert_eq!(titles, vec!["RDS Reserved Instances", "EC2 Reserved Capacity"]);
    }
}
