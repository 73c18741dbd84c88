//! Cost rollups over normalized records

use crate::ingest::{CostRecord, Period};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Totals and breakdowns of a record set
///
/// Amounts keep full decimal precision; rounding happens at the report
/// boundary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    /// Sum of every record's cost
    pub total_cost: Decimal,
    /// Cost per service, keyed by the first-seen spelling of each service
    pub cost_by_service: BTreeMap<String, Decimal>,
    /// Cost per region
    pub cost_by_region: BTreeMap<String, Decimal>,
    /// Cost per billing month, chronological
    pub cost_by_period: BTreeMap<Period, Decimal>,
    /// Number of records aggregated
    pub row_count: usize,
}

impl AggregateResult {
    /// Number of distinct billing months
    pub fn period_count(&self) -> usize {
        self.cost_by_period.len()
    }

    /// Latest billing month, if any
    pub fn latest_period(&self) -> Option<Period> {
        self.cost_by_period.keys().next_back().copied()
    }

    /// Cost for a service, matched ignoring case
    pub fn service_cost(&self, service: &str) -> Option<Decimal> {
        self.cost_by_service
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(service))
            .map(|(_, cost)| *cost)
    }
}

/// Aggregate records in a single pass
///
/// # Examples
///
/// ```
/// use cost_optimizer::aggregate::aggregate;
/// use cost_optimizer::ingest::normalize;
///
/// let normalized = normalize("Service,Region,Cost,Date\nEC2,us-east-1,450,2025-09\nec2,us-west-2,50,2025-08\n")?;
/// let result = aggregate(&normalized.records);
/// assert_eq!(result.cost_by_service.len(), 1);
/// assert_eq!(result.cost_by_service["EC2"].to_string(), "500");
/// assert_eq!(result.period_count(), 2);
/// # Ok::<(), cost_optimizer::ingest::IngestError>(())
/// ```
pub fn aggregate(records: &[CostRecord]) -> AggregateResult {
    let mut result = AggregateResult::default();
    // lowercase service -> first-seen spelling
    let mut labels: HashMap<String, String> = HashMap::new();

    for record in records {
        result.total_cost += record.cost();

        let label = labels
            .entry(record.service().to_lowercase())
            .or_insert_with(|| record.service().to_string());
        *result.cost_by_service.entry(label.clone()).or_default() += record.cost();
        *result
            .cost_by_region
            .entry(record.region().to_string())
            .or_default() += record.cost();
        *result.cost_by_period.entry(record.period()).or_default() += record.cost();
        result.row_count += 1;
    }

    log::debug!(
        "Aggregated {} records into {} services over {} periods",
        result.row_count,
        result.cost_by_service.len(),
        result.period_count()
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record(service: &str, region: &str, cost: Decimal, year: i32, month: u32) -> CostRecord {
        CostRecord::new(service, region, cost, Period::new(year, month).unwrap()).unwrap()
    }

    #[test]
    fn test_aggregate_empty_input() {
        let result = aggregate(&[]);
        assert_eq!(result.total_cost, Decimal::ZERO);
        assert!(result.cost_by_service.is_empty());
        assert!(result.cost_by_period.is_empty());
        assert_eq!(result.row_count, 0);
        assert_eq!(result.latest_period(), None);
    }

    #[test]
    fn test_aggregate_sums_match_total() {
        let records = vec![
            record("EC2", "us-east-1", dec!(450.00), 2025, 9),
            record("S3", "us-east-1", dec!(850.00), 2025, 9),
            record("EC2", "us-west-2", dec!(420.00), 2025, 8),
        ];
        let result = aggregate(&records);

        assert_eq!(result.total_cost, dec!(1720.00));
        assert_eq!(result.cost_by_service.values().copied().sum::<Decimal>(), result.total_cost);
        assert_eq!(result.cost_by_period.values().copied().sum::<Decimal>(), result.total_cost);
        assert_eq!(result.cost_by_region.values().copied().sum::<Decimal>(), result.total_cost);
        assert_eq!(result.cost_by_region["us-east-1"], dec!(1300.00));
        assert_eq!(result.row_count, 3);
    }

    #[test]
    fn test_services_fold_case_insensitively() {
        let records = vec![
            record("Lambda", "us-east-1", dec!(1), 2025, 9),
            record("LAMBDA", "us-east-1", dec!(2), 2025, 9),
            record("lambda", "us-east-1", dec!(3), 2025, 9),
        ];
        let result = aggregate(&records);

        assert_eq!(result.cost_by_service.len(), 1);
        assert_eq!(result.cost_by_service["Lambda"], dec!(6));
        assert_eq!(result.service_cost("lambda"), Some(dec!(6)));
    }

    #[test]
    fn test_periods_are_chronological() {
        let records = vec![
            record("EC2", "us-east-1", dec!(1), 2025, 2),
            record("EC2", "us-east-1", dec!(1), 2024, 11),
            record("EC2", "us-east-1", dec!(1), 2025, 1),
        ];
        let result = aggregate(&records);
        let labels: Vec<String> = result.cost_by_period.keys().map(|p| p.to_string()).collect();

        assert_eq!(labels, vec!["2024-11", "2025-01", "2025-02"]);
        assert_eq!(result.latest_period(), Period::new(2025, 2));
    }

    #[test]
    fn test_precision_is_preserved() {
        let records = vec![
            record("S3", "us-east-1", dec!(0.001), 2025, 9),
            record("S3", "us-east-1", dec!(0.004), 2025, 9),
        ];
        assert_eq!(aggregate(&records).total_cost, dec!(0.005));
    }
}
