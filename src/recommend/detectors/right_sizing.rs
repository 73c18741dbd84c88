//! Over-provisioned compute, database and function capacity

use crate::aggregate::AggregateResult;
use crate::ingest::CostRecord;
use crate::recommend::detector::{Detector, FlaggedGroup, OpportunitySpec};
use crate::recommend::heuristics::Heuristics;
use crate::recommend::recommendation::{ActionKind, Category, Opportunity};
use regex::Regex;
use std::sync::OnceLock;

/// Instance sizes, smallest first
const SIZE_LADDER: [&str; 19] = [
    "nano", "micro", "small", "medium", "large", "xlarge", "2xlarge", "3xlarge", "4xlarge",
    "6xlarge", "8xlarge", "9xlarge", "10xlarge", "12xlarge", "16xlarge", "18xlarge", "24xlarge",
    "32xlarge", "48xlarge",
];

/// Smallest memory size a function can be reduced to
pub const MIN_LAMBDA_MEMORY_MB: u32 = 128;

static INSTANCE_TYPE_RE: OnceLock<Regex> = OnceLock::new();
static MEMORY_SIZE_RE: OnceLock<Regex> = OnceLock::new();

fn instance_type_re() -> &'static Regex {
    INSTANCE_TYPE_RE.get_or_init(|| {
        Regex::new(r"^(?P<family>[a-z0-9.\-]+)\.(?P<size>[a-z0-9]+)$")
            .expect("instance type regex is valid")
    })
}

fn memory_size_re() -> &'static Regex {
    MEMORY_SIZE_RE.get_or_init(|| {
        Regex::new(r"^(?P<amount>\d+)\s*(?P<unit>mb|gb)?$").expect("memory size regex is valid")
    })
}

/// Step an instance type down the size ladder
///
/// Returns `None` for unrecognized types or when already at the smallest size.
///
/// # Examples
///
/// ```
/// use cost_optimizer::recommend::detectors::right_sizing::step_down;
///
/// assert_eq!(step_down("t3.2xlarge", 1).as_deref(), Some("t3.xlarge"));
/// assert_eq!(step_down("db.r5.xlarge", 2).as_deref(), Some("db.r5.medium"));
/// assert_eq!(step_down("t3.nano", 1), None);
/// ```
pub fn step_down(instance_type: &str, steps: usize) -> Option<String> {
    let normalized = instance_type.trim().to_ascii_lowercase();
    let caps = instance_type_re().captures(&normalized)?;
    let family = caps.name("family")?.as_str();
    let size = caps.name("size")?.as_str();

    let index = SIZE_LADDER.iter().position(|s| *s == size)?;
    if index == 0 {
        return None;
    }
    let target = SIZE_LADDER[index.saturating_sub(steps.max(1))];
    Some(format!("{}.{}", family, target))
}

/// Parse a function memory size such as `1024MB`, `1024` or `2GB` into megabytes
pub fn parse_memory_mb(value: &str) -> Option<u32> {
    let normalized = value.trim().to_ascii_lowercase();
    let caps = memory_size_re().captures(&normalized)?;
    let amount: u32 = caps.name("amount")?.as_str().parse().ok()?;
    match caps.name("unit").map(|m| m.as_str()) {
        Some("gb") => amount.checked_mul(1024),
        _ => Some(amount),
    }
}

fn margin(value: f64, threshold: f64) -> f64 {
    if threshold <= 0.0 {
        return 0.0;
    }
    (threshold - value) / threshold
}

/// Flags EC2 and RDS instances with low CPU and Lambda functions with low
/// memory utilization
pub struct RightSizingDetector;

impl RightSizingDetector {
    fn instance_spec(service: &str, count: usize, threshold: f64, fraction: f64) -> OpportunitySpec {
        OpportunitySpec {
            category: Category::RightSizing,
            title: format!("{} Right-Sizing", service),
            description: format!(
                "{} {} resource(s) average below {}% CPU utilization",
                count, service, threshold
            ),
            action: format!(
                "Downsize over-provisioned {} instances to a smaller size in the same family",
                service
            ),
            action_kind: ActionKind::Downsize,
            savings_fraction: fraction,
        }
    }
}

impl Detector for RightSizingDetector {
    fn name(&self) -> &str {
        "right-sizing"
    }

    fn category(&self) -> Category {
        Category::RightSizing
    }

    fn detect(
        &self,
        records: &[CostRecord],
        aggregate: &AggregateResult,
        heuristics: &Heuristics,
    ) -> Vec<Opportunity> {
        let mut ec2 = FlaggedGroup::new();
        let mut rds = FlaggedGroup::new();
        let mut lambda = FlaggedGroup::new();

        for record in records {
            let signals = record.signals();

            if record.is_service("EC2") || record.is_service("RDS") {
                let (group, threshold, min_cost) = if record.is_service("EC2") {
                    (&mut ec2, heuristics.ec2_cpu_threshold, heuristics.ec2_min_cost)
                } else {
                    (&mut rds, heuristics.rds_cpu_threshold, heuristics.rds_min_cost)
                };
                let Some(cpu) = signals.cpu_utilization else {
                    continue;
                };
                if cpu < threshold && record.cost() > min_cost {
                    let steps = if cpu < threshold / 2.0 { 2 } else { 1 };
                    let target = signals
                        .instance_type
                        .as_deref()
                        .and_then(|t| step_down(t, steps));
                    group.add(record, margin(cpu, threshold), target);
                }
            } else if record.is_service("Lambda") {
                let (Some(memory), Some(size)) = (
                    signals.memory_utilization,
                    signals.instance_type.as_deref().and_then(parse_memory_mb),
                ) else {
                    continue;
                };
                let threshold = heuristics.lambda_memory_threshold;
                if memory < threshold && size > heuristics.lambda_min_memory_mb {
                    let target = (size / 2).max(MIN_LAMBDA_MEMORY_MB);
                    lambda.add(record, margin(memory, threshold), Some(format!("{}MB", target)));
                }
            }
        }

        let mut found = Vec::new();
        let fraction = heuristics.rightsizing_savings_fraction;

        let ec2_count = ec2.resource_len();
        if let Some(opportunity) = ec2.into_opportunity(
            Self::instance_spec("EC2", ec2_count, heuristics.ec2_cpu_threshold, fraction),
            aggregate,
        ) {
            found.push(opportunity);
        }

        let rds_count = rds.resource_len();
        if let Some(opportunity) = rds.into_opportunity(
            Self::instance_spec("RDS", rds_count, heuristics.rds_cpu_threshold, fraction),
            aggregate,
        ) {
            found.push(opportunity);
        }

        let lambda_count = lambda.resource_len();
        let lambda_spec = OpportunitySpec {
            category: Category::RightSizing,
            title: "Lambda Memory Right-Sizing".to_string(),
            description: format!(
                "{} Lambda function(s) use less than {}% of allocated memory above {}MB",
                lambda_count, heuristics.lambda_memory_threshold, heuristics.lambda_min_memory_mb
            ),
            action: "Halve the memory allocation of under-utilized functions".to_string(),
            action_kind: ActionKind::ReduceMemory,
            savings_fraction: fraction,
        };
        if let Some(opportunity) = lambda.into_opportunity(lambda_spec, aggregate) {
            found.push(opportunity);
        }

        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::ingest::{Period, UsageSignals};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn instance(service: &str, id: &str, kind: &str, cpu: f64, cost: Decimal) -> CostRecord {
        CostRecord::new(service, "us-east-1", cost, Period::new(2025, 9).unwrap())
            .unwrap()
            .with_resource_id(id)
            .with_signals(UsageSignals {
                instance_type: Some(kind.to_string()),
                cpu_utilization: Some(cpu),
                ..Default::default()
            })
    }

    fn run(records: &[CostRecord]) -> Vec<Opportunity> {
        RightSizingDetector.detect(records, &aggregate(records), &Heuristics::default())
    }

    #[test]
    fn test_step_down_ladder() {
        assert_eq!(step_down("m5.4xlarge", 1).as_deref(), Some("m5.2xlarge"));
        assert_eq!(step_down("M5.Large", 2).as_deref(), Some("m5.small"));
        assert_eq!(step_down("t3.micro", 5).as_deref(), Some("t3.nano"));
        assert_eq!(step_down("m5.metal", 1), None);
        assert_eq!(step_down("large", 1), None);
    }

    #[test]
    fn test_parse_memory_mb() {
        assert_eq!(parse_memory_mb("1024MB"), Some(1024));
        assert_eq!(parse_memory_mb("512"), Some(512));
        assert_eq!(parse_memory_mb("2GB"), Some(2048));
        assert_eq!(parse_memory_mb("lots"), None);
    }

    #[test]
    fn test_flags_low_cpu_ec2_as_one_group() {
        let records = vec![
            instance("EC2", "i-1", "t3.2xlarge", 12.0, dec!(240)),
            instance("EC2", "i-2", "m5.xlarge", 22.0, dec!(140)),
            instance("EC2", "i-3", "m5.xlarge", 65.0, dec!(140)),
        ];
        let found = run(&records);

        assert_eq!(found.len(), 1);
        let opp = &found[0];
        assert_eq!(opp.title, "EC2 Right-Sizing");
        assert_eq!(opp.action_kind, ActionKind::Downsize);
        assert_eq!(opp.affected_resource_count, 2);
        assert_eq!(opp.current_monthly_cost, dec!(380));
        assert_eq!(opp.estimated_monthly_savings, dec!(114));
        // 12% is under half the threshold: two steps down
        assert_eq!(opp.resources[0].target_type.as_deref(), Some("t3.large"));
        assert_eq!(opp.resources[1].target_type.as_deref(), Some("m5.large"));
    }

    #[test]
    fn test_cheap_instances_are_ignored() {
        let records = vec![instance("EC2", "i-1", "t3.small", 5.0, dec!(20))];
        assert!(run(&records).is_empty());
    }

    #[test]
    fn test_rds_uses_its_own_thresholds() {
        let records = vec![
            instance("RDS", "db-1", "db.r5.2xlarge", 27.0, dec!(500)),
            instance("RDS", "db-2", "db.r5.2xlarge", 20.0, dec!(90)),
            instance("RDS", "db-3", "db.r5.2xlarge", 20.0, dec!(300)),
        ];
        let found = run(&records);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "RDS Right-Sizing");
        assert_eq!(found[0].affected_resource_count, 1);
        assert_eq!(found[0].resources[0].resource_id.as_deref(), Some("db-3"));
    }

    #[test]
    fn test_lambda_memory_is_halved() {
        let record = CostRecord::new("Lambda", "us-east-1", dec!(80), Period::new(2025, 9).unwrap())
            .unwrap()
            .with_resource_id("fn-resize")
            .with_signals(UsageSignals {
                instance_type: Some("1024MB".to_string()),
                memory_utilization: Some(18.0),
                ..Default::default()
            });
        let found = run(&[record]);

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].action_kind, ActionKind::ReduceMemory);
        assert_eq!(found[0].resources[0].target_type.as_deref(), Some("512MB"));
    }

    #[test]
    fn test_records_without_signals_are_skipped() {
        let records = vec![
            CostRecord::new("EC2", "us-east-1", dec!(450), Period::new(2025, 9).unwrap()).unwrap(),
        ];
        assert!(run(&records).is_empty());
    }
}
