//! Tunable detector constants

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Services eligible for reserved capacity by default
pub const DEFAULT_RESERVED_SERVICES: [&str; 5] = ["EC2", "RDS", "ElastiCache", "Redshift", "OpenSearch"];

/// Cut-offs and savings fractions used by the built-in detectors
///
/// Every field has a default, so a `[heuristics]` table only needs the
/// values being changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Heuristics {
    /// Share of cost saved by right-sizing
    pub rightsizing_savings_fraction: f64,
    /// EC2 instances below this CPU percentage are over-provisioned
    pub ec2_cpu_threshold: f64,
    /// Minimum EC2 row cost considered for right-sizing
    pub ec2_min_cost: Decimal,
    /// RDS instances below this CPU percentage are over-provisioned
    pub rds_cpu_threshold: f64,
    /// Minimum RDS row cost considered for right-sizing
    pub rds_min_cost: Decimal,
    /// Lambda functions below this memory utilization are over-provisioned
    pub lambda_memory_threshold: f64,
    /// Lambda memory sizes above this (MB) are considered for reduction
    pub lambda_min_memory_mb: u32,
    /// Buckets with fewer requests than this are archive candidates
    pub glacier_max_access_count: u64,
    /// Buckets storing more than this (GB) are archive candidates
    pub glacier_min_storage_gb: f64,
    /// Share of storage cost saved by archiving
    pub glacier_savings_fraction: f64,
    /// Buckets storing more than this (GB) are Intelligent-Tiering candidates
    pub tiering_min_storage_gb: f64,
    /// Share of storage cost saved by Intelligent-Tiering
    pub tiering_savings_fraction: f64,
    /// Provisioned-IOPS volumes below this network IO are gp3 candidates
    pub ebs_max_network_io: f64,
    /// Share of volume cost saved by moving to gp3
    pub gp3_savings_fraction: f64,
    /// Instances running fewer hours than this are idle
    pub idle_max_running_hours: f64,
    /// Share of cost saved by removing unused resources
    pub unused_savings_fraction: f64,
    /// Services eligible for reserved capacity
    pub reserved_services: Vec<String>,
    /// Maximum coefficient of variation for steady spend
    pub reserved_max_variation: f64,
    /// Minimum periods of history for a commitment
    pub reserved_min_periods: usize,
    /// Share of steady spend saved by committing
    pub reserved_savings_fraction: f64,
    /// RDS instances running more hours than this are commitment candidates
    pub reserved_min_running_hours: f64,
    /// Minimum RDS row cost considered for a commitment
    pub reserved_min_cost: Decimal,
    /// Latest period must exceed the historical mean by more than this share
    pub spike_ratio: f64,
    /// Minimum earlier periods needed to call a spike
    pub spike_min_history: usize,
}

impl Default for Heuristics {
    fn default() -> Self {
        Self {
            rightsizing_savings_fraction: 0.30,
            ec2_cpu_threshold: 30.0,
            ec2_min_cost: Decimal::from(50),
            rds_cpu_threshold: 25.0,
            rds_min_cost: Decimal::from(100),
            lambda_memory_threshold: 40.0,
            lambda_min_memory_mb: 512,
            glacier_max_access_count: 50,
            glacier_min_storage_gb: 1000.0,
            glacier_savings_fraction: 0.70,
            tiering_min_storage_gb: 5000.0,
            tiering_savings_fraction: 0.30,
            ebs_max_network_io: 50.0,
            gp3_savings_fraction: 0.20,
            idle_max_running_hours: 200.0,
            unused_savings_fraction: 1.0,
            reserved_services: DEFAULT_RESERVED_SERVICES.iter().map(|s| s.to_string()).collect(),
            reserved_max_variation: 0.15,
            reserved_min_periods: 2,
            reserved_savings_fraction: 0.30,
            reserved_min_running_hours: 500.0,
            reserved_min_cost: Decimal::from(150),
            spike_ratio: 0.50,
            spike_min_history: 2,
        }
    }
}

impl Heuristics {
    /// Check fractions and cut-offs are in range
    pub fn validate(&self) -> anyhow::Result<()> {
        let fractions = [
            ("rightsizing-savings-fraction", self.rightsizing_savings_fraction),
            ("glacier-savings-fraction", self.glacier_savings_fraction),
            ("tiering-savings-fraction", self.tiering_savings_fraction),
            ("gp3-savings-fraction", self.gp3_savings_fraction),
            ("unused-savings-fraction", self.unused_savings_fraction),
            ("reserved-savings-fraction", self.reserved_savings_fraction),
        ];
        for (name, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                anyhow::bail!("{} must be between 0 and 1 (got {})", name, value);
            }
        }

        let percentages = [
            ("ec2-cpu-threshold", self.ec2_cpu_threshold),
            ("rds-cpu-threshold", self.rds_cpu_threshold),
            ("lambda-memory-threshold", self.lambda_memory_threshold),
        ];
        for (name, value) in percentages {
            if !(0.0..=100.0).contains(&value) {
                anyhow::bail!("{} must be a percentage between 0 and 100 (got {})", name, value);
            }
        }

        if self.reserved_max_variation < 0.0 || self.reserved_max_variation.is_nan() {
            anyhow::bail!("reserved-max-variation cannot be negative");
        }
        if self.reserved_min_running_hours < 0.0 || self.reserved_min_running_hours.is_nan() {
            anyhow::bail!("reserved-min-running-hours cannot be negative");
        }
        if self.reserved_min_cost.is_sign_negative() && !self.reserved_min_cost.is_zero() {
            anyhow::bail!("reserved-min-cost cannot be negative");
        }
        if self.reserved_min_periods < 2 {
            anyhow::bail!("reserved-min-periods must be at least 2");
        }
        if self.spike_ratio <= 0.0 || self.spike_ratio.is_nan() {
            anyhow::bail!("spike-ratio must be positive");
        }
        if self.spike_min_history == 0 {
            anyhow::bail!("spike-min-history must be at least 1");
        }
        Ok(())
    }

    /// True when `service` is reserved-eligible, ignoring case
    pub fn is_reserved_eligible(&self, service: &str) -> bool {
        self.reserved_services
            .iter()
            .any(|s| s.eq_ignore_ascii_case(service))
    }
}
