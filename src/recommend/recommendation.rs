//! Recommendation types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of optimization a recommendation proposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Over-provisioned compute or database capacity
    RightSizing,
    /// Data sitting in a more expensive storage class than its access pattern needs
    StorageTiering,
    /// Idle or orphaned resources
    UnusedResource,
    /// Steady on-demand spend that could be committed
    ReservedCapacity,
    /// Anything else (spend anomalies)
    Other,
}

impl Category {
    /// Stable name used for display and tie-breaking
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::RightSizing => "right-sizing",
            Category::StorageTiering => "storage-tiering",
            Category::UnusedResource => "unused-resource",
            Category::ReservedCapacity => "reserved-capacity",
            Category::Other => "other",
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            Category::RightSizing => "Right-Sizing",
            Category::StorageTiering => "Storage Tiering",
            Category::UnusedResource => "Unused Resource",
            Category::ReservedCapacity => "Reserved Capacity",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Urgency of a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Low urgency
    Low,
    /// Medium urgency
    Medium,
    /// High urgency
    High,
}

impl Severity {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The concrete change behind a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    /// Move an instance to a smaller size
    Downsize,
    /// Lower a function's memory allocation
    ReduceMemory,
    /// Shut down an idle instance
    Terminate,
    /// Delete an unattached volume
    DeleteVolume,
    /// Transition objects to Glacier
    ArchiveToGlacier,
    /// Transition objects to Intelligent-Tiering
    IntelligentTiering,
    /// Change a provisioned-IOPS volume to gp3
    MigrateVolumeType,
    /// Purchase reserved capacity or a savings plan
    CommitReserved,
    /// Investigate an unexpected spend increase
    ReviewSpend,
}

impl ActionKind {
    /// True when the change can be expressed as infrastructure code
    pub fn is_automatable(&self) -> bool {
        !matches!(self, ActionKind::CommitReserved | ActionKind::ReviewSpend)
    }
}

/// A resource a recommendation applies to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffectedResource {
    /// Provider resource identifier, when the extract carries one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    /// Service the resource belongs to
    pub service: String,
    /// Region of the resource
    pub region: String,
    /// Current instance type, storage class or memory size
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_type: Option<String>,
    /// Proposed instance type, storage class or memory size
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_type: Option<String>,
}

/// An unranked finding produced by a detector
///
/// Carries no id or severity; the engine assigns both after scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    /// Category of the finding
    pub category: Category,
    /// Short label, e.g. "EC2 Right-Sizing"
    pub title: String,
    /// What was observed
    pub description: String,
    /// What to do about it
    pub action: String,
    /// Concrete change
    pub action_kind: ActionKind,
    /// Signal strength (0-100)
    pub confidence: f64,
    /// Monthly cost of the flagged spend
    pub current_monthly_cost: Decimal,
    /// Monthly savings if the action is taken
    pub estimated_monthly_savings: Decimal,
    /// Number of resources involved
    pub affected_resource_count: usize,
    /// Resources involved, when known
    pub resources: Vec<AffectedResource>,
}

/// A ranked, scored optimization recommendation
///
/// All amounts are monthly; use [`Recommendation::estimated_annual_savings`]
/// for yearly figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Rank-based identifier, starting at 1
    pub id: u32,
    /// Category of the finding
    pub category: Category,
    /// Urgency
    pub severity: Severity,
    /// Short label
    pub title: String,
    /// What was observed
    pub description: String,
    /// What to do about it
    pub action: String,
    /// Concrete change
    pub action_kind: ActionKind,
    /// Signal strength (0-100, one decimal)
    pub confidence: f64,
    /// Monthly cost of the flagged spend
    pub current_monthly_cost: Decimal,
    /// Monthly savings if the action is taken
    pub estimated_monthly_savings: Decimal,
    /// Monthly cost after the action (`current - savings`)
    pub projected_monthly_cost: Decimal,
    /// Number of resources involved
    pub affected_resource_count: usize,
    /// Resources involved, when known
    #[serde(default)]
    pub resources: Vec<AffectedResource>,
}

impl Recommendation {
    /// Build a recommendation from a scored opportunity
    pub fn from_opportunity(id: u32, severity: Severity, opportunity: Opportunity) -> Self {
        let projected = opportunity.current_monthly_cost - opportunity.estimated_monthly_savings;
        Self {
            id,
            category: opportunity.category,
            severity,
            title: opportunity.title,
            description: opportunity.description,
            action: opportunity.action,
            action_kind: opportunity.action_kind,
            confidence: opportunity.confidence,
            current_monthly_cost: opportunity.current_monthly_cost,
            estimated_monthly_savings: opportunity.estimated_monthly_savings,
            projected_monthly_cost: projected,
            affected_resource_count: opportunity.affected_resource_count,
            resources: opportunity.resources,
        }
    }

    /// Savings over twelve months
    pub fn estimated_annual_savings(&self) -> Decimal {
        self.estimated_monthly_savings * Decimal::from(12)
    }

    /// Check the amount and confidence invariants
    ///
    /// # Errors
    /// Returns a description of the first violated invariant.
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.current_monthly_cost.is_sign_negative() && !self.current_monthly_cost.is_zero() {
            return Err(format!("recommendation {} has a negative current cost", self.id));
        }
        if self.estimated_monthly_savings.is_sign_negative()
            && !self.estimated_monthly_savings.is_zero()
        {
            return Err(format!("recommendation {} has negative savings", self.id));
        }
        if self.estimated_monthly_savings > self.current_monthly_cost {
            return Err(format!(
                "recommendation {} saves more than it costs ({} > {})",
                self.id, self.estimated_monthly_savings, self.current_monthly_cost
            ));
        }
        if self.projected_monthly_cost != self.current_monthly_cost - self.estimated_monthly_savings {
            return Err(format!(
                "recommendation {} has an inconsistent projected cost",
                self.id
            ));
        }
        if !(0.0..=100.0).contains(&self.confidence) {
            return Err(format!(
                "recommendation {} has confidence {} outside 0-100",
                self.id, self.confidence
            ));
        }
        Ok(())
    }
}
