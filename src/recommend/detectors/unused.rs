//! Idle instances and orphaned volumes

use crate::aggregate::AggregateResult;
use crate::ingest::CostRecord;
use crate::recommend::detector::{Detector, FlaggedGroup, OpportunitySpec};
use crate::recommend::heuristics::Heuristics;
use crate::recommend::recommendation::{ActionKind, Category, Opportunity};

/// Flags EC2 instances that barely ran and EBS volumes with no attachment
pub struct UnusedResourceDetector;

impl Detector for UnusedResourceDetector {
    fn name(&self) -> &str {
        "unused-resource"
    }

    fn category(&self) -> Category {
        Category::UnusedResource
    }

    fn detect(
        &self,
        records: &[CostRecord],
        aggregate: &AggregateResult,
        heuristics: &Heuristics,
    ) -> Vec<Opportunity> {
        let mut idle = FlaggedGroup::new();
        let mut detached = FlaggedGroup::new();
        let max_hours = heuristics.idle_max_running_hours;

        for record in records {
            let signals = record.signals();
            if record.is_service("EC2") {
                if let Some(hours) = signals.running_hours {
                    if hours < max_hours {
                        let margin = if max_hours > 0.0 { (max_hours - hours) / max_hours } else { 0.0 };
                        idle.add(record, margin, None);
                    }
                }
            } else if record.is_service("EBS") && signals.attached == Some(false) {
                detached.add(record, 1.0, None);
            }
        }

        let idle_spec = OpportunitySpec {
            category: Category::UnusedResource,
            title: "Idle EC2 Instances".to_string(),
            description: format!(
                "{} EC2 instance(s) ran fewer than {} hours in the period",
                idle.resource_len(),
                max_hours
            ),
            action: "Terminate idle instances or schedule them to stop outside working hours".to_string(),
            action_kind: ActionKind::Terminate,
            savings_fraction: heuristics.unused_savings_fraction,
        };
        let detached_spec = OpportunitySpec {
            category: Category::UnusedResource,
            title: "Unattached EBS Volumes".to_string(),
            description: format!("{} EBS volume(s) are not attached to any instance", detached.resource_len()),
            action: "Snapshot and delete unattached volumes".to_string(),
            action_kind: ActionKind::DeleteVolume,
            savings_fraction: heuristics.unused_savings_fraction,
        };

        [
            idle.into_opportunity(idle_spec, aggregate),
            detached.into_opportunity(detached_spec, aggregate),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}
