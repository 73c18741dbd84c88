//! Storage class and volume type mismatches

use crate::aggregate::AggregateResult;
use crate::ingest::CostRecord;
use crate::recommend::detector::{Detector, FlaggedGroup, OpportunitySpec};
use crate::recommend::heuristics::Heuristics;
use crate::recommend::recommendation::{ActionKind, Category, Opportunity};

/// S3 storage class receiving Glacier transitions
pub const GLACIER_CLASS: &str = "GLACIER";
/// S3 storage class for Intelligent-Tiering
pub const INTELLIGENT_TIERING_CLASS: &str = "INTELLIGENT_TIERING";
/// Target EBS volume type
pub const GP3_VOLUME_TYPE: &str = "gp3";

fn is_standard_class(class: Option<&str>) -> bool {
    // S3 objects default to Standard when no class is recorded
    class.is_none_or(|c| c.eq_ignore_ascii_case("standard"))
}

fn is_provisioned_iops(volume_type: Option<&str>) -> bool {
    volume_type.is_some_and(|t| t.eq_ignore_ascii_case("io1") || t.eq_ignore_ascii_case("io2"))
}

/// Flags cold or very large S3 Standard buckets and lightly used
/// provisioned-IOPS volumes
pub struct StorageTieringDetector;

impl Detector for StorageTieringDetector {
    fn name(&self) -> &str {
        "storage-tiering"
    }

    fn category(&self) -> Category {
        Category::StorageTiering
    }

    fn detect(
        &self,
        records: &[CostRecord],
        aggregate: &AggregateResult,
        heuristics: &Heuristics,
    ) -> Vec<Opportunity> {
        let mut glacier = FlaggedGroup::new();
        let mut tiering = FlaggedGroup::new();
        let mut gp3 = FlaggedGroup::new();

        for record in records {
            let signals = record.signals();

            if record.is_service("S3") && is_standard_class(signals.instance_type.as_deref()) {
                let Some(storage) = signals.storage_used else {
                    continue;
                };
                let access = signals.access_count;

                let cold = access.is_some_and(|a| a < heuristics.glacier_max_access_count);
                if cold && storage > heuristics.glacier_min_storage_gb {
                    let max_access = heuristics.glacier_max_access_count.max(1) as f64;
                    let margin = (max_access - access.unwrap_or(0) as f64) / max_access;
                    glacier.add(record, margin, Some(GLACIER_CLASS.to_string()));
                } else if storage > heuristics.tiering_min_storage_gb {
                    let min_storage = heuristics.tiering_min_storage_gb.max(1.0);
                    let margin = (storage - min_storage) / min_storage;
                    tiering.add(record, margin, Some(INTELLIGENT_TIERING_CLASS.to_string()));
                }
            } else if record.is_service("EBS") && is_provisioned_iops(signals.instance_type.as_deref()) {
                let Some(network) = signals.network_io else {
                    continue;
                };
                let max_network = heuristics.ebs_max_network_io;
                if network < max_network {
                    let margin = if max_network > 0.0 {
                        (max_network - network) / max_network
                    } else {
                        0.0
                    };
                    gp3.add(record, margin, Some(GP3_VOLUME_TYPE.to_string()));
                }
            }
        }

        let glacier_spec = OpportunitySpec {
            category: Category::StorageTiering,
            title: "S3 Glacier Archival".to_string(),
            description: format!(
                "{} S3 Standard bucket(s) store over {} GB with fewer than {} requests",
                glacier.resource_len(),
                heuristics.glacier_min_storage_gb,
                heuristics.glacier_max_access_count
            ),
            action: "Add a lifecycle rule transitioning rarely accessed objects to Glacier".to_string(),
            action_kind: ActionKind::ArchiveToGlacier,
            savings_fraction: heuristics.glacier_savings_fraction,
        };
        let tiering_spec = OpportunitySpec {
            category: Category::StorageTiering,
            title: "S3 Intelligent-Tiering".to_string(),
            description: format!(
                "{} S3 Standard bucket(s) store over {} GB",
                tiering.resource_len(),
                heuristics.tiering_min_storage_gb
            ),
            action: "Transition large buckets to Intelligent-Tiering".to_string(),
            action_kind: ActionKind::IntelligentTiering,
            savings_fraction: heuristics.tiering_savings_fraction,
        };
        let gp3_spec = OpportunitySpec {
            category: Category::StorageTiering,
            title: "EBS Volume Type Migration".to_string(),
            description: format!(
                "{} provisioned-IOPS volume(s) see under {} GB of network IO",
                gp3.resource_len(),
                heuristics.ebs_max_network_io
            ),
            action: "Migrate io1/io2 volumes to gp3".to_string(),
            action_kind: ActionKind::MigrateVolumeType,
            savings_fraction: heuristics.gp3_savings_fraction,
        };

        [
            glacier.into_opportunity(glacier_spec, aggregate),
            tiering.into_opportunity(tiering_spec, aggregate),
            gp3.into_opportunity(gp3_spec, aggregate),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}
