//! Built-in detectors

pub mod reserved;
pub mod right_sizing;
pub mod spend_spike;
pub mod storage_tiering;
pub mod unused;

pub use reserved::ReservedCapacityDetector;
pub use right_sizing::RightSizingDetector;
pub use spend_spike::SpendSpikeDetector;
pub use storage_tiering::StorageTieringDetector;
pub use unused::UnusedResourceDetector;

use super::detector::Detector;
use crate::ingest::{CostRecord, Period};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Built-in detectors in their registration order
pub fn builtin() -> Vec<Arc<dyn Detector>> {
    vec![
        Arc::new(RightSizingDetector),
        Arc::new(StorageTieringDetector),
        Arc::new(UnusedResourceDetector),
        Arc::new(ReservedCapacityDetector),
        Arc::new(SpendSpikeDetector),
    ]
}

/// Monthly spend of one service
#[derive(Debug, Clone)]
pub(crate) struct ServiceHistory {
    /// First-seen spelling of the service
    pub label: String,
    pub by_period: BTreeMap<Period, Decimal>,
}

/// Per-service monthly spend, services folded ignoring case and ordered by
/// lowercase name
pub(crate) fn service_history(records: &[CostRecord]) -> Vec<ServiceHistory> {
    let mut services: BTreeMap<String, ServiceHistory> = BTreeMap::new();
    for record in records {
        let entry = services
            .entry(record.service().to_lowercase())
            .or_insert_with(|| ServiceHistory {
                label: record.service().to_string(),
                by_period: BTreeMap::new(),
            });
        *entry.by_period.entry(record.period()).or_default() += record.cost();
    }
    services.into_values().collect()
}
