//! Pluggable detector system
//!
//! Detectors inspect normalized records and emit unranked
//! [`Opportunity`] values. The engine owns scoring, ranking and id
//! assignment, so new detectors only register here.

use super::heuristics::Heuristics;
use super::recommendation::{ActionKind, AffectedResource, Category, Opportunity};
use super::scoring::Evidence;
use crate::aggregate::AggregateResult;
use crate::ingest::{CostRecord, Period};
use parking_lot::Mutex;
use rayon::prelude::*;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Trait for cost-optimization detectors
pub trait Detector: Send + Sync {
    /// Detector name
    fn name(&self) -> &str;

    /// Category of the opportunities this detector emits
    fn category(&self) -> Category;

    /// Inspect records and emit opportunities
    ///
    /// A detector without the signals it needs returns an empty list.
    fn detect(
        &self,
        records: &[CostRecord],
        aggregate: &AggregateResult,
        heuristics: &Heuristics,
    ) -> Vec<Opportunity>;
}

/// Registry for managing detectors
#[derive(Default)]
pub struct DetectorRegistry {
    detectors: Mutex<Vec<Arc<dyn Detector>>>,
}

impl DetectorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in detectors
    pub fn with_builtin() -> Self {
        let registry = Self::new();
        for detector in super::detectors::builtin() {
            registry.register(detector);
        }
        registry
    }

    /// Register a detector; detectors run in registration order
    pub fn register(&self, detector: Arc<dyn Detector>) {
        self.detectors.lock().push(detector);
    }

    /// Run every detector and merge their output in registration order
    pub fn run_all(
        &self,
        records: &[CostRecord],
        aggregate: &AggregateResult,
        heuristics: &Heuristics,
    ) -> Vec<Opportunity> {
        let detectors: Vec<Arc<dyn Detector>> = self.detectors.lock().clone();

        let per_detector: Vec<Vec<Opportunity>> = detectors
            .par_iter()
            .map(|detector| {
                let found = detector.detect(records, aggregate, heuristics);
                log::debug!("Detector '{}' found {} opportunities", detector.name(), found.len());
                found
            })
            .collect();

        per_detector.into_iter().flatten().collect()
    }

    /// Names of registered detectors
    pub fn names(&self) -> Vec<String> {
        self.detectors
            .lock()
            .iter()
            .map(|d| d.name().to_string())
            .collect()
    }

    /// Remove all detectors
    pub fn clear(&self) {
        self.detectors.lock().clear();
    }

    /// Number of registered detectors
    pub fn count(&self) -> usize {
        self.detectors.lock().len()
    }
}

/// Identity of a billed resource within one service
///
/// Rows with a resource id are keyed by it. Rows without one are keyed by
/// region and instance type, so repeated monthly rows count once.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum ResourceKey {
    Id(String),
    Unnamed {
        region: String,
        instance_type: Option<String>,
    },
}

impl ResourceKey {
    pub(crate) fn of(record: &CostRecord) -> Self {
        match record.resource_id() {
            Some(id) => Self::Id(id.to_string()),
            None => Self::Unnamed {
                region: record.region().to_string(),
                instance_type: record.signals().instance_type.clone(),
            },
        }
    }
}

/// Records flagged by one rule for one service
///
/// Shared accumulator for the resource-level detectors.
#[derive(Debug, Default)]
pub(crate) struct FlaggedGroup {
    cost: Decimal,
    samples: usize,
    margin_total: f64,
    periods: BTreeSet<Period>,
    keys: BTreeSet<ResourceKey>,
    resources: Vec<AffectedResource>,
}

impl FlaggedGroup {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Add a flagged record with its margin beyond the threshold
    pub(crate) fn add(&mut self, record: &CostRecord, margin: f64, target_type: Option<String>) {
        self.cost += record.cost();
        self.samples += 1;
        self.margin_total += margin.clamp(0.0, 1.0);
        self.periods.insert(record.period());

        if self.keys.insert(ResourceKey::of(record)) {
            self.resources.push(AffectedResource {
                resource_id: record.resource_id().map(str::to_string),
                service: record.service().to_string(),
                region: record.region().to_string(),
                current_type: record.signals().instance_type.clone(),
                target_type,
            });
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.samples == 0
    }

    /// Distinct resources flagged so far
    pub(crate) fn resource_len(&self) -> usize {
        self.resources.len()
    }

    /// Convert into an opportunity, or `None` when nothing was flagged
    pub(crate) fn into_opportunity(
        self,
        spec: OpportunitySpec,
        aggregate: &AggregateResult,
    ) -> Option<Opportunity> {
        if self.is_empty() {
            return None;
        }

        let evidence = Evidence {
            samples: self.samples,
            margin: self.margin_total / self.samples as f64,
            periods_observed: self.periods.len(),
            total_periods: aggregate.period_count(),
        };
        let current = monthly(self.cost, aggregate.period_count());

        Some(Opportunity {
            category: spec.category,
            title: spec.title,
            description: spec.description,
            action: spec.action,
            action_kind: spec.action_kind,
            confidence: evidence.confidence(),
            current_monthly_cost: current,
            estimated_monthly_savings: savings(current, spec.savings_fraction),
            affected_resource_count: self.resources.len(),
            resources: self.resources,
        })
    }
}

/// Labels for a flagged group
#[derive(Debug, Clone)]
pub(crate) struct OpportunitySpec {
    pub category: Category,
    pub title: String,
    pub description: String,
    pub action: String,
    pub action_kind: ActionKind,
    pub savings_fraction: f64,
}

/// Spread a dataset-wide amount over its months
pub(crate) fn monthly(amount: Decimal, period_count: usize) -> Decimal {
    amount / Decimal::from(period_count.max(1))
}

/// Savings for a cost at a fraction, bounded to `[0, current]`
pub(crate) fn savings(current: Decimal, fraction: f64) -> Decimal {
    let fraction = Decimal::from_f64(fraction.clamp(0.0, 1.0))
        .unwrap_or(Decimal::ZERO)
        .round_dp(4);
    (current * fraction).clamp(Decimal::ZERO, current.max(Decimal::ZERO))
}

/// Distinct resources among `records`, by [`ResourceKey`]
pub(crate) fn affected_count<'a>(records: impl Iterator<Item = &'a CostRecord>) -> usize {
    records.map(ResourceKey::of).collect::<BTreeSet<_>>().len()
}
