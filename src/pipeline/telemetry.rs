//! Telemetry hooks for the analysis pipeline
//!
//! Collectors receive lifecycle events and per-stage durations. The default
//! collector discards everything; [`LogCollector`] forwards to the `log`
//! facade and [`MemoryCollector`] keeps data for inspection in tests.

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::time::Duration;

/// Pipeline lifecycle events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineEvent {
    /// An analysis run started
    AnalysisStarted,
    /// An analysis run committed a new session
    AnalysisCompleted,
    /// An analysis run failed; the previous session was kept
    AnalysisFailed,
    /// A Terraform export finished
    ExportCompleted,
}

impl PipelineEvent {
    /// Event name in snake case
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineEvent::AnalysisStarted => "analysis_started",
            PipelineEvent::AnalysisCompleted => "analysis_completed",
            PipelineEvent::AnalysisFailed => "analysis_failed",
            PipelineEvent::ExportCompleted => "export_completed",
        }
    }
}

/// Event metadata, ordered by key
pub type Metadata = BTreeMap<String, String>;

/// Metric data point
#[derive(Debug, Clone, PartialEq)]
pub struct MetricData {
    /// Metric name
    pub name: String,
    /// Metric value
    pub value: f64,
    /// Tags for categorization
    pub tags: Metadata,
}

impl MetricData {
    /// Create a new metric
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            tags: Metadata::new(),
        }
    }

    /// Add a tag
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }
}

/// Trait for pluggable metrics collection
pub trait MetricsCollector: Send + Sync {
    /// Collector name
    fn name(&self) -> &str;

    /// Record a pipeline event
    fn record_event(&self, event: PipelineEvent, metadata: Metadata);

    /// Record a metric value
    fn record_metric(&self, metric: MetricData);

    /// Record how long a stage took
    fn record_duration(&self, stage: &str, duration: Duration) {
        let metric = MetricData::new(format!("{}_duration_ms", stage), duration.as_secs_f64() * 1000.0)
            .with_tag("stage", stage);
        self.record_metric(metric);
    }

    /// Record a count (rows, recommendations)
    fn record_count(&self, label: &str, count: usize) {
        let metric = MetricData::new(format!("{}_count", label), count as f64).with_tag("label", label);
        self.record_metric(metric);
    }
}

/// No-op collector (default)
pub struct NoOpCollector;

impl MetricsCollector for NoOpCollector {
    fn name(&self) -> &str {
        "noop"
    }

    fn record_event(&self, _event: PipelineEvent, _metadata: Metadata) {}

    fn record_metric(&self, _metric: MetricData) {}
}

/// Forwards telemetry to the `log` facade at debug level
pub struct LogCollector;

impl MetricsCollector for LogCollector {
    fn name(&self) -> &str {
        "log"
    }

    fn record_event(&self, event: PipelineEvent, metadata: Metadata) {
        if metadata.is_empty() {
            log::debug!("[telemetry] {}", event.as_str());
        } else {
            log::debug!("[telemetry] {} {:?}", event.as_str(), metadata);
        }
    }

    fn record_metric(&self, metric: MetricData) {
        log::debug!("[telemetry] {} = {} {:?}", metric.name, metric.value, metric.tags);
    }
}

/// Event with metadata
type EventRecord = (PipelineEvent, Metadata);

/// In-memory collector for testing
#[derive(Default)]
pub struct MemoryCollector {
    events: Mutex<Vec<EventRecord>>,
    metrics: Mutex<Vec<MetricData>>,
}

impl MemoryCollector {
    /// Create a new memory collector
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded events
    pub fn events(&self) -> Vec<EventRecord> {
        self.events.lock().clone()
    }

    /// Recorded event kinds, in order
    pub fn event_kinds(&self) -> Vec<PipelineEvent> {
        self.events.lock().iter().map(|(event, _)| *event).collect()
    }

    /// All recorded metrics
    pub fn metrics(&self) -> Vec<MetricData> {
        self.metrics.lock().clone()
    }

    /// Clear all recorded data
    pub fn clear(&self) {
        self.events.lock().clear();
        self.metrics.lock().clear();
    }
}

impl MetricsCollector for MemoryCollector {
    fn name(&self) -> &str {
        "memory"
    }

    fn record_event(&self, event: PipelineEvent, metadata: Metadata) {
        self.events.lock().push((event, metadata));
    }

    fn record_metric(&self, metric: MetricData) {
        self.metrics.lock().push(metric);
    }
}
