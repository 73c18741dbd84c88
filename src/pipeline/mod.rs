//! Analysis pipeline orchestration
//!
//! Chains the stages over one billing extract:
//! 1. Normalize raw CSV into cost records (row errors are kept, not fatal)
//! 2. Aggregate totals per service, region and month
//! 3. Run detectors and rank recommendations
//! 4. Export selected recommendations as Terraform (on request)
//!
//! Results are committed per session id; a failed run never replaces the
//! previous result.

pub mod error;
pub mod orchestrator;
pub mod report;
pub mod session;
pub mod telemetry;

pub use error::PipelineError;
pub use orchestrator::Pipeline;
pub use report::AnalysisReport;
pub use session::{AnalysisSession, SessionId, SessionStore};
pub use telemetry::{
    LogCollector, MemoryCollector, MetricData, MetricsCollector, NoOpCollector, PipelineEvent,
};
