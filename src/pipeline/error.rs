//! Error types for the analysis pipeline

use crate::ingest::IngestError;
use crate::recommend::EngineError;
use crate::synth::ExportError;
use thiserror::Error;

/// Errors that can occur during pipeline execution
///
/// A failed analysis leaves the session's previous result in place.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The extract could not be ingested
    #[error("Ingestion failed: {0}")]
    Ingest(#[from] IngestError),

    /// The engine rejected its input
    #[error("Recommendation failed: {0}")]
    Engine(#[from] EngineError),

    /// Export failed; nothing was written
    #[error("Export failed: {0}")]
    Export(#[from] ExportError),
}

impl PipelineError {
    /// Stage that failed, for telemetry
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::Ingest(_) => "ingest",
            PipelineError::Engine(_) => "recommend",
            PipelineError::Export(_) => "export",
        }
    }
}
