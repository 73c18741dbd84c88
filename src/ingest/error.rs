//! Error types for billing extract ingestion

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Problems with the header row of an extract
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Input has no header row
    #[error("input has no header row")]
    MissingHeader,

    /// Header lacks one or more required columns
    #[error("missing required column(s): {}", missing.join(", "))]
    MissingColumns {
        /// Canonical names of the missing columns
        missing: Vec<String>,
    },
}

/// Fatal ingestion errors; nothing is aggregated when one occurs
#[derive(Error, Debug)]
pub enum IngestError {
    /// Header row is absent or incomplete
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Header row could not be read
    #[error("failed to read CSV header: {0}")]
    Csv(#[from] csv::Error),
}

impl IngestError {
    /// True for errors caused by the shape of the header
    pub fn is_schema_error(&self) -> bool {
        matches!(self, Self::Schema(_))
    }
}

/// A data row that was skipped during normalization
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("line {line}: {reason}")]
pub struct RowError {
    /// 1-based line number in the input
    pub line: u64,
    /// Raw row content, fields re-joined with commas
    pub raw: String,
    /// Why the row was rejected
    pub reason: String,
}
