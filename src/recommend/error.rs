//! Error types for the recommendation engine

use thiserror::Error;

/// Errors raised while producing recommendations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Aggregate does not describe the records it was paired with
    #[error("aggregate is inconsistent with records: {reason}")]
    Consistency {
        /// What did not match
        reason: String,
    },
}
