//! Error types for infrastructure config export

use thiserror::Error;

/// Errors raised while exporting recommendations as Terraform
#[derive(Error, Debug)]
pub enum ExportError {
    /// An explicit selection named no recommendations
    #[error("no recommendations selected for export")]
    EmptySelection,

    /// A selected id does not exist in the session
    #[error("recommendation {id} does not exist")]
    UnknownRecommendation {
        /// Requested id
        id: u32,
    },

    /// Two input recommendations share an id
    #[error("recommendation id {id} appears more than once")]
    DuplicateRecommendation {
        /// Repeated id
        id: u32,
    },

    /// A recommendation violates the amount invariants
    #[error("invalid recommendation: {reason}")]
    InvalidRecommendation {
        /// Violated invariant
        reason: String,
    },

    /// The rendered script failed to parse as HCL
    #[error("generated Terraform is not valid HCL: {reason}")]
    InvalidScript {
        /// Parser message
        reason: String,
    },

    /// Writing the script buffer failed
    #[error("failed to render Terraform: {0}")]
    Render(#[from] std::fmt::Error),
}
