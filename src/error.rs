//! CLI error types with contextual suggestions
//!
//! Provides structured error types that include:
//! - Actionable error messages
//! - Suggested fixes
//! - Exit codes following sysexits.h
//!
//! # Examples
//!
//! ```
//! use cost_optimizer::error::CostOptimizerError;
//! use std::path::PathBuf;
//!
//! let err = CostOptimizerError::InputNotFound {
//!     path: PathBuf::from("billing.csv"),
//! };
//! assert_eq!(err.exit_code(), 66);
//! assert!(err.suggestion().unwrap().contains("cost-optimizer sample"));
//! ```

use std::path::PathBuf;
use thiserror::Error;

use crate::ingest::IngestError;
use crate::pipeline::PipelineError;
use crate::synth::ExportError;

/// Errors surfaced by the command-line front end
#[derive(Error, Debug)]
pub enum CostOptimizerError {
    /// Billing extract does not exist
    #[error("Input file not found: {path}")]
    InputNotFound {
        /// Path given on the command line
        path: PathBuf,
    },

    /// Billing extract is not UTF-8 text
    #[error("Input file is not valid UTF-8: {path}")]
    InvalidEncoding {
        /// Path given on the command line
        path: PathBuf,
    },

    /// Unknown threshold profile name
    #[error("Invalid profile: '{name}'")]
    InvalidProfile {
        /// Name that was given
        name: String,
        /// Valid profile names
        available: Vec<String>,
    },

    /// I/O error with context
    #[error("I/O error: {context}")]
    Io {
        /// Where the error occurred
        context: String,
        #[source]
        /// IO error source
        source: std::io::Error,
    },

    /// Analysis or export failed
    #[error("{0}")]
    Pipeline(#[from] PipelineError),
}

impl CostOptimizerError {
    /// Actionable suggestion for resolving this error
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::InputNotFound { path } => Some(format!(
                "Check that {} exists, or run 'cost-optimizer sample' to write an example extract",
                path.display()
            )),
            Self::InvalidEncoding { .. } => {
                Some("Re-export the billing data as a UTF-8 CSV file".to_string())
            }
            Self::InvalidProfile { available, .. } => {
                Some(format!("Available profiles: {}", available.join(", ")))
            }
            Self::Io { context, .. } => Some(format!(
                "Check file permissions and that {} is accessible",
                context
            )),
            Self::Pipeline(PipelineError::Ingest(IngestError::Schema(_))) => Some(
                "The extract needs a header row with Service, Region, Cost and Date columns"
                    .to_string(),
            ),
            Self::Pipeline(PipelineError::Export(
                ExportError::UnknownRecommendation { .. } | ExportError::EmptySelection,
            )) => Some("Run 'cost-optimizer analyze <FILE>' to list recommendation ids".to_string()),
            Self::Pipeline(_) => None,
        }
    }

    /// Exit code following sysexits.h conventions
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InputNotFound { .. } => 66, // EX_NOINPUT
            Self::InvalidEncoding { .. } => 65, // EX_DATAERR
            Self::InvalidProfile { .. } => 64, // EX_USAGE
            Self::Io { .. } => 74,            // EX_IOERR
            Self::Pipeline(PipelineError::Ingest(_)) => 65, // EX_DATAERR
            Self::Pipeline(PipelineError::Export(
                ExportError::UnknownRecommendation { .. }
                | ExportError::DuplicateRecommendation { .. }
                | ExportError::EmptySelection,
            )) => 64,
            Self::Pipeline(_) => 70, // EX_SOFTWARE
        }
    }

    /// Returns the pipeline error if this is a `Pipeline` variant
    pub fn as_pipeline_error(&self) -> Option<&PipelineError> {
        match self {
            Self::Pipeline(e) => Some(e),
            _ => None,
        }
    }
}

/// Error formatter with colors and structured output
pub struct ErrorFormatter;

impl ErrorFormatter {
    /// Format an error chain with its suggestion
    pub fn format(error: &anyhow::Error) -> String {
        use console::style;

        let mut output = format!("{} {}\n", style("error:").red().bold(), error);

        let mut indent = 1;
        for cause in error.chain().skip(1) {
            output.push_str(&format!(
                "{}{} {}\n",
                "  ".repeat(indent),
                style("caused by:").yellow(),
                cause
            ));
            indent += 1;
        }

        if let Some(suggestion) = Self::find(error).and_then(CostOptimizerError::suggestion) {
            output.push_str(&format!("\n{} {}\n", style("help:").cyan().bold(), suggestion));
        }

        output
    }

    /// Exit code for an error chain; 1 when no known error is inside
    pub fn exit_code(error: &anyhow::Error) -> i32 {
        Self::find(error).map_or(1, CostOptimizerError::exit_code)
    }

    fn find(error: &anyhow::Error) -> Option<&CostOptimizerError> {
        error
            .chain()
            .find_map(|cause| cause.downcast_ref::<CostOptimizerError>())
    }
}
