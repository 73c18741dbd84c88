#![warn(missing_docs)]
#![warn(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! cost-optimizer library
//!
//! This library provides the core functionality for cloud billing analysis:
//! normalizing billing extracts, aggregating spend, detecting
//! cost-optimization opportunities and exporting them as Terraform.
//! It can be used programmatically in addition to the CLI interface.
//!
//! # Basic Example
//!
//! ```
//! use cost_optimizer::pipeline::{Pipeline, SessionId};
//! use rust_decimal::Decimal;
//!
//! let csv = "Service,Region,Cost,Date\n\
//!            EC2,us-east-1,450.00,2025-09\n\
//!            S3,us-east-1,850.00,2025-09\n";
//!
//! let pipeline = Pipeline::default();
//! let session = pipeline.analyze(&SessionId::generate(), csv)?;
//! let report = session.report();
//!
//! assert_eq!(report.total_cost, Decimal::new(130000, 2));
//! assert_eq!(report.total_rows, 2);
//! assert_eq!(report.services.len(), 2);
//! # Ok::<(), cost_optimizer::pipeline::PipelineError>(())
//! ```
//!
//! # Advanced Example: Custom Thresholds
//!
//! ```
//! use cost_optimizer::config::{ConfigFile, ProfileResolver};
//! use cost_optimizer::pipeline::Pipeline;
//!
//! let config = ConfigFile {
//!     profile: "conservative".to_string(),
//!     ..Default::default()
//! };
//! let resolved = ProfileResolver::resolve(&config)?;
//! let pipeline = Pipeline::new(resolved.engine());
//! assert_eq!(pipeline.engine().thresholds().min_confidence, 55.0);
//! # Ok::<(), anyhow::Error>(())
//! ```

/// Spend totals per service, region and month
pub mod aggregate;
/// Command handlers for CLI operations
pub mod cmd;
/// Configuration file and threshold profiles
pub mod config;
/// CLI error types with contextual suggestions
pub mod error;
/// Shared formatting utilities
pub mod fmt;
/// Infrastructure traits for filesystem access
pub mod infra;
/// Billing extract parsing and normalization
pub mod ingest;
/// Analysis pipeline orchestration
pub mod pipeline;
/// Opportunity detection and ranking
pub mod recommend;
/// Terraform synthesis
pub mod synth;
