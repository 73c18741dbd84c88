//! Billing extract ingestion
//!
//! Turns raw delimited text into typed [`CostRecord`]s:
//! - Header-driven, case-insensitive column mapping
//! - Per-row validation with recoverable [`RowError`]s
//! - Optional usage-signal columns for resource-level detectors

pub mod error;
pub mod normalizer;
pub mod record;

pub use error::{IngestError, RowError, SchemaError};
pub use normalizer::{normalize, Normalized, RecordNormalizer, REQUIRED_COLUMNS};
pub use record::{CostRecord, Period, UsageSignals, MAX_COST, UNKNOWN};
