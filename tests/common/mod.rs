//! Common test utilities and helpers
//!
//! This module provides shared functionality for integration tests:
//! - Assertion helpers for money and ranking invariants
//! - Billing extract fixtures
//!
//! # Usage
//!
//! ```rust,no_run
//! mod common;
//! use common::{assertions::*, fixtures};
//!
//! let (_dir, path) = fixtures::write_extract(fixtures::SAMPLE_CSV).unwrap();
//! ```

pub mod assertions;
pub mod fixtures;
