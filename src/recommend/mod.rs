//! Cost-optimization recommendations
//!
//! Detectors emit unranked opportunities from normalized records; the
//! [`RecommendationEngine`] bounds, classifies and ranks them.
//!
//! Grouping is one recommendation per (rule, service): every
//! over-provisioned EC2 instance lands in a single EC2 right-sizing
//! recommendation that lists the affected resources.

pub mod detector;
pub mod detectors;
pub mod engine;
pub mod error;
pub mod heuristics;
pub mod recommendation;
pub mod scoring;

pub use detector::{Detector, DetectorRegistry};
pub use engine::RecommendationEngine;
pub use error::EngineError;
pub use heuristics::Heuristics;
pub use recommendation::{
    ActionKind, AffectedResource, Category, Opportunity, Recommendation, Severity,
};
pub use scoring::SeverityThresholds;
