//! Infrastructure-as-code synthesis
//!
//! Turns recommendations into a Terraform script. The output is a pure
//! function of its input (no timestamps or generated ids) and is parsed back
//! with `hcl-rs` before it is returned.

pub mod error;
pub mod terraform;

pub use error::ExportError;

use crate::recommend::Recommendation;
use hcl::Body;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A rendered Terraform script with its savings summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesizedConfig {
    /// Terraform HCL text
    pub script: String,
    /// Sum of monthly savings over every exported recommendation
    pub total_monthly_savings: Decimal,
    /// Recommendations that produced at least one block
    pub optimization_count: usize,
}

/// Stateless Terraform synthesizer
///
/// # Examples
///
/// ```
/// use cost_optimizer::synth::ConfigSynthesizer;
///
/// let config = ConfigSynthesizer::new().synthesize(&[])?;
/// assert_eq!(config.optimization_count, 0);
/// assert!(config.script.starts_with("# Cost optimization plan"));
/// # Ok::<(), cost_optimizer::synth::ExportError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigSynthesizer;

impl ConfigSynthesizer {
    /// Create a synthesizer
    pub fn new() -> Self {
        Self
    }

    /// Render every recommendation
    ///
    /// An empty list yields a header-only script.
    ///
    /// # Errors
    /// Fails on duplicate ids, recommendations violating the savings
    /// invariants, or a script that does not parse as HCL.
    pub fn synthesize(&self, recommendations: &[Recommendation]) -> Result<SynthesizedConfig, ExportError> {
        check_input(recommendations)?;

        let rendered = terraform::render(recommendations)?;
        validate_script(&rendered.script)?;

        let total_monthly_savings = recommendations
            .iter()
            .map(|r| r.estimated_monthly_savings)
            .sum();

        log::debug!(
            "Synthesized {} of {} recommendations into {} bytes of Terraform",
            rendered.optimization_count,
            recommendations.len(),
            rendered.script.len()
        );

        Ok(SynthesizedConfig {
            script: rendered.script,
            total_monthly_savings,
            optimization_count: rendered.optimization_count,
        })
    }

    /// Render only the recommendations named by `ids`
    ///
    /// Selected recommendations keep their ranking order; repeated ids are
    /// exported once.
    ///
    /// # Errors
    /// [`ExportError::EmptySelection`] for an empty id list and
    /// [`ExportError::UnknownRecommendation`] for an id that is not present.
    pub fn synthesize_selected(
        &self,
        recommendations: &[Recommendation],
        ids: &[u32],
    ) -> Result<SynthesizedConfig, ExportError> {
        let selected = select(recommendations, ids)?;
        self.synthesize(&selected)
    }
}

/// Pick recommendations by id, in ranking order
pub fn select(recommendations: &[Recommendation], ids: &[u32]) -> Result<Vec<Recommendation>, ExportError> {
    if ids.is_empty() {
        return Err(ExportError::EmptySelection);
    }
    let wanted: HashSet<u32> = ids.iter().copied().collect();
    if let Some(&missing) = ids
        .iter()
        .find(|id| !recommendations.iter().any(|r| r.id == **id))
    {
        return Err(ExportError::UnknownRecommendation { id: missing });
    }
    Ok(recommendations
        .iter()
        .filter(|r| wanted.contains(&r.id))
        .cloned()
        .collect())
}

fn check_input(recommendations: &[Recommendation]) -> Result<(), ExportError> {
    let mut seen = HashSet::new();
    for rec in recommendations {
        if !seen.insert(rec.id) {
            return Err(ExportError::DuplicateRecommendation { id: rec.id });
        }
        rec.check_invariants()
            .map_err(|reason| ExportError::InvalidRecommendation { reason })?;
    }
    Ok(())
}

fn validate_script(script: &str) -> Result<(), ExportError> {
    hcl::from_str::<Body>(script)
        .map(|_| ())
        .map_err(|e| ExportError::InvalidScript { reason: e.to_string() })
}
