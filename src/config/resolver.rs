//! Profile resolution logic

use super::file::{ConfigFile, ThresholdOverrides};
use super::template::ThresholdProfile;
use crate::recommend::{Heuristics, RecommendationEngine, SeverityThresholds};
use anyhow::{Context, Result};

/// Fully resolved analysis settings
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Preset the thresholds started from
    pub profile: ThresholdProfile,
    /// Preset thresholds with overrides applied
    pub thresholds: SeverityThresholds,
    /// Detector constants
    pub heuristics: Heuristics,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            profile: ThresholdProfile::default(),
            thresholds: ThresholdProfile::default().thresholds(),
            heuristics: Heuristics::default(),
        }
    }
}

impl AnalysisConfig {
    /// Build a recommendation engine with these settings
    pub fn engine(&self) -> RecommendationEngine {
        RecommendationEngine::new(self.thresholds.clone(), self.heuristics.clone())
    }
}

/// Merges the selected preset with overrides from `.cost-optimizer.toml`
///
/// # Examples
///
/// ```
/// use cost_optimizer::config::{ConfigFile, ProfileResolver, ThresholdProfile};
///
/// let config = ConfigFile {
///     profile: "aggressive".to_string(),
///     ..Default::default()
/// };
/// let resolved = ProfileResolver::resolve(&config)?;
/// assert_eq!(resolved.profile, ThresholdProfile::Aggressive);
/// assert_eq!(resolved.thresholds.min_confidence, 25.0);
/// # Ok::<(), anyhow::Error>(())
/// ```
pub struct ProfileResolver;

impl ProfileResolver {
    /// Resolve and validate a config file
    pub fn resolve(config: &ConfigFile) -> Result<AnalysisConfig> {
        let profile: ThresholdProfile = config.profile.parse().map_err(|_| {
            anyhow::anyhow!(
                "Profile '{}' not found (available: {})",
                config.profile,
                ThresholdProfile::names().join(", ")
            )
        })?;

        let mut thresholds = profile.thresholds();
        if let Some(ref overrides) = config.thresholds {
            apply_overrides(&mut thresholds, overrides);
        }
        thresholds
            .validate()
            .context("Invalid [thresholds] configuration")?;

        let heuristics = config.heuristics.clone().unwrap_or_default();
        heuristics
            .validate()
            .context("Invalid [heuristics] configuration")?;

        Ok(AnalysisConfig {
            profile,
            thresholds,
            heuristics,
        })
    }

    /// Create a config file that selects a preset
    pub fn from_profile(profile: ThresholdProfile) -> ConfigFile {
        ConfigFile {
            profile: profile.name().to_string(),
            thresholds: None,
            heuristics: Some(Heuristics::default()),
        }
    }
}

fn apply_overrides(thresholds: &mut SeverityThresholds, overrides: &ThresholdOverrides) {
    if let Some(value) = overrides.high_confidence {
        thresholds.high_confidence = value;
    }
    if let Some(value) = overrides.high_savings_share {
        thresholds.high_savings_share = value;
    }
    if let Some(value) = overrides.medium_confidence {
        thresholds.medium_confidence = value;
    }
    if let Some(value) = overrides.medium_savings_share {
        thresholds.medium_savings_share = value;
    }
    if let Some(value) = overrides.min_confidence {
        thresholds.min_confidence = value;
    }
    if let Some(value) = overrides.min_monthly_savings {
        thresholds.min_monthly_savings = value;
    }
}
