//! `.cost-optimizer.toml` file model

use crate::recommend::Heuristics;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Configuration file name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = ".cost-optimizer.toml";

/// Parsed `.cost-optimizer.toml`
///
/// ```toml
/// profile = "balanced"
///
/// [thresholds]
/// min-confidence = 35.0
///
/// [heuristics]
/// ec2-cpu-threshold = 25.0
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConfigFile {
    /// Threshold preset name
    #[serde(default = "default_profile")]
    pub profile: String,

    /// Per-field overrides applied over the preset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thresholds: Option<ThresholdOverrides>,

    /// Detector constants
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heuristics: Option<Heuristics>,
}

fn default_profile() -> String {
    "balanced".to_string()
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            profile: default_profile(),
            thresholds: None,
            heuristics: None,
        }
    }
}

/// `[thresholds]` table; unset fields keep the preset value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ThresholdOverrides {
    /// High confidence cut-off
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high_confidence: Option<f64>,
    /// High savings share cut-off
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high_savings_share: Option<f64>,
    /// Medium confidence cut-off
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medium_confidence: Option<f64>,
    /// Medium savings share cut-off
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medium_savings_share: Option<f64>,
    /// Minimum confidence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_confidence: Option<f64>,
    /// Minimum monthly savings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_monthly_savings: Option<Decimal>,
}

impl ThresholdOverrides {
    /// Whether no field is set
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
