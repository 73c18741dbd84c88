//! Threshold presets
//!
//! - `conservative`: only strong, sizeable findings are surfaced
//! - `balanced`: default severity cut-offs
//! - `aggressive`: surfaces weaker signals and smaller savings

use crate::recommend::SeverityThresholds;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity threshold preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdProfile {
    /// Fewer, higher-confidence recommendations
    Conservative,
    /// Default cut-offs
    #[default]
    Balanced,
    /// More recommendations, including weak signals
    Aggressive,
}

impl FromStr for ThresholdProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "conservative" => Ok(Self::Conservative),
            "balanced" => Ok(Self::Balanced),
            "aggressive" => Ok(Self::Aggressive),
            _ => Err(format!("Unknown threshold profile: {}", s)),
        }
    }
}

impl fmt::Display for ThresholdProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl ThresholdProfile {
    /// Every preset, strictest first
    pub const ALL: [ThresholdProfile; 3] = [Self::Conservative, Self::Balanced, Self::Aggressive];

    /// Profile name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Conservative => "conservative",
            Self::Balanced => "balanced",
            Self::Aggressive => "aggressive",
        }
    }

    /// Profile description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Conservative => "Only high-confidence findings with sizeable savings",
            Self::Balanced => "Default severity cut-offs (recommended)",
            Self::Aggressive => "Surface weak signals and small savings",
        }
    }

    /// Names of every preset
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|p| p.name()).collect()
    }

    /// Thresholds for this preset
    ///
    /// # Examples
    ///
    /// ```
    /// use cost_optimizer::config::ThresholdProfile;
    ///
    /// let thresholds = ThresholdProfile::Balanced.thresholds();
    /// assert_eq!(thresholds.high_confidence, 90.0);
    /// assert_eq!(thresholds.min_confidence, 40.0);
    /// ```
    pub fn thresholds(&self) -> SeverityThresholds {
        match self {
            Self::Conservative => SeverityThresholds {
                high_confidence: 95.0,
                high_savings_share: 0.15,
                medium_confidence: 70.0,
                medium_savings_share: 0.05,
                min_confidence: 55.0,
                min_monthly_savings: Decimal::from(5),
            },
            Self::Balanced => SeverityThresholds::default(),
            Self::Aggressive => SeverityThresholds {
                high_confidence: 80.0,
                high_savings_share: 0.05,
                medium_confidence: 40.0,
                medium_savings_share: 0.01,
                min_confidence: 25.0,
                min_monthly_savings: Decimal::ZERO,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_from_str_ignores_case() {
        assert_eq!("Aggressive".parse::<ThresholdProfile>(), Ok(ThresholdProfile::Aggressive));
        assert_eq!(" balanced ".parse::<ThresholdProfile>(), Ok(ThresholdProfile::Balanced));
        assert!("turbo".parse::<ThresholdProfile>().is_err());
    }

    #[test]
    fn test_every_preset_is_valid() {
        for profile in ThresholdProfile::ALL {
            assert!(profile.thresholds().validate().is_ok(), "{profile} is invalid");
        }
    }

    #[test]
    fn test_presets_order_by_strictness() {
        let conservative = ThresholdProfile::Conservative.thresholds();
        let balanced = ThresholdProfile::Balanced.thresholds();
        let aggressive = ThresholdProfile::Aggressive.thresholds();

        assert!(conservative.min_confidence > balanced.min_confidence);
        assert!(balanced.min_confidence > aggressive.min_confidence);
        assert!(conservative.high_savings_share > aggressive.high_savings_share);
    }

    #[test]
    fn test_names_lists_every_profile() {
        assert_eq!(ThresholdProfile::names(), vec!["conservative", "balanced", "aggressive"]);
        assert_eq!(ThresholdProfile::default(), ThresholdProfile::Balanced);
    }
}
