//! Confidence scoring and severity classification

use super::recommendation::Severity;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Evidence behind a finding, used to derive its confidence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evidence {
    /// Number of supporting samples (rows or periods)
    pub samples: usize,
    /// How far beyond the trigger threshold the signal sits, 0.0-1.0
    pub margin: f64,
    /// Periods in which the signal was observed
    pub periods_observed: usize,
    /// Periods in the dataset
    pub total_periods: usize,
}

impl Evidence {
    /// Confidence in 0-100, rounded to one decimal
    ///
    /// 40 base points, up to 30 for sample size (saturating), up to 20 for
    /// margin and up to 10 for period coverage.
    ///
    /// # Examples
    ///
    /// ```
    /// use cost_optimizer::recommend::scoring::Evidence;
    ///
    /// let weak = Evidence { samples: 1, margin: 0.1, periods_observed: 1, total_periods: 6 };
    /// let strong = Evidence { samples: 40, margin: 0.9, periods_observed: 6, total_periods: 6 };
    /// assert!(weak.confidence() < strong.confidence());
    /// assert!(strong.confidence() <= 100.0);
    /// ```
    pub fn confidence(&self) -> f64 {
        let sample_score = 30.0 * (1.0 - (-(self.samples as f64) / 4.0).exp());
        let margin_score = 20.0 * clamp_unit(self.margin);
        let coverage = if self.total_periods == 0 {
            0.0
        } else {
            self.periods_observed as f64 / self.total_periods as f64
        };
        let coverage_score = 10.0 * clamp_unit(coverage);
        round_confidence(40.0 + sample_score + margin_score + coverage_score)
    }
}

/// Clamp to [0, 100] and round to one decimal; NaN becomes 0
pub fn round_confidence(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    (value.clamp(0.0, 100.0) * 10.0).round() / 10.0
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Thresholds mapping confidence and savings share to severity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SeverityThresholds {
    /// Confidence at or above which a finding is High
    pub high_confidence: f64,
    /// Savings share of total spend at or above which a finding is High
    pub high_savings_share: f64,
    /// Confidence at or above which a finding is Medium
    pub medium_confidence: f64,
    /// Savings share at or above which a finding is Medium
    pub medium_savings_share: f64,
    /// Findings below this confidence are dropped
    pub min_confidence: f64,
    /// Findings saving less than this per month are dropped
    pub min_monthly_savings: Decimal,
}

impl Default for SeverityThresholds {
    fn default() -> Self {
        Self {
            high_confidence: 90.0,
            high_savings_share: 0.10,
            medium_confidence: 50.0,
            medium_savings_share: 0.02,
            min_confidence: 40.0,
            min_monthly_savings: Decimal::ONE,
        }
    }
}

impl SeverityThresholds {
    /// Check that thresholds are ordered and in range
    pub fn validate(&self) -> anyhow::Result<()> {
        let confidences = [self.min_confidence, self.medium_confidence, self.high_confidence];
        if confidences.iter().any(|c| !(0.0..=100.0).contains(c)) {
            anyhow::bail!("Confidence thresholds must be between 0 and 100");
        }
        if !(self.min_confidence <= self.medium_confidence
            && self.medium_confidence <= self.high_confidence)
        {
            anyhow::bail!(
                "Confidence thresholds must satisfy min ({}) <= medium ({}) <= high ({})",
                self.min_confidence,
                self.medium_confidence,
                self.high_confidence
            );
        }
        for share in [self.medium_savings_share, self.high_savings_share] {
            if !(0.0..=1.0).contains(&share) {
                anyhow::bail!("Savings shares must be between 0 and 1 (got {})", share);
            }
        }
        if self.medium_savings_share > self.high_savings_share {
            anyhow::bail!(
                "medium-savings-share ({}) cannot exceed high-savings-share ({})",
                self.medium_savings_share,
                self.high_savings_share
            );
        }
        if self.min_monthly_savings.is_sign_negative() && !self.min_monthly_savings.is_zero() {
            anyhow::bail!("min-monthly-savings cannot be negative");
        }
        Ok(())
    }

    /// Classify a finding; `None` means it is suppressed
    ///
    /// # Examples
    ///
    /// ```
    /// use cost_optimizer::recommend::scoring::SeverityThresholds;
    /// use cost_optimizer::recommend::Severity;
    /// use rust_decimal::Decimal;
    ///
    /// let thresholds = SeverityThresholds::default();
    /// let total = Decimal::from(1000);
    /// assert_eq!(thresholds.classify(95.0, Decimal::from(400), total), Some(Severity::High));
    /// assert_eq!(thresholds.classify(60.0, Decimal::from(50), total), Some(Severity::Medium));
    /// assert_eq!(thresholds.classify(30.0, Decimal::from(50), total), None);
    /// ```
    pub fn classify(&self, confidence: f64, savings: Decimal, total_cost: Decimal) -> Option<Severity> {
        if confidence < self.min_confidence || savings < self.min_monthly_savings {
            return None;
        }

        let share = if total_cost.is_zero() {
            0.0
        } else {
            (savings / total_cost).to_f64().unwrap_or(0.0)
        };

        if confidence >= self.high_confidence || share >= self.high_savings_share {
            Some(Severity::High)
        } else if confidence >= self.medium_confidence || share >= self.medium_savings_share {
            Some(Severity::Medium)
        } else {
            Some(Severity::Low)
        }
    }
}
