//! Test assertion helpers
//!
//! Invariants every analysis result must satisfy, checked the same way in
//! unit, integration and property tests.

#![allow(dead_code)]

use cost_optimizer::recommend::Recommendation;
use rust_decimal::Decimal;

/// Assert that two amounts differ by at most `tolerance`
pub fn assert_money_within(actual: Decimal, expected: Decimal, tolerance: Decimal) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "Amounts not within tolerance:\n  actual: {}\n  expected: {}\n  diff: {} (tolerance: {})",
        actual,
        expected,
        diff,
        tolerance
    );
}

/// Assert savings are bounded and projections add up
pub fn assert_savings_invariants(recommendations: &[Recommendation]) {
    for rec in recommendations {
        assert!(
            rec.estimated_monthly_savings >= Decimal::ZERO,
            "#{} has negative savings",
            rec.id
        );
        assert!(
            rec.estimated_monthly_savings <= rec.current_monthly_cost,
            "#{} saves more than it costs",
            rec.id
        );
        assert_eq!(
            rec.projected_monthly_cost,
            rec.current_monthly_cost - rec.estimated_monthly_savings,
            "#{} projection does not add up",
            rec.id
        );
        assert!(
            (0.0..=100.0).contains(&rec.confidence),
            "#{} confidence {} out of range",
            rec.id,
            rec.confidence
        );
    }
}

/// Assert recommendations are ranked by savings and numbered from 1
pub fn assert_ranked(recommendations: &[Recommendation]) {
    for (i, rec) in recommendations.iter().enumerate() {
        assert_eq!(rec.id as usize, i + 1, "ids must be sequential from 1");
    }
    for pair in recommendations.windows(2) {
        assert!(
            pair[0].estimated_monthly_savings >= pair[1].estimated_monthly_savings,
            "#{} ranked above #{} with lower savings",
            pair[0].id,
            pair[1].id
        );
    }
}
