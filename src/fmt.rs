//! Shared formatting utilities for money display and console output

use console::Emoji;
use rust_decimal::{Decimal, RoundingStrategy};

/// Magnifier emoji for analysis
pub const MICROSCOPE: Emoji = Emoji("🔍", ">>");

/// Checkmark emoji for success
pub const CHECKMARK: Emoji = Emoji("✅", "[OK]");

/// Sparkles emoji for completion
pub const SPARKLES: Emoji = Emoji("✨", "*");

/// Info emoji for informational messages
pub const INFO: Emoji = Emoji("ℹ️", "i");

/// Chart emoji for breakdowns
pub const CHART: Emoji = Emoji("📊", "~");

/// Warning emoji for skipped rows and alerts
pub const WARNING: Emoji = Emoji("⚠️", "!");

/// Money emoji for savings
pub const MONEY: Emoji = Emoji("💰", "$");

/// Rocket emoji for start operations
pub const ROCKET: Emoji = Emoji("🚀", ">");

/// Format an amount as dollars with thousands separators
///
/// # Examples
///
/// ```
/// use cost_optimizer::fmt::format_currency;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_currency(Decimal::new(123456789, 2)), "$1,234,567.89");
/// assert_eq!(format_currency(Decimal::new(5, 1)), "$0.50");
/// assert_eq!(format_currency(Decimal::new(-1050, 0)), "-$1,050.00");
/// ```
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded.abs());
    let (whole, frac) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}${}.{}", sign, grouped, frac)
}

/// Format a percentage with one decimal place
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_currency_various_amounts() {
        assert_eq!(format_currency(dec!(0)), "$0.00");
        assert_eq!(format_currency(dec!(999.999)), "$1,000.00");
        assert_eq!(format_currency(dec!(130.5)), "$130.50");
        assert_eq!(format_currency(dec!(3065)), "$3,065.00");
        assert_eq!(format_currency(dec!(100000)), "$100,000.00");
        assert_eq!(format_currency(dec!(-0.001)), "$0.00");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(4.3), "4.3%");
        assert_eq!(format_percent(0.0), "0.0%");
    }
}
