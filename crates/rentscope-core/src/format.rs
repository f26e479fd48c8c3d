//! Display helpers for the presentation layer. These sit outside the
//! calculation contract: the engine hands back exact decimals and these
//! render them for humans.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::types::{Money, Percent};

/// Render a monetary amount rounded to the nearest whole unit, with a
/// currency symbol and thousands separators: `format_currency(dec!(44000))`
/// is `"$44,000"`, negatives render as `"-$1,234"`.
pub fn format_currency(amount: Money) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    format!("{sign}${}", group_thousands(&rounded.abs().to_string()))
}

/// Render a value on the 0-100 percentage scale with exactly two decimal
/// places: `format_percent(dec!(6.3225))` is `"6.32%"`. The input is divided
/// by 100 to a ratio first, matching the 0-1 convention of locale percent
/// formatters, then scaled back for display.
pub fn format_percent(value: Percent) -> String {
    let ratio = value / dec!(100);
    let mut scaled =
        (ratio * dec!(100)).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    scaled.rescale(2);
    format!("{scaled}%")
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_currency_whole_units() {
        assert_eq!(format_currency(dec!(44000)), "$44,000");
        assert_eq!(format_currency(dec!(200000)), "$200,000");
        assert_eq!(format_currency(dec!(1234567)), "$1,234,567");
    }

    #[test]
    fn test_currency_rounds_to_nearest() {
        assert_eq!(format_currency(dec!(959.28)), "$959");
        assert_eq!(format_currency(dec!(959.50)), "$960");
        assert_eq!(format_currency(dec!(0.4)), "$0");
    }

    #[test]
    fn test_currency_negative() {
        assert_eq!(format_currency(dec!(-1133.6)), "-$1,134");
    }

    #[test]
    fn test_currency_small() {
        assert_eq!(format_currency(dec!(0)), "$0");
        assert_eq!(format_currency(dec!(999)), "$999");
        assert_eq!(format_currency(dec!(1000)), "$1,000");
    }

    #[test]
    fn test_percent_two_decimals() {
        assert_eq!(format_percent(dec!(6.3225)), "6.32%");
        assert_eq!(format_percent(dec!(2.576)), "2.58%");
        assert_eq!(format_percent(dec!(5)), "5.00%");
        assert_eq!(format_percent(dec!(0)), "0.00%");
    }

    #[test]
    fn test_percent_negative() {
        assert_eq!(format_percent(dec!(-1.005)), "-1.01%");
    }
}
