//! Conversion between comma-decimal field text and canonical numbers
//!
//! Sellers type amounts the Brazilian way (`"1234,50"`). Everything in here
//! is lenient: text that cannot be read as a number becomes zero, and the
//! pricing core only ever sees `f64` values.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Strip a raw field down to digits and a single decimal point.
///
/// Commas are read as decimal separators; when several separators are present
/// the first one wins and the rest are dropped (`"1.2.3"` becomes `"1.23"`).
pub fn sanitize_numeric(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| if c == ',' { '.' } else { c })
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    match cleaned.split_once('.') {
        Some((int, frac)) => format!("{}.{}", int, frac.replace('.', "")),
        None => cleaned,
    }
}

/// Parse a field into a non-negative amount, falling back to zero
pub fn parse_amount(raw: &str) -> f64 {
    sanitize_numeric(raw).parse::<f64>().unwrap_or(0.0)
}

/// Parse a percentage field into a fraction clamped to [0, 1]
pub fn parse_percent(raw: &str) -> f64 {
    clamp_percent(parse_amount(raw)) / 100.0
}

pub fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}

/// Round to cents, half away from zero. `None` when `value` does not fit a `Decimal`.
pub fn round_cents(value: f64) -> Option<Decimal> {
    let rounded = Decimal::from_f64(value)?
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        Some(Decimal::ZERO)
    } else {
        Some(rounded)
    }
}

fn two_decimals(value: f64) -> String {
    match round_cents(value) {
        Some(rounded) => format!("{:.2}", rounded),
        None => format!("{:.2}", value),
    }
}

fn with_comma(text: String) -> String {
    text.replace('.', ",")
}

/// Text written back into a field when the seller leaves it: `"7"` becomes `"7,00"`
pub fn format_field(raw: &str) -> String {
    with_comma(two_decimals(parse_amount(raw)))
}

/// Field-exit text for percentage fields, clamped to `"0,00"`..`"100,00"`
pub fn clamp_percent_field(raw: &str) -> String {
    with_comma(two_decimals(clamp_percent(parse_amount(raw))))
}

/// `R$ 36,36`
pub fn format_currency(value: f64) -> String {
    format!("R$ {}", with_comma(two_decimals(value)))
}

/// `12,50%`
pub fn format_percent(value: f64) -> String {
    format!("{}%", with_comma(two_decimals(value)))
}

/// `1.82X` (the multiplier keeps a dot separator)
pub fn format_multiplier(value: f64) -> String {
    format!("{}X", two_decimals(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_accepts_comma_separator() {
        assert_eq!(sanitize_numeric("12,50"), "12.50");
        assert_eq!(sanitize_numeric("R$ 1.234,5"), "1.2345");
        assert_eq!(sanitize_numeric("abc"), "");
    }

    #[test]
    fn test_sanitize_collapses_decimal_points() {
        assert_eq!(sanitize_numeric("1.2.3"), "1.23");
        assert_eq!(sanitize_numeric("1,2,3"), "1.23");
        assert_eq!(sanitize_numeric("..5"), ".5");
    }

    #[test]
    fn test_sanitize_strips_sign() {
        assert_eq!(sanitize_numeric("-42"), "42");
    }

    #[test]
    fn test_parse_amount_falls_back_to_zero() {
        assert_eq!(parse_amount(""), 0.0);
        assert_eq!(parse_amount("."), 0.0);
        assert_eq!(parse_amount("not a number"), 0.0);
        assert_eq!(parse_amount("20,00"), 20.0);
        assert_eq!(parse_amount("5,"), 5.0);
        assert_eq!(parse_amount(",5"), 0.5);
    }

    #[test]
    fn test_parse_percent_clamps() {
        assert_eq!(parse_percent("5"), 0.05);
        assert_eq!(parse_percent("150"), 1.0);
        assert_eq!(parse_percent("-3"), 0.03);
        assert_eq!(parse_percent(""), 0.0);
    }

    #[test]
    fn test_field_formatting() {
        assert_eq!(format_field("7"), "7,00");
        assert_eq!(format_field("12,5"), "12,50");
        assert_eq!(format_field("garbage"), "0,00");
    }

    #[test]
    fn test_percent_field_clamping() {
        assert_eq!(clamp_percent_field("250"), "100,00");
        assert_eq!(clamp_percent_field("abc"), "0,00");
        assert_eq!(clamp_percent_field("17,5"), "17,50");
    }

    #[test]
    fn test_display_formats() {
        assert_eq!(format_currency(24.0 / 0.66), "R$ 36,36");
        assert_eq!(format_currency(-5.5), "R$ -5,50");
        assert_eq!(format_currency(0.0), "R$ 0,00");
        assert_eq!(format_percent(12.5), "12,50%");
        assert_eq!(format_multiplier(1.818181), "1.82X");
    }

    #[test]
    fn test_round_cents_drops_negative_zero() {
        assert_eq!(format_currency(-0.001), "R$ 0,00");
        assert_eq!(round_cents(2.345678), Some(Decimal::new(235, 2)));
    }

    #[test]
    fn test_amounts_beyond_decimal_range_still_display() {
        assert_eq!(round_cents(1e30), None);
        assert_eq!(
            format_currency(1e30),
            "R$ 1000000000000000019884624838656,00"
        );
    }
}
