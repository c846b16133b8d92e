//! Conversion between decimal text and integer minor units.
//!
//! The netting core works on `i64` minor units only. This module is the
//! boundary where CSV amounts such as `"12.50"` become `1250` (at scale 2)
//! and back, using `rust_decimal` so no floating point is involved.

use crate::error::{Result, SettleError};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Decimal places used when none are configured (cents).
pub const DEFAULT_SCALE: u32 = 2;

/// Largest supported scale; keeps `10^scale` well inside `i64`.
pub const MAX_SCALE: u32 = 12;

/// Parses `text` into minor units with `scale` decimal places.
///
/// Rejects values with more fractional digits than `scale` and values that
/// do not fit in an `i64`.
pub fn parse_minor(text: &str, scale: u32) -> Result<i64> {
    let trimmed = text.trim();
    let invalid = |message: &str| SettleError::InvalidAmount {
        value: trimmed.to_string(),
        message: message.to_string(),
    };

    let mut decimal = Decimal::from_str(trimmed).map_err(|e| invalid(&e.to_string()))?;
    decimal = decimal.normalize();
    if decimal.scale() > scale {
        return Err(invalid(&format!("more than {} decimal places", scale)));
    }
    decimal.rescale(scale);

    i64::try_from(decimal.mantissa()).map_err(|_| invalid("out of range"))
}

/// Renders `minor` units with exactly `scale` decimal places.
pub fn format_minor(minor: i64, scale: u32) -> String {
    Decimal::new(minor, scale).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minor_scales_up() {
        assert_eq!(parse_minor("12.5", 2).unwrap(), 1250);
        assert_eq!(parse_minor("  -3 ", 2).unwrap(), -300);
        assert_eq!(parse_minor("0.01", 2).unwrap(), 1);
        assert_eq!(parse_minor("7", 0).unwrap(), 7);
    }

    #[test]
    fn test_parse_minor_accepts_trailing_zeros() {
        assert_eq!(parse_minor("1.5000", 2).unwrap(), 150);
    }

    #[test]
    fn test_parse_minor_rejects_extra_precision() {
        assert!(matches!(
            parse_minor("1.234", 2),
            Err(SettleError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_parse_minor_rejects_garbage() {
        assert!(parse_minor("abc", 2).is_err());
        assert!(parse_minor("", 2).is_err());
    }

    #[test]
    fn test_format_minor_fixed_places() {
        assert_eq!(format_minor(1250, 2), "12.50");
        assert_eq!(format_minor(-5, 2), "-0.05");
        assert_eq!(format_minor(0, 2), "0.00");
        assert_eq!(format_minor(42, 0), "42");
    }
}
