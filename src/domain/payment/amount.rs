//! Monetary amount conversion.
//!
//! The provider bills in integer minor units (piasters for EGP). Callers
//! supply decimal major-unit amounts; conversion rounds to the nearest
//! minor unit, so callers must supply amounts whose rounding error is
//! acceptable to them.

use thiserror::Error;

/// Errors converting a monetary amount.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum AmountError {
    #[error("amount must be positive and finite, got {0}")]
    InvalidAmount(f64),
}

/// Convert a major-unit amount to integer minor units.
///
/// Rounds `amount * 100` to the nearest whole minor unit.
///
/// # Errors
///
/// Returns [`AmountError::InvalidAmount`] for non-positive or non-finite
/// amounts.
pub fn to_minor_units(amount: f64) -> Result<i64, AmountError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(AmountError::InvalidAmount(amount));
    }
    Ok((amount * 100.0).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_amounts_convert_exactly() {
        assert_eq!(to_minor_units(10.0), Ok(1000));
        assert_eq!(to_minor_units(1.0), Ok(100));
    }

    #[test]
    fn rounds_on_the_cents_boundary() {
        assert_eq!(to_minor_units(12.345), Ok(1235));
        assert_eq!(to_minor_units(12.344), Ok(1234));
    }

    #[test]
    fn fractional_cents_round_to_nearest() {
        assert_eq!(to_minor_units(0.015), Ok(2));
        assert_eq!(to_minor_units(99.999), Ok(10000));
    }

    #[test]
    fn rejects_non_positive_amounts() {
        assert!(to_minor_units(0.0).is_err());
        assert!(to_minor_units(-5.0).is_err());
    }

    #[test]
    fn rejects_non_finite_amounts() {
        assert!(to_minor_units(f64::NAN).is_err());
        assert!(to_minor_units(f64::INFINITY).is_err());
    }
}
