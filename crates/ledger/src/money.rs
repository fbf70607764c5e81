//! Minor-unit money arithmetic.
//!
//! Every monetary value in the crate is a signed amount of **integer minor
//! units** (`i64` cents) to avoid floating-point drift. Quantities are
//! integer **thousandths of a unit** (`quantity_milli`), so fractional
//! quantities like 2.5 m³ stay exact.
//!
//! An expense or budget-line amount is never stored: it is always derived
//! from its factors through [`amount_from_rate`], the single place where the
//! rounding rule lives.

use crate::{LedgerError, ResultLedger};

/// Derives an amount from `rate_minor × quantity_milli / 1000`.
///
/// The division rounds half up (half away from zero is irrelevant here:
/// both factors must be positive). Errors on non-positive factors and on
/// overflow.
pub fn amount_from_rate(rate_minor: i64, quantity_milli: i64) -> ResultLedger<i64> {
    if rate_minor <= 0 {
        return Err(LedgerError::Validation(
            "rate_minor must be > 0".to_string(),
        ));
    }
    if quantity_milli <= 0 {
        return Err(LedgerError::Validation(
            "quantity_milli must be > 0".to_string(),
        ));
    }

    let product = rate_minor
        .checked_mul(quantity_milli)
        .ok_or_else(|| LedgerError::Validation("amount too large".to_string()))?;
    product
        .checked_add(500)
        .map(|p| p / 1000)
        .ok_or_else(|| LedgerError::Validation("amount too large".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_quantities_multiply_exactly() {
        // rate 1.00 × qty 2 = 2.00
        assert_eq!(amount_from_rate(100, 2000).unwrap(), 200);
        // rate 0.50 × qty 1 = 0.50
        assert_eq!(amount_from_rate(50, 1000).unwrap(), 50);
    }

    #[test]
    fn fractional_quantities_round_half_up() {
        // rate 33.33 × qty 1.5 = 49.995 → 50.00
        assert_eq!(amount_from_rate(3333, 1500).unwrap(), 5000);
        // rate 0.01 × qty 0.4 = 0.004 → 0.00; qty 0.5 rounds up to 0.01
        assert_eq!(amount_from_rate(1, 400).unwrap(), 0);
        assert_eq!(amount_from_rate(1, 500).unwrap(), 1);
    }

    #[test]
    fn rejects_non_positive_factors() {
        assert!(amount_from_rate(0, 1000).is_err());
        assert!(amount_from_rate(-100, 1000).is_err());
        assert!(amount_from_rate(100, 0).is_err());
        assert!(amount_from_rate(100, -1).is_err());
    }

    #[test]
    fn rejects_overflow() {
        assert!(amount_from_rate(i64::MAX, 2000).is_err());
    }
}
