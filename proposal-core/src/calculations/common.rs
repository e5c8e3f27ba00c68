//! Common utility functions for quotation and projection calculations.
//!
//! This module provides shared functionality used by the ledger and the
//! projection generator, including rounding and percentage arithmetic.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// This follows standard financial rounding conventions where values at exactly
/// 0.005 are rounded up to 0.01 (away from zero).
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use proposal_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a decimal value to a whole currency unit, half away from zero.
///
/// ```
/// use rust_decimal_macros::dec;
/// use proposal_core::calculations::common::round_to_unit;
///
/// assert_eq!(round_to_unit(dec!(604278.49)), dec!(604278));
/// assert_eq!(round_to_unit(dec!(604278.50)), dec!(604279));
/// ```
pub fn round_to_unit(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns `percent` percent of `amount` (`amount × percent / 100`), unrounded.
///
/// `None` when the product does not fit in a [`Decimal`].
pub fn percent_of(
    amount: Decimal,
    percent: Decimal,
) -> Option<Decimal> {
    amount
        .checked_mul(percent)
        .map(|product| product / Decimal::ONE_HUNDRED)
}

/// Converts a percentage into a growth multiplier: `1 + percent / 100`.
///
/// Pass a negated percentage to obtain a decay multiplier.
pub fn growth_multiplier(percent: Decimal) -> Decimal {
    Decimal::ONE + percent / Decimal::ONE_HUNDRED
}
