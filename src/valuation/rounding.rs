//! Display-rounding primitives.
//!
//! Brokerage statements do not round the way `f64` formatting does: whole
//! home-currency amounts and two-decimal percentages are cut toward zero.
//! These helpers work on [`Decimal`] so the digits that are dropped are the
//! decimal digits a statement shows, not binary approximations of them.

use rust_decimal::{Decimal, RoundingStrategy};

/// Drop every digit past `digits` decimal places, toward zero.
///
/// Unlike flooring, negative values move up: `-1.239` becomes `-1.23`.
///
/// ```
/// use pnl_grid::valuation::rounding::truncate_toward_zero;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(truncate_toward_zero(dec!(-1.239), 2), dec!(-1.23));
/// assert_eq!(truncate_toward_zero(dec!(1.239), 2), dec!(1.23));
/// ```
pub fn truncate_toward_zero(x: Decimal, digits: u32) -> Decimal {
    x.round_dp_with_strategy(digits, RoundingStrategy::ToZero)
}

/// Conventional rounding: ties move away from zero (`2.345 → 2.35`,
/// `-2.345 → -2.35`).
pub fn round_half_away_from_zero(x: Decimal, digits: u32) -> Decimal {
    x.round_dp_with_strategy(digits, RoundingStrategy::MidpointAwayFromZero)
}

/// Whole units, fraction discarded toward zero.
pub fn truncate_to_integer(x: Decimal) -> Decimal {
    x.trunc()
}
