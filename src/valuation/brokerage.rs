use crate::valuation::rounding::{
    round_half_away_from_zero, truncate_to_integer, truncate_toward_zero,
};
use crate::valuation::ValuationError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Decimal places shown for foreign-currency amounts and for percentages.
pub const DISPLAY_DIGITS: u32 = 2;

/// Home-currency valuation as the brokerage statement displays it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomeValuation {
    /// Average acquisition price × quantity, truncated to whole units.
    pub total_acq_home: Decimal,
    /// Current value minus `total_acq_home`.
    pub profit_loss_home: Decimal,
    /// Profit over acquisition in percent, truncated toward zero at two
    /// decimals. Zero when the acquisition total is zero.
    pub profit_loss_rate_pct: Decimal,
}

/// Reproduce the statement's home-currency profit/loss figures.
///
/// The order of operations matters: the acquisition total is truncated
/// before the subtraction, and the percentage is computed from the
/// truncated figures. A percentage that truncates to zero is returned as
/// unsigned zero.
///
/// # Examples
///
/// ```
/// use pnl_grid::valuation::brokerage::compute_home_valuation;
/// use rust_decimal_macros::dec;
///
/// let v = compute_home_valuation(dec!(15234.5678), dec!(37), dec!(612345)).unwrap();
/// assert_eq!(v.total_acq_home, dec!(563679));
/// assert_eq!(v.profit_loss_home, dec!(48666));
/// assert_eq!(v.profit_loss_rate_pct, dec!(8.63));
/// ```
pub fn compute_home_valuation(
    avg_acq_home: Decimal,
    qty: Decimal,
    current_value_home: Decimal,
) -> Result<HomeValuation, ValuationError> {
    let acq = avg_acq_home
        .checked_mul(qty)
        .ok_or(ValuationError::Overflow("acquisition total"))?;
    let total_acq_home = truncate_to_integer(acq);

    let profit_loss_home = current_value_home
        .checked_sub(total_acq_home)
        .ok_or(ValuationError::Overflow("profit/loss"))?;

    let profit_loss_rate_pct = if total_acq_home.is_zero() {
        Decimal::ZERO
    } else {
        let pct = profit_loss_home
            .checked_div(total_acq_home)
            .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
            .ok_or(ValuationError::Overflow("profit/loss rate"))?;
        let pct = truncate_toward_zero(pct, DISPLAY_DIGITS);
        if pct.is_zero() {
            Decimal::ZERO
        } else {
            pct
        }
    };

    Ok(HomeValuation {
        total_acq_home,
        profit_loss_home,
        profit_loss_rate_pct,
    })
}

/// Every plausible foreign-currency figure the statement might show.
///
/// The statement's rounding order for foreign amounts is not pinned down:
/// the acquisition total may be used raw, rounded or truncated, and each
/// derived figure may itself be rounded or truncated. Reconciliation checks
/// membership rather than equality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignValuationCandidates {
    /// Price × quantity, rounded half away from zero to two decimals.
    pub current_value_foreign: Decimal,
    /// Raw, rounded and truncated acquisition totals, in that order.
    pub acq_candidates: Vec<Decimal>,
    pub pnl_candidates: BTreeSet<Decimal>,
    pub rate_candidates: BTreeSet<Decimal>,
}

impl ForeignValuationCandidates {
    pub fn has_pnl(&self, value: Decimal) -> bool {
        self.pnl_candidates.contains(&value)
    }

    pub fn has_rate(&self, value: Decimal) -> bool {
        self.rate_candidates.contains(&value)
    }
}

/// Build the foreign-currency candidate sets.
///
/// Acquisition candidates equal to zero produce no rate candidate.
pub fn compute_foreign_valuation_candidates(
    avg_acq_foreign: Decimal,
    qty: Decimal,
    current_price_foreign: Decimal,
) -> Result<ForeignValuationCandidates, ValuationError> {
    let current_value = current_price_foreign
        .checked_mul(qty)
        .ok_or(ValuationError::Overflow("current value"))?;
    let current_value_foreign = round_half_away_from_zero(current_value, DISPLAY_DIGITS);

    let acq_raw = avg_acq_foreign
        .checked_mul(qty)
        .ok_or(ValuationError::Overflow("acquisition total"))?;
    let acq_candidates = vec![
        acq_raw,
        round_half_away_from_zero(acq_raw, DISPLAY_DIGITS),
        truncate_toward_zero(acq_raw, DISPLAY_DIGITS),
    ];

    let mut pnl_candidates = BTreeSet::new();
    let mut rate_candidates = BTreeSet::new();
    for acq in &acq_candidates {
        let pnl = current_value_foreign
            .checked_sub(*acq)
            .ok_or(ValuationError::Overflow("profit/loss"))?;
        pnl_candidates.insert(round_half_away_from_zero(pnl, DISPLAY_DIGITS));
        pnl_candidates.insert(truncate_toward_zero(pnl, DISPLAY_DIGITS));

        if acq.is_zero() {
            continue;
        }
        let rate = pnl
            .checked_div(*acq)
            .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
            .ok_or(ValuationError::Overflow("profit/loss rate"))?;
        rate_candidates.insert(round_half_away_from_zero(rate, DISPLAY_DIGITS));
        rate_candidates.insert(truncate_toward_zero(rate, DISPLAY_DIGITS));
    }

    Ok(ForeignValuationCandidates {
        current_value_foreign,
        acq_candidates,
        pnl_candidates,
        rate_candidates,
    })
}
