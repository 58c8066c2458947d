use crate::core::lot::{finite_or_zero, PurchaseLot};
use serde::{Deserialize, Serialize};

/// Totals and quantity-weighted averages over a set of purchase lots.
///
/// A position with no shares has no meaningful averages, so when
/// `total_qty` is zero every other field is zero as well.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    pub total_qty: u64,
    /// Σ(price × fx × qty) plus home-currency fees.
    pub total_cost_home: f64,
    /// Σ(price × qty) plus foreign-currency fees.
    pub total_cost_foreign: f64,
    /// Quantity-weighted exchange rate.
    pub avg_fx: f64,
    /// Quantity-weighted share price.
    pub avg_price: f64,
}

impl Aggregate {
    /// Average acquisition cost per share in home currency, or zero for an
    /// empty position.
    pub fn avg_acq_home(&self) -> f64 {
        if self.total_qty == 0 {
            return 0.0;
        }
        self.total_cost_home / self.total_qty as f64
    }

    pub fn is_empty(&self) -> bool {
        self.total_qty == 0
    }
}

/// Reduce purchase lots into an [`Aggregate`].
///
/// Never fails: non-finite numeric fields contribute zero, and an empty
/// input (or one whose quantities sum to zero) yields the all-zero result.
///
/// # Examples
///
/// ```
/// use pnl_grid::core::aggregate::aggregate;
/// use pnl_grid::core::lot::PurchaseLot;
///
/// let agg = aggregate(&[
///     PurchaseLot::new(100.0, 150.0, 2),
///     PurchaseLot::new(110.0, 160.0, 1),
/// ]);
/// assert_eq!(agg.total_qty, 3);
/// assert_eq!(agg.total_cost_home, 47_600.0);
/// assert_eq!(agg.total_cost_foreign, 310.0);
/// ```
pub fn aggregate(lots: &[PurchaseLot]) -> Aggregate {
    let total_qty = lots.iter().fold(0u64, |acc, lot| acc.saturating_add(lot.qty));
    if total_qty == 0 {
        return Aggregate::default();
    }

    let mut total_cost_home = 0.0;
    let mut total_cost_foreign = 0.0;
    let mut weighted_fx = 0.0;
    let mut weighted_price = 0.0;

    for lot in lots {
        let price = finite_or_zero(lot.price);
        let fx = finite_or_zero(lot.fx);
        let qty = lot.qty as f64;
        let fee_home = lot.fee_home.map(finite_or_zero).unwrap_or(0.0);
        let fee_foreign = lot.fee_foreign.map(finite_or_zero).unwrap_or(0.0);

        total_cost_home = total_cost_home + price * fx * qty + fee_home;
        total_cost_foreign = total_cost_foreign + price * qty + fee_foreign;
        weighted_fx += fx * qty;
        weighted_price += price * qty;
    }

    let qty = total_qty as f64;
    Aggregate {
        total_qty,
        total_cost_home,
        total_cost_foreign,
        avg_fx: weighted_fx / qty,
        avg_price: weighted_price / qty,
    }
}
