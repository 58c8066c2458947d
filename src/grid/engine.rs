use crate::core::aggregate::{aggregate, Aggregate};
use crate::core::lot::PurchaseLot;
use crate::core::pin::Pin;
use crate::grid::contour::{break_even_contour, ContourPoint};
use crate::grid::range::{linspace, GridRange};
use crate::grid::validation::validate;
use crate::grid::GridError;
use crate::valuation::brokerage::compute_home_valuation;
use crate::valuation::rounding::truncate_to_integer;
use crate::valuation::{decimal_from_f64, ValuationError};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// Samples per axis when no resolution is given.
pub const DEFAULT_RESOLUTION: usize = 200;

/// Rendered for percentages whose denominator is zero.
pub const ZERO_RATE: &str = "0.00%";

/// The weighted-average purchase point, plotted as a marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AveragePoint {
    pub fx: f64,
    pub price: f64,
}

/// A pin together with its profit/loss at that scenario.
///
/// Home figures follow the brokerage convention (whole units, rate truncated
/// toward zero); foreign figures are plain arithmetic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedPin {
    #[serde(flatten)]
    pub pin: Pin,
    pub profit_home: Decimal,
    pub rate_home_pct: Decimal,
    pub rate_home: String,
    pub profit_foreign: f64,
    pub rate_foreign: String,
}

/// Profit/loss surface over a rate × price grid.
///
/// Row `i` of every matrix belongs to `price_vals[i]`, column `j` to
/// `fx_vals[j]`. Built once per computation and never modified.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphData {
    fx_vals: Vec<f64>,
    price_vals: Vec<f64>,
    profit_home: Vec<Vec<f64>>,
    profit_rate_home: Vec<Vec<String>>,
    profit_rate_foreign: Vec<Vec<String>>,
    average_point: AveragePoint,
    break_even_points: Vec<ContourPoint>,
    enriched_pins: Vec<EnrichedPin>,
    total_qty: u64,
    total_cost_home: f64,
    cost_foreign: f64,
}

impl GraphData {
    /// Placeholder surface shown when a computation fails: two samples per
    /// axis and zero profit everywhere.
    pub fn degenerate() -> Self {
        let zeros = || vec![ZERO_RATE.to_string(), ZERO_RATE.to_string()];
        Self {
            fx_vals: vec![100.0, 200.0],
            price_vals: vec![1.0, 1000.0],
            profit_home: vec![vec![0.0, 0.0], vec![0.0, 0.0]],
            profit_rate_home: vec![zeros(), zeros()],
            profit_rate_foreign: vec![zeros(), zeros()],
            average_point: AveragePoint {
                fx: 140.0,
                price: 150.0,
            },
            break_even_points: Vec::new(),
            enriched_pins: Vec::new(),
            total_qty: 0,
            total_cost_home: 0.0,
            cost_foreign: 0.0,
        }
    }

    pub fn fx_vals(&self) -> &[f64] {
        &self.fx_vals
    }

    pub fn price_vals(&self) -> &[f64] {
        &self.price_vals
    }

    pub fn profit_home(&self) -> &[Vec<f64>] {
        &self.profit_home
    }

    pub fn profit_rate_home(&self) -> &[Vec<String>] {
        &self.profit_rate_home
    }

    pub fn profit_rate_foreign(&self) -> &[Vec<String>] {
        &self.profit_rate_foreign
    }

    pub fn average_point(&self) -> AveragePoint {
        self.average_point
    }

    pub fn break_even_points(&self) -> &[ContourPoint] {
        &self.break_even_points
    }

    pub fn enriched_pins(&self) -> &[EnrichedPin] {
        &self.enriched_pins
    }

    pub fn total_qty(&self) -> u64 {
        self.total_qty
    }

    pub fn total_cost_home(&self) -> f64 {
        self.total_cost_home
    }

    pub fn cost_foreign(&self) -> f64 {
        self.cost_foreign
    }

    /// Largest and smallest home-currency profit on the surface.
    pub fn profit_bounds(&self) -> Option<(f64, f64)> {
        self.profit_home
            .iter()
            .flatten()
            .fold(None, |acc, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// Format `profit / total` as a two-decimal percentage.
///
/// A zero total has no meaningful ratio and renders as [`ZERO_RATE`].
pub fn format_rate(profit: f64, total: f64) -> String {
    if total == 0.0 {
        return ZERO_RATE.to_string();
    }
    let pct = (100.0 * profit) / total;
    if !pct.is_finite() {
        return ZERO_RATE.to_string();
    }
    // Values that round to zero print without a sign.
    let rounded = format!("{:.2}", pct);
    if rounded == "-0.00" {
        return ZERO_RATE.to_string();
    }
    format!("{}%", rounded)
}

/// Computes [`GraphData`] at a fixed resolution.
///
/// # Examples
///
/// ```
/// use pnl_grid::prelude::*;
///
/// let lots = vec![PurchaseLot::new(100.0, 150.0, 2)];
/// let range = GridRange::new(140.0, 160.0, 90.0, 110.0);
/// let data = GridEngine::default().compute(&lots, &range, &[]).unwrap();
///
/// assert_eq!(data.fx_vals().len(), 200);
/// assert_eq!(data.profit_home().len(), data.price_vals().len());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridEngine {
    resolution: usize,
}

impl Default for GridEngine {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
        }
    }
}

impl GridEngine {
    pub fn new(resolution: usize) -> Self {
        Self { resolution }
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Validate inputs, then build the surface, contour and pin valuations.
    ///
    /// # Algorithm
    ///
    /// 1. Aggregate the lots.
    /// 2. Sample both axes with [`linspace`].
    /// 3. For each (price, rate): home profit `fx·price·qty − cost_home`,
    ///    foreign profit `price·qty − cost_foreign`, and both as percentages.
    /// 4. Trace the break-even contour.
    /// 5. Value each pin with the brokerage convention.
    pub fn compute(
        &self,
        lots: &[PurchaseLot],
        range: &GridRange,
        pins: &[Pin],
    ) -> Result<GraphData, GridError> {
        validate(lots, range, pins, self.resolution)?;

        let agg = aggregate(lots);
        let qty = agg.total_qty as f64;
        let cost_home = agg.total_cost_home;
        let cost_foreign = agg.total_cost_foreign;

        let fx_vals = linspace(range.fx_min, range.fx_max, self.resolution);
        let price_vals = linspace(range.price_min, range.price_max, self.resolution);

        let n = self.resolution;
        let mut profit_home = Vec::with_capacity(n);
        let mut profit_rate_home = Vec::with_capacity(n);
        let mut profit_rate_foreign = Vec::with_capacity(n);

        for &price in &price_vals {
            let profit_foreign = price * qty - cost_foreign;
            let rate_foreign = format_rate(profit_foreign, cost_foreign);

            let mut profit_row = Vec::with_capacity(n);
            let mut home_row = Vec::with_capacity(n);
            for &fx in &fx_vals {
                let profit = fx * price * qty - cost_home;
                home_row.push(format_rate(profit, cost_home));
                profit_row.push(profit);
            }
            profit_home.push(profit_row);
            profit_rate_home.push(home_row);
            profit_rate_foreign.push(vec![rate_foreign; n]);
        }

        let break_even_points = break_even_contour(&fx_vals, &price_vals, &profit_home);

        let enriched_pins = pins
            .iter()
            .enumerate()
            .map(|(i, pin)| {
                enrich_pin(pin, &agg).map_err(|source| GridError::Valuation { pin: i, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(GraphData {
            fx_vals,
            price_vals,
            profit_home,
            profit_rate_home,
            profit_rate_foreign,
            average_point: AveragePoint {
                fx: agg.avg_fx,
                price: agg.avg_price,
            },
            break_even_points,
            enriched_pins,
            total_qty: agg.total_qty,
            total_cost_home: cost_home,
            cost_foreign,
        })
    }
}

/// `cost / qty`, nudged up by one unit in the last place when the quotient
/// was rounded down, so that multiplying back by `qty` does not land below
/// `cost` and lose a whole unit to truncation (47600 / 3 × 3).
fn settled_average(cost: Decimal, qty: Decimal) -> Result<Decimal, ValuationError> {
    if qty.is_zero() {
        return Ok(Decimal::ZERO);
    }
    let avg = cost
        .checked_div(qty)
        .ok_or(ValuationError::Overflow("average acquisition"))?;
    let back = avg
        .checked_mul(qty)
        .ok_or(ValuationError::Overflow("average acquisition"))?;
    if back >= cost {
        return Ok(avg);
    }
    avg.checked_add(Decimal::new(1, avg.scale()))
        .ok_or(ValuationError::Overflow("average acquisition"))
}

fn enrich_pin(pin: &Pin, agg: &Aggregate) -> Result<EnrichedPin, ValuationError> {
    let qty = Decimal::from(agg.total_qty);
    let fx = decimal_from_f64(pin.fx)?;
    let price = decimal_from_f64(pin.price)?;

    let current_value_home = fx
        .checked_mul(price)
        .and_then(|v| v.checked_mul(qty))
        .map(truncate_to_integer)
        .ok_or(ValuationError::Overflow("current value"))?;

    let cost_home = decimal_from_f64(agg.total_cost_home)?;
    let avg_acq_home = settled_average(cost_home, qty)?;
    let home = compute_home_valuation(avg_acq_home, qty, current_value_home)?;

    let profit_foreign = pin.price * agg.total_qty as f64 - agg.total_cost_foreign;

    Ok(EnrichedPin {
        pin: pin.clone(),
        profit_home: home.profit_loss_home,
        rate_home_pct: home.profit_loss_rate_pct,
        rate_home: format!("{:.2}%", home.profit_loss_rate_pct),
        profit_foreign,
        rate_foreign: format_rate(profit_foreign, agg.total_cost_foreign),
    })
}

impl fmt::Display for GraphData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Scenario Grid ===")?;
        writeln!(f, "Shares:           {}", self.total_qty)?;
        writeln!(f, "Cost (home):      {:.2}", self.total_cost_home)?;
        writeln!(f, "Cost (foreign):   {:.2}", self.cost_foreign)?;
        writeln!(
            f,
            "Average point:    fx {:.4}, price {:.4}",
            self.average_point.fx, self.average_point.price
        )?;
        if let (Some(first), Some(last)) = (self.fx_vals.first(), self.fx_vals.last()) {
            writeln!(f, "Fx axis:          {} .. {} ({} samples)", first, last, self.fx_vals.len())?;
        }
        if let (Some(first), Some(last)) = (self.price_vals.first(), self.price_vals.last()) {
            writeln!(
                f,
                "Price axis:       {} .. {} ({} samples)",
                first,
                last,
                self.price_vals.len()
            )?;
        }
        if let Some((lo, hi)) = self.profit_bounds() {
            writeln!(f, "Profit range:     {:.0} .. {:.0}", lo, hi)?;
        }
        writeln!(f, "Break-even pts:   {}", self.break_even_points.len())?;

        for pin in &self.enriched_pins {
            writeln!(f, "\n--- pin fx {} / price {} ---", pin.pin.fx, pin.pin.price)?;
            if let Some(label) = &pin.pin.label {
                writeln!(f, "  Label:          {}", label)?;
            }
            writeln!(f, "  Profit (home):  {} ({})", pin.profit_home, pin.rate_home)?;
            writeln!(
                f,
                "  Profit (fgn):   {:.2} ({})",
                pin.profit_foreign, pin.rate_foreign
            )?;
        }
        Ok(())
    }
}
