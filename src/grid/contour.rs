use serde::{Deserialize, Serialize};

/// A point on the break-even polyline: `x` is the exchange rate, `y` the
/// share price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContourPoint {
    pub x: f64,
    pub y: f64,
}

/// Sign change between neighbouring samples. Landing exactly on zero counts
/// as a crossing.
fn crosses_zero(prev: f64, curr: f64) -> bool {
    (prev < 0.0 && curr >= 0.0) || (prev > 0.0 && curr <= 0.0)
}

/// Trace where profit changes sign.
///
/// Each price row is scanned left to right along the rate axis and
/// contributes at most its first crossing, recorded at the later rate
/// sample. Points come back sorted by rate so they can be drawn as a
/// polyline; the sort is stable, so rows with equal rates keep price order.
pub fn break_even_contour(
    fx_vals: &[f64],
    price_vals: &[f64],
    profit: &[Vec<f64>],
) -> Vec<ContourPoint> {
    let mut points: Vec<ContourPoint> = price_vals
        .iter()
        .zip(profit)
        .filter_map(|(&price, row)| {
            row.windows(2)
                .zip(fx_vals.iter().skip(1))
                .find(|(pair, _)| crosses_zero(pair[0], pair[1]))
                .map(|(_, &fx)| ContourPoint { x: fx, y: price })
        })
        .collect();

    points.sort_by(|a, b| a.x.total_cmp(&b.x));
    points
}
