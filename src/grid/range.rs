use serde::{Deserialize, Serialize};

/// The scenario window: exchange-rate bounds on one axis, share-price
/// bounds on the other.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridRange {
    pub fx_min: f64,
    pub fx_max: f64,
    pub price_min: f64,
    pub price_max: f64,
}

impl GridRange {
    pub fn new(fx_min: f64, fx_max: f64, price_min: f64, price_max: f64) -> Self {
        Self {
            fx_min,
            fx_max,
            price_min,
            price_max,
        }
    }
}

impl Default for GridRange {
    fn default() -> Self {
        Self::new(120.0, 160.0, 100.0, 300.0)
    }
}

/// `num` evenly spaced samples from `start` to `end` inclusive.
///
/// Each sample is `start + step * i`, which keeps the first sample exact and
/// matches how the axis values are reproduced elsewhere.
pub fn linspace(start: f64, end: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (num - 1) as f64;
            (0..num).map(|i| start + step * i as f64).collect()
        }
    }
}
