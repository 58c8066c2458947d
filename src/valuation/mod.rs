//! Brokerage-statement valuation.
//!
//! - **rounding** — truncation and half-away-from-zero rounding on decimals
//! - **brokerage** — home valuation and foreign candidate sets

pub mod brokerage;
pub mod rounding;

use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ValuationError {
    #[error("decimal overflow computing {0}")]
    Overflow(&'static str),
    #[error("{0} cannot be represented as a decimal")]
    NotRepresentable(f64),
}

/// Convert a scenario coordinate to a decimal using its shortest decimal
/// form, so `150.1` becomes `150.1` rather than its binary expansion.
pub fn decimal_from_f64(x: f64) -> Result<Decimal, ValuationError> {
    if !x.is_finite() {
        return Err(ValuationError::NotRepresentable(x));
    }
    Decimal::from_str(&x.to_string()).map_err(|_| ValuationError::NotRepresentable(x))
}
