use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A single purchase of the position: `qty` shares bought at `price`
/// (foreign currency per share) while one unit of foreign currency cost
/// `fx` units of home currency.
///
/// Optional fees are expressed in the currency they were charged in and are
/// added to the corresponding total cost during aggregation.
///
/// Stored blobs are parsed leniently: numeric strings are accepted, and
/// missing, null or non-numeric fields become zero so that a malformed lot
/// contributes nothing instead of failing the whole load.
///
/// # Examples
///
/// ```
/// use pnl_grid::core::lot::PurchaseLot;
///
/// let lot = PurchaseLot::new(100.0, 150.0, 2).with_fee_home(100.0);
/// assert_eq!(lot.qty, 2);
/// assert_eq!(lot.fee_home, Some(100.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseLot {
    /// Share price in foreign currency.
    #[serde(default, deserialize_with = "lenient::number")]
    pub price: f64,
    /// Home-currency units per foreign-currency unit.
    #[serde(default, deserialize_with = "lenient::number")]
    pub fx: f64,
    /// Number of shares.
    #[serde(default, deserialize_with = "lenient::quantity")]
    pub qty: u64,
    /// Fee charged in home currency.
    #[serde(
        default,
        deserialize_with = "lenient::optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub fee_home: Option<f64>,
    /// Fee charged in foreign currency.
    #[serde(
        default,
        deserialize_with = "lenient::optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub fee_foreign: Option<f64>,
}

impl PurchaseLot {
    pub fn new(price: f64, fx: f64, qty: u64) -> Self {
        Self {
            price,
            fx,
            qty,
            fee_home: None,
            fee_foreign: None,
        }
    }

    /// Attach a home-currency fee.
    pub fn with_fee_home(mut self, fee: f64) -> Self {
        self.fee_home = Some(fee);
        self
    }

    /// Attach a foreign-currency fee.
    pub fn with_fee_foreign(mut self, fee: f64) -> Self {
        self.fee_foreign = Some(fee);
        self
    }
}

/// Replace anything that is not a finite number with zero.
pub(crate) fn finite_or_zero(x: f64) -> f64 {
    if x.is_finite() {
        x
    } else {
        0.0
    }
}

mod lenient {
    use super::*;

    fn coerce(value: &Value) -> f64 {
        let raw = match value {
            Value::Number(n) => n.as_f64().unwrap_or(0.0),
            Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
            Value::Bool(true) => 1.0,
            _ => 0.0,
        };
        finite_or_zero(raw)
    }

    pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(coerce(&value))
    }

    pub fn optional_number<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<f64>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Null => None,
            other => Some(coerce(&other)),
        })
    }

    // Fractional or negative share counts are not representable; they load as
    // zero and are rejected later by grid validation.
    pub fn quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let x = coerce(&value);
        if x >= 0.0 && x.fract() == 0.0 && x <= u64::MAX as f64 {
            Ok(x as u64)
        } else {
            Ok(0)
        }
    }
}
