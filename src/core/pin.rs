use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Two pins closer than this in both rate and price are the same pin.
pub const PIN_EPSILON: f64 = 0.01;

/// Price tolerance used when removing a pin picked from the chart.
pub const PIN_REMOVE_PRICE_TOLERANCE: f64 = 0.1;

/// A user-marked (rate, price) scenario overlaid on the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pin {
    pub fx: f64,
    pub price: f64,
    #[serde(default = "default_show_annotation")]
    pub show_annotation: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

fn default_show_annotation() -> bool {
    true
}

impl Pin {
    pub fn new(fx: f64, price: f64) -> Self {
        Self {
            fx,
            price,
            show_annotation: true,
            color: None,
            label: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    fn is_near(&self, fx: f64, price: f64, fx_tol: f64, price_tol: f64) -> bool {
        (self.fx - fx).abs() < fx_tol && (self.price - price).abs() < price_tol
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum PinError {
    #[error("a pin already exists near fx={fx}, price={price}")]
    Duplicate { fx: f64, price: f64 },
    #[error("pin coordinates must be finite, got fx={fx}, price={price}")]
    NonFinite { fx: f64, price: f64 },
    #[error("no pin at index {0}")]
    OutOfRange(usize),
}

/// Caller-owned collection of pins with insertion-time de-duplication.
///
/// # Examples
///
/// ```
/// use pnl_grid::core::pin::PinSet;
///
/// let mut pins = PinSet::new();
/// pins.add(150.0, 100.0, None).unwrap();
/// assert!(pins.add(150.005, 100.005, None).is_err());
/// assert_eq!(pins.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PinSet {
    pins: Vec<Pin>,
}

impl PinSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pin unless one already sits within [`PIN_EPSILON`] of it.
    pub fn add(&mut self, fx: f64, price: f64, color: Option<String>) -> Result<(), PinError> {
        if !fx.is_finite() || !price.is_finite() {
            return Err(PinError::NonFinite { fx, price });
        }
        if self
            .pins
            .iter()
            .any(|p| p.is_near(fx, price, PIN_EPSILON, PIN_EPSILON))
        {
            return Err(PinError::Duplicate { fx, price });
        }
        self.pins.push(Pin {
            color,
            ..Pin::new(fx, price)
        });
        Ok(())
    }

    /// Remove the first pin near `(fx, price)`. Returns the removed pin.
    pub fn remove(&mut self, fx: f64, price: f64) -> Option<Pin> {
        let idx = self
            .pins
            .iter()
            .position(|p| p.is_near(fx, price, PIN_EPSILON, PIN_REMOVE_PRICE_TOLERANCE))?;
        Some(self.pins.remove(idx))
    }

    /// Replace the whole collection, e.g. when restoring saved state.
    ///
    /// Pins with non-finite coordinates are dropped; the number dropped is
    /// returned so the caller can report it.
    pub fn replace_all(&mut self, pins: impl IntoIterator<Item = Pin>) -> usize {
        self.pins.clear();
        let mut skipped = 0;
        for pin in pins {
            if pin.fx.is_finite() && pin.price.is_finite() {
                self.pins.push(pin);
            } else {
                skipped += 1;
            }
        }
        skipped
    }

    pub fn set_annotation(&mut self, index: usize, show: bool) -> Result<(), PinError> {
        let pin = self.pins.get_mut(index).ok_or(PinError::OutOfRange(index))?;
        pin.show_annotation = show;
        Ok(())
    }

    pub fn set_color(&mut self, index: usize, color: Option<String>) -> Result<(), PinError> {
        let pin = self.pins.get_mut(index).ok_or(PinError::OutOfRange(index))?;
        pin.color = color;
        Ok(())
    }

    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    pub fn len(&self) -> usize {
        self.pins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }
}

impl FromIterator<Pin> for PinSet {
    fn from_iter<T: IntoIterator<Item = Pin>>(iter: T) -> Self {
        let mut set = Self::new();
        set.replace_all(iter);
        set
    }
}
