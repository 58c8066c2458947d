use crate::core::lot::PurchaseLot;
use crate::core::pin::Pin;
use crate::grid::range::GridRange;
use thiserror::Error;

/// Largest accepted samples-per-axis count. The surface holds three
/// `resolution²` matrices.
pub const MAX_RESOLUTION: usize = 2000;

/// One violated input constraint.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Violation {
    #[error("no purchase lots")]
    NoLots,
    #[error("lot #{index}: price must be a positive number, got {value}")]
    LotPrice { index: usize, value: f64 },
    #[error("lot #{index}: fx rate must be a positive number, got {value}")]
    LotFx { index: usize, value: f64 },
    #[error("lot #{index}: share count must be positive, got {value}")]
    LotQty { index: usize, value: u64 },
    #[error("fx minimum must be a positive number, got {0}")]
    FxMin(f64),
    #[error("fx maximum must be a positive number, got {0}")]
    FxMax(f64),
    #[error("fx range is empty ({min} >= {max})")]
    FxRange { min: f64, max: f64 },
    #[error("price minimum must be a positive number, got {0}")]
    PriceMin(f64),
    #[error("price maximum must be a positive number, got {0}")]
    PriceMax(f64),
    #[error("price range is empty ({min} >= {max})")]
    PriceRange { min: f64, max: f64 },
    #[error("pin #{index}: fx rate must be a positive number, got {value}")]
    PinFx { index: usize, value: f64 },
    #[error("pin #{index}: price must be a positive number, got {value}")]
    PinPrice { index: usize, value: f64 },
    #[error("resolution must be between 2 and {max}, got {0}", max = MAX_RESOLUTION)]
    Resolution(usize),
}

/// Every constraint the grid input violated, in check order.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid grid input: {}", summarize(.violations))]
pub struct ValidationError {
    violations: Vec<Violation>,
}

fn summarize(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

fn is_positive(x: f64) -> bool {
    x.is_finite() && x > 0.0
}

/// Check grid inputs, collecting every violation rather than stopping at
/// the first.
pub fn validate(
    lots: &[PurchaseLot],
    range: &GridRange,
    pins: &[Pin],
    resolution: usize,
) -> Result<(), ValidationError> {
    let mut violations = Vec::new();

    if lots.is_empty() {
        violations.push(Violation::NoLots);
    }
    for (index, lot) in lots.iter().enumerate() {
        if !is_positive(lot.price) {
            violations.push(Violation::LotPrice {
                index,
                value: lot.price,
            });
        }
        if !is_positive(lot.fx) {
            violations.push(Violation::LotFx {
                index,
                value: lot.fx,
            });
        }
        if lot.qty == 0 {
            violations.push(Violation::LotQty {
                index,
                value: lot.qty,
            });
        }
    }

    if !is_positive(range.fx_min) {
        violations.push(Violation::FxMin(range.fx_min));
    }
    if !is_positive(range.fx_max) {
        violations.push(Violation::FxMax(range.fx_max));
    }
    if range.fx_min >= range.fx_max {
        violations.push(Violation::FxRange {
            min: range.fx_min,
            max: range.fx_max,
        });
    }
    if !is_positive(range.price_min) {
        violations.push(Violation::PriceMin(range.price_min));
    }
    if !is_positive(range.price_max) {
        violations.push(Violation::PriceMax(range.price_max));
    }
    if range.price_min >= range.price_max {
        violations.push(Violation::PriceRange {
            min: range.price_min,
            max: range.price_max,
        });
    }

    for (index, pin) in pins.iter().enumerate() {
        if !is_positive(pin.fx) {
            violations.push(Violation::PinFx {
                index,
                value: pin.fx,
            });
        }
        if !is_positive(pin.price) {
            violations.push(Violation::PinPrice {
                index,
                value: pin.price,
            });
        }
    }

    if !(2..=MAX_RESOLUTION).contains(&resolution) {
        violations.push(Violation::Resolution(resolution));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { violations })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lots() -> Vec<PurchaseLot> {
        vec![PurchaseLot::new(100.0, 150.0, 2)]
    }

    #[test]
    fn test_valid_input_passes() {
        assert!(validate(&lots(), &GridRange::default(), &[Pin::new(150.0, 100.0)], 200).is_ok());
    }

    #[test]
    fn test_reports_every_violation() {
        let range = GridRange::new(160.0, 140.0, -5.0, 300.0);
        let err = validate(&lots(), &range, &[], 200).unwrap_err();
        assert_eq!(
            err.violations(),
            &[
                Violation::FxRange {
                    min: 160.0,
                    max: 140.0
                },
                Violation::PriceMin(-5.0),
            ]
        );
    }

    #[test]
    fn test_empty_lots_and_bad_pins() {
        let pins = [Pin::new(0.0, 100.0), Pin::new(150.0, f64::NAN)];
        let err = validate(&[], &GridRange::default(), &pins, 1).unwrap_err();
        let v = err.violations();
        assert_eq!(v.len(), 4);
        assert_eq!(v[0], Violation::NoLots);
        assert!(matches!(v[1], Violation::PinFx { index: 0, .. }));
        assert!(matches!(v[2], Violation::PinPrice { index: 1, .. }));
        assert_eq!(v[3], Violation::Resolution(1));
    }

    #[test]
    fn test_bad_lot_fields() {
        let bad = vec![
            PurchaseLot::new(100.0, 150.0, 1),
            PurchaseLot::new(-1.0, f64::INFINITY, 0),
        ];
        let err = validate(&bad, &GridRange::default(), &[], 200).unwrap_err();
        assert_eq!(err.violations().len(), 3);
        assert!(err
            .violations()
            .iter()
            .all(|v| matches!(v, Violation::LotPrice { index: 1, .. }
                | Violation::LotFx { index: 1, .. }
                | Violation::LotQty { index: 1, .. })));
    }

    #[test]
    fn test_error_message_lists_all() {
        let range = GridRange::new(0.0, 160.0, 100.0, 100.0);
        let err = validate(&lots(), &range, &[], 200).unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("invalid grid input: "));
        assert!(msg.contains("fx minimum"));
        assert!(msg.contains("price range is empty"));
    }

    #[test]
    fn test_resolution_upper_bound() {
        let lots = [PurchaseLot::new(100.0, 150.0, 1)];
        let range = GridRange::default();
        assert!(validate(&lots, &range, &[], MAX_RESOLUTION).is_ok());
        for too_many in [MAX_RESOLUTION + 1, usize::MAX] {
            let err = validate(&lots, &range, &[], too_many).unwrap_err();
            assert_eq!(err.violations(), &[Violation::Resolution(too_many)]);
        }
    }
}
