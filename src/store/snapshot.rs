use crate::core::lot::PurchaseLot;
use crate::core::pin::Pin;
use crate::grid::range::GridRange;
use crate::store::StoreError;
use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Version written into every saved state.
pub const STATE_VERSION: &str = "1.0.0";

/// Everything needed to rebuild a session: the scenario window, the lots
/// and the pins.
///
/// The JSON layout is camelCase (`fxMin`, `purchases`, ...). Range bounds
/// are optional so partially filled states still load; the window is only
/// applied when all four bounds are present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fx_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fx_max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_max: Option<f64>,
    #[serde(default)]
    pub purchases: Vec<PurchaseLot>,
    /// Pins that are not well-formed are dropped on load; the rest of the
    /// state still restores.
    #[serde(default, deserialize_with = "well_formed_pins")]
    pub pins: Vec<Pin>,
    /// Save time, stored as epoch milliseconds.
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default = "default_version")]
    pub version: String,
}

fn well_formed_pins<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Pin>, D::Error> {
    let raw = Vec::<Value>::deserialize(deserializer)?;
    let mut pins = Vec::with_capacity(raw.len());
    for value in raw {
        match serde_json::from_value::<Pin>(value.clone()) {
            Ok(pin) => pins.push(pin),
            Err(e) => warn!("dropping malformed pin {}: {}", value, e),
        }
    }
    Ok(pins)
}

fn default_version() -> String {
    STATE_VERSION.to_string()
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            fx_min: None,
            fx_max: None,
            price_min: None,
            price_max: None,
            purchases: Vec::new(),
            pins: Vec::new(),
            timestamp: None,
            version: default_version(),
        }
    }
}

impl AppState {
    pub fn with_range(mut self, range: &GridRange) -> Self {
        self.fx_min = Some(range.fx_min);
        self.fx_max = Some(range.fx_max);
        self.price_min = Some(range.price_min);
        self.price_max = Some(range.price_max);
        self
    }

    /// The scenario window, if every bound was saved.
    pub fn range(&self) -> Option<GridRange> {
        Some(GridRange::new(
            self.fx_min?,
            self.fx_max?,
            self.price_min?,
            self.price_max?,
        ))
    }

    /// Range bounds must be finite numbers.
    ///
    /// Lots and pins are not checked here: they load leniently, sessions drop
    /// unusable pins and grid validation reports bad lots.
    pub fn validate(&self) -> Result<(), StoreError> {
        let bounds = [
            ("fxMin", self.fx_min),
            ("fxMax", self.fx_max),
            ("priceMin", self.price_min),
            ("priceMax", self.price_max),
        ];
        for (field, value) in bounds {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(StoreError::InvalidField { field, value: v });
                }
            }
        }
        Ok(())
    }

    /// Parse and validate a stored blob.
    pub fn from_json(blob: &str) -> Result<Self, StoreError> {
        let state: AppState = serde_json::from_str(blob)?;
        state.validate()?;
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOB: &str = r#"{
        "fxMin": 130, "fxMax": 160, "priceMin": 90, "priceMax": 250,
        "purchases": [{"price": 100, "fx": 150, "qty": 2}, {"price": "110", "fx": 160, "qty": 1}],
        "pins": [{"fx": 150, "price": 100, "showAnnotation": false, "color": "red"}],
        "timestamp": 1717171717000,
        "version": "1.0.0"
    }"#;

    #[test]
    fn test_parse_full_blob() {
        let state = AppState::from_json(BLOB).unwrap();
        assert_eq!(state.range(), Some(GridRange::new(130.0, 160.0, 90.0, 250.0)));
        assert_eq!(state.purchases.len(), 2);
        assert_eq!(state.purchases[1].price, 110.0);
        assert!(!state.pins[0].show_annotation);
        assert_eq!(state.timestamp.unwrap().timestamp_millis(), 1_717_171_717_000);
    }

    #[test]
    fn test_partial_blob_has_no_range() {
        let state = AppState::from_json(r#"{"fxMin": 130, "purchases": []}"#).unwrap();
        assert_eq!(state.range(), None);
        assert_eq!(state.version, STATE_VERSION);
        assert!(state.timestamp.is_none());
    }

    #[test]
    fn test_non_array_purchases_rejected() {
        let err = AppState::from_json(r#"{"purchases": "nope"}"#).unwrap_err();
        assert!(matches!(err, StoreError::Json(_)));
    }

    #[test]
    fn test_non_numeric_bound_rejected() {
        let err = AppState::from_json(r#"{"fxMin": "abc"}"#).unwrap_err();
        assert!(matches!(err, StoreError::Json(_)));
    }

    #[test]
    fn test_malformed_pins_dropped() {
        let state = AppState::from_json(
            r#"{"fxMin": 130, "fxMax": 160, "priceMin": 90, "priceMax": 250,
                "pins": [{"fx": 150, "price": 100}, {"fx": "oops", "price": 1}, 7, {"price": 2}]}"#,
        )
        .unwrap();
        assert_eq!(state.pins, vec![Pin::new(150.0, 100.0)]);
        assert!(state.range().is_some());
    }

    #[test]
    fn test_non_array_pins_rejected() {
        let err = AppState::from_json(r#"{"pins": {"fx": 1}}"#).unwrap_err();
        assert!(matches!(err, StoreError::Json(_)));
    }

    #[test]
    fn test_non_finite_bound_rejected() {
        let state = AppState {
            price_max: Some(f64::NAN),
            ..AppState::default()
        };
        assert!(matches!(
            state.validate(),
            Err(StoreError::InvalidField {
                field: "priceMax",
                ..
            })
        ));
    }

    #[test]
    fn test_serializes_camel_case() {
        let state = AppState::default().with_range(&GridRange::default());
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["fxMin"], 120.0);
        assert_eq!(json["priceMax"], 300.0);
        assert!(json.get("timestamp").is_none());
        assert_eq!(json["purchases"], serde_json::json!([]));
    }
}
