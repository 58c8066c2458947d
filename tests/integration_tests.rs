use approx::assert_relative_eq;
use pnl_grid::prelude::*;
use pnl_grid::store::kv::{FileStore, KeyValueStore, MemoryStore};
use pnl_grid::store::snapshot::AppState;
use pnl_grid::store::SnapshotStore;
use rust_decimal_macros::dec;

/// Two lots bought at different rates, used across the scenarios below.
fn two_lots() -> Vec<PurchaseLot> {
    vec![
        PurchaseLot::new(100.0, 150.0, 2),
        PurchaseLot::new(110.0, 160.0, 1),
    ]
}

// =============================================================================
// Scenario 1: Lots → grid → pins, end to end
// =============================================================================

#[test]
fn test_end_to_end_grid_with_pins() {
    let lots = two_lots();
    let range = GridRange::new(140.0, 180.0, 80.0, 120.0);
    let pins = vec![Pin::new(170.0, 100.0), Pin::new(150.0, 90.0).with_label("dip")];

    let data = GridEngine::new(41).compute(&lots, &range, &pins).unwrap();

    assert_eq!(data.fx_vals().len(), 41);
    assert_eq!(data.price_vals().len(), 41);
    assert_eq!(data.total_qty(), 3);
    assert_relative_eq!(data.total_cost_home(), 47_600.0);
    assert_relative_eq!(data.cost_foreign(), 310.0);

    // 170 × 100 × 3 = 51000 against 47600 of cost.
    let first = &data.enriched_pins()[0];
    assert_eq!(first.profit_home, dec!(3400));
    assert_eq!(first.rate_home, "7.14%");
    assert_relative_eq!(first.profit_foreign, -10.0);
    assert_eq!(first.rate_foreign, "-3.23%");

    // 150 × 90 × 3 = 40500: loss of 7100, -14.915..% truncated.
    let second = &data.enriched_pins()[1];
    assert_eq!(second.profit_home, dec!(-7100));
    assert_eq!(second.rate_home_pct, dec!(-14.91));
    assert_eq!(second.pin.label.as_deref(), Some("dip"));

    // The caller's pins are untouched.
    assert_eq!(pins[1], Pin::new(150.0, 90.0).with_label("dip"));
}

#[test]
fn test_break_even_points_bracket_zero_profit() {
    let lots = two_lots();
    let range = GridRange::new(120.0, 200.0, 80.0, 130.0);
    let data = GridEngine::new(60).compute(&lots, &range, &[]).unwrap();
    let cost = data.total_cost_home();
    let qty = data.total_qty() as f64;

    assert!(!data.break_even_points().is_empty());
    let step = data.fx_vals()[1] - data.fx_vals()[0];
    for p in data.break_even_points() {
        // The recorded sample is the first one at or past break-even.
        assert!(p.x * p.y * qty - cost >= 0.0);
        assert!((p.x - step) * p.y * qty - cost < 0.0);
    }
    for pair in data.break_even_points().windows(2) {
        assert!(pair[0].x <= pair[1].x);
    }
}

#[test]
fn test_validation_reports_every_problem() {
    let lots = vec![PurchaseLot::new(-1.0, 150.0, 0)];
    let range = GridRange::new(160.0, 120.0, 100.0, 300.0);
    let pins = vec![Pin::new(0.0, 100.0)];

    let validation = match GridEngine::new(1).compute(&lots, &range, &pins) {
        Err(GridError::Validation(v)) => v,
        other => panic!("expected a validation error, got {:?}", other),
    };
    assert_eq!(
        validation.violations(),
        &[
            Violation::LotPrice {
                index: 0,
                value: -1.0
            },
            Violation::LotQty { index: 0, value: 0 },
            Violation::FxRange {
                min: 160.0,
                max: 120.0
            },
            Violation::PinFx {
                index: 0,
                value: 0.0
            },
            Violation::Resolution(1),
        ]
    );
}

#[test]
fn test_identical_inputs_give_identical_output() {
    let lots = two_lots();
    let range = GridRange::default();
    let pins = vec![Pin::new(155.0, 120.0)];
    let engine = GridEngine::new(30);
    assert_eq!(
        engine.compute(&lots, &range, &pins).unwrap(),
        engine.compute(&lots, &range, &pins).unwrap()
    );
}

// =============================================================================
// Scenario 2: JSON output shape
// =============================================================================

#[test]
fn test_graph_data_json_shape() {
    let pins = vec![Pin::new(170.0, 100.0).with_color("#ff0000")];
    let data = GridEngine::new(3)
        .compute(&two_lots(), &GridRange::default(), &pins)
        .unwrap();
    let json = serde_json::to_value(&data).unwrap();

    assert_eq!(json["fx_vals"].as_array().unwrap().len(), 3);
    assert_eq!(json["profit_home"].as_array().unwrap().len(), 3);
    assert_eq!(json["total_qty"], 3);
    assert!(json["average_point"]["fx"].is_number());

    let pin = &json["enriched_pins"][0];
    assert_eq!(pin["fx"], 170.0);
    assert_eq!(pin["showAnnotation"], true);
    assert_eq!(pin["color"], "#ff0000");
    assert_eq!(pin["profit_home"], "3400");
    assert_eq!(pin["rate_home"], "7.14%");
}

#[test]
fn test_text_report() {
    let pins = vec![Pin::new(170.0, 100.0)];
    let data = GridEngine::new(3)
        .compute(&two_lots(), &GridRange::default(), &pins)
        .unwrap();
    let text = data.to_string();
    assert!(text.contains("=== Scenario Grid ==="));
    assert!(text.contains("--- pin fx 170 / price 100 ---"));
    assert!(text.contains("3400 (7.14%)"));
}

// =============================================================================
// Scenario 3: Session fallback and saved states
// =============================================================================

#[test]
fn test_session_falls_back_to_degenerate_surface() {
    let mut session = Session::new();
    session.lots = vec![PurchaseLot::new(f64::NAN, 150.0, 1)];
    let data = session.graph();
    assert_eq!(data, GraphData::degenerate());
    assert_eq!(data.fx_vals(), &[100.0, 200.0]);
    assert!(data.profit_home().iter().flatten().all(|p| *p == 0.0));
}

#[test]
fn test_session_round_trip_through_file_store() {
    let dir = tempfile::tempdir().unwrap();

    let mut session = Session::new();
    session.lots = two_lots();
    session.range = GridRange::new(130.0, 170.0, 90.0, 130.0);
    session.pins.add(150.0, 100.0, Some("blue".to_string())).unwrap();

    let mut store = SnapshotStore::new(FileStore::open(dir.path()).unwrap());
    store.save("円安シナリオ", &session.snapshot()).unwrap();
    assert_eq!(store.names().unwrap(), vec!["円安シナリオ"]);

    let mut restored = Session::new();
    restored.apply(store.restore("円安シナリオ").unwrap()).unwrap();
    assert_eq!(restored.lots, session.lots);
    assert_eq!(restored.range, session.range);
    assert_eq!(restored.pins, session.pins);
    assert_eq!(restored.graph(), session.graph());
}

#[test]
fn test_restore_loads_loosely_typed_lots() {
    let mut backend = MemoryStore::new();
    backend
        .put(
            "state::legacy",
            r#"{"purchases": [{"price": "100", "fx": 150, "qty": "2"}, {"price": null, "fx": 150, "qty": 1}]}"#,
        )
        .unwrap();
    let store = SnapshotStore::new(backend);
    let state = store.restore("legacy").unwrap();

    assert_eq!(state.purchases[0], PurchaseLot::new(100.0, 150.0, 2));
    assert_eq!(state.purchases[1].price, 0.0);

    let agg = aggregate(&state.purchases);
    assert_eq!(agg.total_qty, 3);
    assert_relative_eq!(agg.total_cost_home, 30_000.0);
}

#[test]
fn test_restore_drops_malformed_pins_and_keeps_the_rest() {
    let mut backend = MemoryStore::new();
    backend
        .put(
            "state::partial",
            r#"{
                "fxMin": 130, "fxMax": 170, "priceMin": 90, "priceMax": 130,
                "purchases": [{"price": 100, "fx": 150, "qty": 2}],
                "pins": [{"fx": 150, "price": 100}, {"fx": "oops", "price": 1}]
            }"#,
        )
        .unwrap();
    let store = SnapshotStore::new(backend);

    let mut session = Session::new();
    session.apply(store.restore("partial").unwrap()).unwrap();
    assert_eq!(session.lots, vec![PurchaseLot::new(100.0, 150.0, 2)]);
    assert_eq!(session.range, GridRange::new(130.0, 170.0, 90.0, 130.0));
    assert_eq!(session.pins.pins(), &[Pin::new(150.0, 100.0)]);
}

#[test]
fn test_default_state_restores_to_default_session() {
    let mut store = SnapshotStore::new(MemoryStore::new());
    store.save("empty", &AppState::default()).unwrap();

    let mut session = Session::new();
    session.apply(store.restore("empty").unwrap()).unwrap();
    assert!(session.lots.is_empty());
    assert_eq!(session.range, GridRange::default());
    // Placeholder lot: 10 shares.
    assert_eq!(session.graph().total_qty(), 10);
}
