//! Basic scenario grid example.
//!
//! Builds a position from two purchases, computes the profit surface over
//! a rate × price window and values a couple of marked scenarios.

use pnl_grid::prelude::*;

fn main() {
    println!("╔══════════════════════════════════════════╗");
    println!("║     pnl-grid: Basic Scenario Grid        ║");
    println!("╚══════════════════════════════════════════╝\n");

    // --- Scenario 1: Aggregate the position ---
    println!("━━━ Scenario 1: Position ━━━\n");

    let lots = vec![
        PurchaseLot::new(100.0, 150.0, 20),
        PurchaseLot::new(110.0, 160.0, 10).with_fee_home(1_500.0),
    ];
    let agg = aggregate(&lots);

    println!("Shares:             {}", agg.total_qty);
    println!("Cost (home):        {:.0}", agg.total_cost_home);
    println!("Cost (foreign):     {:.2}", agg.total_cost_foreign);
    println!("Average rate:       {:.4}", agg.avg_fx);
    println!("Average price:      {:.4}", agg.avg_price);
    println!();

    // --- Scenario 2: Grid with pins ---
    println!("━━━ Scenario 2: Grid ━━━\n");

    let mut pins = PinSet::new();
    pins.add(170.0, 100.0, None).ok();
    pins.add(140.0, 120.0, Some("#2b8cbe".to_string())).ok();
    // Too close to the first pin, rejected.
    if let Err(e) = pins.add(170.005, 100.002, None) {
        println!("Pin rejected:       {}", e);
    }

    let range = GridRange::new(130.0, 180.0, 80.0, 140.0);
    match GridEngine::new(50).compute(&lots, &range, pins.pins()) {
        Ok(data) => println!("{}", data),
        Err(e) => println!("Error: {}", e),
    }

    // --- Scenario 3: Invalid input ---
    println!("\n━━━ Scenario 3: Invalid Input ━━━\n");

    let bad = vec![PurchaseLot::new(0.0, 150.0, 0)];
    let inverted = GridRange::new(160.0, 120.0, 100.0, 300.0);
    if let Err(e) = GridEngine::default().compute(&bad, &inverted, &[]) {
        println!("{}", e);
    }

    let session = Session {
        lots: bad,
        range: inverted,
        ..Session::new()
    };
    let fallback = session.graph();
    println!(
        "Session fallback:   {} × {} samples, zero profit",
        fallback.fx_vals().len(),
        fallback.price_vals().len()
    );
}
