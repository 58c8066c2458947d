//! Brokerage statement reconciliation example.
//!
//! Shows why statement figures cannot be reproduced with plain float
//! arithmetic, and how the valuation helpers match them.

use pnl_grid::prelude::*;
use rust_decimal_macros::dec;

fn main() {
    println!("╔══════════════════════════════════════════╗");
    println!("║  pnl-grid: Brokerage Reconciliation      ║");
    println!("╚══════════════════════════════════════════╝\n");

    // --- Scenario 1: Home currency, whole units ---
    println!("━━━ Scenario 1: Home Currency ━━━\n");

    let avg = dec!(3333.3333);
    let qty = dec!(3);
    let current = dec!(10000);
    let naive = 3333.3333f64 * 3.0;
    println!("Naive acquisition:  {}", naive);

    match compute_home_valuation(avg, qty, current) {
        Ok(v) => {
            println!("Statement acq:      {}", v.total_acq_home);
            println!("Profit/loss:        {}", v.profit_loss_home);
            println!("Rate:               {:.2}%", v.profit_loss_rate_pct);
        }
        Err(e) => println!("Error: {}", e),
    }
    println!();

    // --- Scenario 2: Foreign currency candidates ---
    println!("━━━ Scenario 2: Foreign Currency ━━━\n");

    let statement_pnl = dec!(333.20);
    match compute_foreign_valuation_candidates(dec!(123.4567), dec!(15), dec!(145.67)) {
        Ok(c) => {
            println!("Current value:      {}", c.current_value_foreign);
            println!("Acquisition:        {:?}", c.acq_candidates);
            println!("Profit candidates:  {:?}", c.pnl_candidates);
            println!("Rate candidates:    {:?}", c.rate_candidates);
            println!(
                "Statement {} matches: {}",
                statement_pnl,
                c.has_pnl(statement_pnl)
            );
        }
        Err(e) => println!("Error: {}", e),
    }
    println!();

    // --- Scenario 3: Rounding rules side by side ---
    println!("━━━ Scenario 3: Rounding Rules ━━━\n");

    for x in [dec!(2.345), dec!(-2.345), dec!(-0.004)] {
        println!(
            "{:>8}  truncate → {:>6}   round → {:>6}",
            x,
            truncate_toward_zero(x, 2),
            round_half_away_from_zero(x, 2)
        );
    }
}
