//! # pnl-grid
//!
//! Profit/loss scenario engine for a stock position bought in a foreign
//! currency.
//!
//! Given the purchase lots of a position, this crate computes the profit
//! surface over a grid of (exchange rate × share price) scenarios, traces
//! the break-even line, and values user-marked scenarios the way a
//! brokerage statement displays them.
//!
//! ## Architecture
//!
//! - **core** — Purchase lots, aggregation, pins
//! - **grid** — Input validation, surface computation, break-even contour
//! - **valuation** — Brokerage display rounding and valuation
//! - **store** — Saved states on a key → JSON blob store
//! - **session** — Caller-side state with a never-failing graph entry point

pub mod core;
pub mod grid;
pub mod session;
pub mod store;
pub mod valuation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::aggregate::{aggregate, Aggregate};
    pub use crate::core::lot::PurchaseLot;
    pub use crate::core::pin::{Pin, PinSet};
    pub use crate::grid::engine::{GraphData, GridEngine};
    pub use crate::grid::range::GridRange;
    pub use crate::grid::validation::{ValidationError, Violation};
    pub use crate::grid::GridError;
    pub use crate::session::Session;
    pub use crate::valuation::brokerage::{
        compute_foreign_valuation_candidates, compute_home_valuation,
    };
    pub use crate::valuation::rounding::{round_half_away_from_zero, truncate_toward_zero};
}
