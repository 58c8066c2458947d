//! Caller-side state around the engine.
//!
//! A [`Session`] owns what a front end edits (lots, pins, the scenario
//! window) and turns it into a [`GraphData`] that is always renderable:
//! when the engine rejects the input, the failure is logged and the
//! degenerate surface is returned in its place.

use crate::core::lot::PurchaseLot;
use crate::core::pin::PinSet;
use crate::grid::engine::{GraphData, GridEngine};
use crate::grid::range::GridRange;
use crate::grid::GridError;
use crate::store::snapshot::{AppState, STATE_VERSION};
use crate::store::StoreError;
use chrono::Utc;
use log::{debug, error, warn};

/// Lot graphed while the user has not entered any purchase yet.
pub fn placeholder_lot() -> PurchaseLot {
    PurchaseLot::new(150.0, 140.0, 10)
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    pub lots: Vec<PurchaseLot>,
    pub pins: PinSet,
    pub range: GridRange,
    pub engine: GridEngine,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_engine(mut self, engine: GridEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Run the engine on the current state.
    ///
    /// Without lots the placeholder lot is graphed so the chart has
    /// something to show.
    pub fn try_graph(&self) -> Result<GraphData, GridError> {
        if self.lots.is_empty() {
            debug!("no lots entered, graphing placeholder lot");
            let placeholder = [placeholder_lot()];
            return self.engine.compute(&placeholder, &self.range, self.pins.pins());
        }
        self.engine.compute(&self.lots, &self.range, self.pins.pins())
    }

    /// Like [`Session::try_graph`], but never fails: errors are logged and
    /// replaced by [`GraphData::degenerate`].
    pub fn graph(&self) -> GraphData {
        match self.try_graph() {
            Ok(data) => data,
            Err(e) => {
                error!("grid computation failed, showing empty surface: {}", e);
                GraphData::degenerate()
            }
        }
    }

    /// Capture the session for saving.
    pub fn snapshot(&self) -> AppState {
        AppState {
            purchases: self.lots.clone(),
            pins: self.pins.pins().to_vec(),
            timestamp: Some(Utc::now()),
            version: STATE_VERSION.to_string(),
            ..AppState::default()
        }
        .with_range(&self.range)
    }

    /// Replace the session contents with a saved state.
    ///
    /// The scenario window only changes when the state carries all four
    /// bounds. Pins with unusable coordinates are dropped with a warning.
    pub fn apply(&mut self, state: AppState) -> Result<(), StoreError> {
        state.validate()?;
        if let Some(range) = state.range() {
            self.range = range;
        }
        self.lots = state.purchases;
        let skipped = self.pins.replace_all(state.pins);
        if skipped > 0 {
            warn!("dropped {} pins with invalid coordinates", skipped);
        }
        Ok(())
    }
}
