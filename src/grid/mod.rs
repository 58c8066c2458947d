//! Scenario grid: validation, surface computation and break-even tracing.

pub mod contour;
pub mod engine;
pub mod range;
pub mod validation;

use crate::grid::validation::ValidationError;
use crate::valuation::ValuationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GridError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("pin #{pin} could not be valued: {source}")]
    Valuation {
        pin: usize,
        #[source]
        source: ValuationError,
    },
}
