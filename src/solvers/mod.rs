//! Fitting: the linear solver and the cell-level fitter built on it.

mod fitter;
mod least_squares;

pub use fitter::{fit, CellFitter, FittedCell};
pub use least_squares::{solve, LinearFit};
