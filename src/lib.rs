//! Unit-cell refinement from powder diffraction data with regression
//! diagnostics.
//!
//! This library fits unit-cell parameters to indexed powder-diffraction
//! lines using the Holland–Redfern approach: the nonlinear cell problem
//! is recast as a linear least-squares fit in reciprocal-lattice space,
//! and classical regression diagnostics (leverage, studentized
//! residuals, DFFITS, DFBETAS) point at the lines that unduly bias the
//! fit.
//!
//! Cubic, tetragonal, hexagonal, and orthorhombic cells are supported;
//! systems needing off-diagonal metric terms are not.
//!
//! # Example
//!
//! ```rust,ignore
//! use unitcell::prelude::*;
//!
//! let lines = vec![
//!     Observation::new(0, 0, 1, 5.692435),
//!     Observation::new(1, 0, 0, 9.362543),
//!     Observation::new(0, 1, 1, 10.966361),
//!     Observation::new(0, 1, 2, 14.766217),
//!     Observation::new(1, 1, 0, 16.248651),
//! ];
//!
//! let fitted = fit(&lines, 0.4133, CrystalSystem::Hexagonal)?;
//! let cell = &fitted.result().cell;
//! println!("a = {:.4} ± {:.4}", cell.a.value, cell.a.std_error);
//!
//! if let Diagnostics::Available(rows) = fitted.diagnostics() {
//!     for row in rows.iter().filter(|r| r.is_suspect()) {
//!         println!("check line {}", row.index);
//!     }
//! }
//! ```

pub mod core;
pub mod diagnostics;
pub mod error;
pub mod report;
pub mod solvers;
pub mod utils;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::core::{
        response_vector, CellFitResult, CellParameters, CrystalSystem, Estimate, Observation,
    };
    pub use crate::diagnostics::{
        diagnose, high_leverage_points, Diagnostics, ObservationDiagnostics, SUSPECT_RSTUDENT,
    };
    pub use crate::error::FitError;
    pub use crate::report::{FitReport, ReportRow};
    pub use crate::solvers::{fit, CellFitter, FittedCell};
}

pub use crate::core::{CellFitResult, CellParameters, CrystalSystem, Estimate, Observation};
pub use crate::diagnostics::{diagnose, Diagnostics, ObservationDiagnostics};
pub use crate::error::FitError;
pub use crate::report::{FitReport, ReportRow};
pub use crate::solvers::{fit, CellFitter, FittedCell};
