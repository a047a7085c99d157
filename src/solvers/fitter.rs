//! The unit-cell fitter and its fitted-model handle.

use crate::core::{derive_cell, response_vector, CellFitResult, CrystalSystem, Observation};
use crate::diagnostics::{self, Diagnostics};
use crate::error::FitError;
use crate::report::{self, FitReport};
use crate::solvers::least_squares;
use faer::Mat;

/// Refines unit-cell parameters from indexed powder-diffraction lines.
///
/// Each call to [`CellFitter::fit`] is a single, complete, deterministic
/// fit; the fitter holds no state between calls, so one instance can be
/// reused or shared across threads freely. Outlier exclusion is the
/// caller's move: drop the flagged line and fit again.
///
/// # Example
///
/// ```rust,ignore
/// use unitcell::{CellFitter, CrystalSystem, Observation};
///
/// let lines = vec![
///     Observation::new(0, 0, 1, 5.692435),
///     Observation::new(1, 0, 0, 9.362543),
///     Observation::new(0, 1, 1, 10.966361),
/// ];
///
/// let fitted = CellFitter::new(CrystalSystem::Hexagonal, 0.4133).fit(&lines)?;
/// let cell = &fitted.result().cell;
/// println!("a = {} ± {}", cell.a.value, cell.a.std_error);
/// ```
#[derive(Debug, Clone)]
pub struct CellFitter {
    system: CrystalSystem,
    wavelength: f64,
    rank_tolerance: f64,
}

impl CellFitter {
    /// Create a fitter for the given crystal system and wavelength.
    pub fn new(system: CrystalSystem, wavelength: f64) -> Self {
        Self {
            system,
            wavelength,
            rank_tolerance: 1e-10,
        }
    }

    /// Set the rank tolerance for the QR decomposition.
    pub fn rank_tolerance(mut self, tolerance: f64) -> Self {
        self.rank_tolerance = tolerance;
        self
    }

    /// Fit cell parameters to the given observations.
    ///
    /// Observation order is irrelevant to the math but is preserved so
    /// diagnostics index back to the caller's rows.
    pub fn fit(&self, observations: &[Observation]) -> Result<FittedCell, FitError> {
        let observed_q = response_vector(observations, self.wavelength)?;
        let design = self.system.design_matrix(observations)?;

        let linear = least_squares::solve(&design, &observed_q, self.rank_tolerance)?;
        let cell = derive_cell(self.system, &linear.coefficients, &linear.covariance)?;

        let result = CellFitResult {
            system: self.system,
            wavelength: self.wavelength,
            coefficients: linear.coefficients,
            covariance: linear.covariance,
            observed_q,
            fitted_q: linear.fitted_values,
            residuals: linear.residuals,
            leverage: linear.leverage,
            mse: linear.mse,
            df_residual: linear.df_residual,
            n_observations: observations.len(),
            n_parameters: self.system.parameter_count(),
            cell,
        };

        Ok(FittedCell {
            result,
            design,
            xtx_inverse: linear.xtx_inverse,
            observations: observations.to_vec(),
        })
    }
}

/// A completed unit-cell fit.
///
/// Owns the fit result together with the design matrix and (XᵀX)⁻¹,
/// which the deletion diagnostics reuse without refitting.
#[derive(Debug, Clone)]
pub struct FittedCell {
    result: CellFitResult,
    design: Mat<f64>,
    xtx_inverse: Mat<f64>,
    observations: Vec<Observation>,
}

impl FittedCell {
    /// The fit result: coefficients, covariance, cell parameters.
    pub fn result(&self) -> &CellFitResult {
        &self.result
    }

    /// The observations the fit was run on, in input order.
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// The design matrix the fit was solved with.
    pub fn design(&self) -> &Mat<f64> {
        &self.design
    }

    pub(crate) fn xtx_inverse(&self) -> &Mat<f64> {
        &self.xtx_inverse
    }

    /// Per-observation influence diagnostics.
    ///
    /// Reports [`Diagnostics::Unavailable`] when the fit has fewer than
    /// two residual degrees of freedom.
    pub fn diagnostics(&self) -> Diagnostics {
        diagnostics::diagnose(self)
    }

    /// Package the fit and its diagnostics for reporting.
    pub fn report(&self) -> FitReport {
        report::assemble(self)
    }
}

/// Fit cell parameters in one call.
///
/// Convenience wrapper over [`CellFitter`] for callers that do not need
/// to keep a configured fitter around.
pub fn fit(
    observations: &[Observation],
    wavelength: f64,
    system: CrystalSystem,
) -> Result<FittedCell, FitError> {
    CellFitter::new(system, wavelength).fit(observations)
}
