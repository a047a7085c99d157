//! Fit result structures.

use crate::core::cell::CellParameters;
use crate::core::system::CrystalSystem;
use faer::{Col, Mat};

/// Complete result of one unit-cell fit.
///
/// Created once per `fit` call and immutable afterwards; every field is
/// an owned value, so results can move freely between threads.
#[derive(Debug, Clone)]
pub struct CellFitResult {
    /// Crystal system the fit was run under.
    pub system: CrystalSystem,

    /// Wavelength the responses were derived with.
    pub wavelength: f64,

    // ========== Linear model ==========
    /// Fitted reciprocal-metric coefficients, one per free parameter.
    pub coefficients: Col<f64>,

    /// Coefficient covariance matrix σ̂²·(XᵀX)⁻¹.
    pub covariance: Mat<f64>,

    /// Observed responses Q = 1/d², in observation order.
    pub observed_q: Col<f64>,

    /// Fitted responses X·p.
    pub fitted_q: Col<f64>,

    /// Residuals Q − X·p.
    pub residuals: Col<f64>,

    /// Hat-matrix diagonal, one leverage per observation.
    pub leverage: Col<f64>,

    /// Residual mean square σ̂² = RSS / (n − p).
    pub mse: f64,

    /// Residual degrees of freedom n − p.
    pub df_residual: usize,

    /// Number of observations.
    pub n_observations: usize,

    /// Number of fitted parameters.
    pub n_parameters: usize,

    // ========== Physical parameters ==========
    /// Cell lengths and volume with propagated standard errors.
    pub cell: CellParameters,
}

impl CellFitResult {
    /// Residual standard error σ̂.
    pub fn residual_std_error(&self) -> f64 {
        self.mse.sqrt()
    }

    /// Correlation matrix of the fitted coefficients.
    ///
    /// Entries are Cov(p_i, p_j) / (s(p_i)·s(p_j)); values near ±1 mean
    /// the data barely separates the two metric parameters.
    pub fn parameter_correlations(&self) -> Mat<f64> {
        let p = self.n_parameters;
        Mat::from_fn(p, p, |i, j| {
            let denom = (self.covariance[(i, i)] * self.covariance[(j, j)]).sqrt();
            if denom > 0.0 {
                self.covariance[(i, j)] / denom
            } else {
                f64::NAN
            }
        })
    }
}
