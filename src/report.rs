//! Packaging of fit results and diagnostics for the reporting layer.
//!
//! The engine does no rendering; [`FitReport`] is the structured table
//! a caller formats for the user, one row per observed line.

use crate::core::{CellParameters, CrystalSystem};
use crate::solvers::FittedCell;

/// One observed line with its fitted counterparts and diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    /// Position of the line in the fit input.
    pub index: usize,
    pub h: i32,
    pub k: i32,
    pub l: i32,
    /// Observed diffraction angle, degrees.
    pub two_theta_observed: f64,
    /// Angle back-calculated from the fitted cell, degrees.
    pub two_theta_calculated: f64,
    /// Observed minus calculated angle.
    pub two_theta_residual: f64,
    /// Observed d-spacing.
    pub d_observed: f64,
    /// d-spacing of the fitted cell for this line.
    pub d_calculated: f64,
    /// Observed response Q = 1/d².
    pub q_observed: f64,
    /// Fitted response.
    pub q_calculated: f64,
    /// Hat value of the line.
    pub leverage: f64,
    /// Externally studentized residual; `None` when diagnostics are
    /// unavailable for the fit.
    pub rstudent: Option<f64>,
    /// DFFITS; `None` when deletion degrees of freedom are insufficient.
    pub dffits: Option<f64>,
    /// DFBETAS per fitted coefficient; `None` as for DFFITS.
    pub dfbetas: Option<Vec<f64>>,
    /// Whether the Rstudent cutoff flags this line.
    pub suspect: bool,
}

/// Structured report of one complete fit.
#[derive(Debug, Clone, PartialEq)]
pub struct FitReport {
    pub system: CrystalSystem,
    pub wavelength: f64,
    /// Fitted cell lengths and volume with standard errors.
    pub cell: CellParameters,
    /// Residual standard error σ̂ of the linear fit.
    pub residual_std_error: f64,
    pub df_residual: usize,
    pub n_observations: usize,
    pub n_parameters: usize,
    /// False when the fit had too few degrees of freedom for
    /// per-observation diagnostics.
    pub diagnostics_available: bool,
    pub rows: Vec<ReportRow>,
}

/// Invert Bragg's law on a fitted response to recover the angle.
fn two_theta_from_q(q: f64, wavelength: f64) -> f64 {
    if q <= 0.0 {
        return f64::NAN;
    }
    let sin_theta = wavelength * q.sqrt() / 2.0;
    if sin_theta <= 0.0 || sin_theta >= 1.0 {
        return f64::NAN;
    }
    2.0 * sin_theta.asin().to_degrees()
}

pub(crate) fn assemble(fit: &FittedCell) -> FitReport {
    let result = fit.result();
    let diagnostics = fit.diagnostics();
    let diag_rows = diagnostics.rows();

    let rows = fit
        .observations()
        .iter()
        .enumerate()
        .map(|(i, obs)| {
            let q_observed = result.observed_q[i];
            let q_calculated = result.fitted_q[i];
            let two_theta_calculated = two_theta_from_q(q_calculated, result.wavelength);
            let diag = diag_rows.map(|rows| &rows[i]);

            ReportRow {
                index: i,
                h: obs.h,
                k: obs.k,
                l: obs.l,
                two_theta_observed: obs.two_theta,
                two_theta_calculated,
                two_theta_residual: obs.two_theta - two_theta_calculated,
                d_observed: obs.d_spacing(result.wavelength).unwrap_or(f64::NAN),
                d_calculated: if q_calculated > 0.0 {
                    1.0 / q_calculated.sqrt()
                } else {
                    f64::NAN
                },
                q_observed,
                q_calculated,
                leverage: result.leverage[i],
                rstudent: diag.map(|d| d.rstudent),
                dffits: diag.and_then(|d| d.dffits),
                dfbetas: diag.and_then(|d| d.dfbetas.clone()),
                suspect: diag.map(|d| d.is_suspect()).unwrap_or(false),
            }
        })
        .collect();

    FitReport {
        system: result.system,
        wavelength: result.wavelength,
        cell: result.cell,
        residual_std_error: result.residual_std_error(),
        df_residual: result.df_residual,
        n_observations: result.n_observations,
        n_parameters: result.n_parameters,
        diagnostics_available: diag_rows.is_some(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_theta_inversion_roundtrip() {
        let wavelength = 1.5406;
        // d = 2.0 → q = 0.25
        let q = 0.25;
        let two_theta = two_theta_from_q(q, wavelength);

        let theta = (two_theta / 2.0).to_radians();
        let d = wavelength / (2.0 * theta.sin());
        assert!((1.0 / (d * d) - q).abs() < 1e-12);
    }

    #[test]
    fn test_two_theta_undefined_outside_bragg_range() {
        assert!(two_theta_from_q(-0.1, 1.0).is_nan());
        assert!(two_theta_from_q(0.0, 1.0).is_nan());
        // sin(theta) would exceed 1
        assert!(two_theta_from_q(9.0, 1.0).is_nan());
    }
}
