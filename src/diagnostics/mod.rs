//! Per-observation regression diagnostics.
//!
//! The fit itself tells you how well the cell explains the lines as a
//! whole; the diagnostics tell you which individual lines to distrust:
//!
//! - **Leverage**: structural influence of a line's Miller indices on
//!   its own fitted value
//! - **Studentized residuals**: misfit scaled to its own standard error,
//!   internally or with the line deleted (Rstudent)
//! - **DFFITS / DFBETAS**: how much the prediction and each coefficient
//!   move when the line is deleted
//!
//! Deletion statistics are only reported when enough residual degrees
//! of freedom remain; see [`diagnose`].

mod influence;
mod residuals;

pub use influence::{dfbetas, dffits, influential_dffits};
pub use residuals::{externally_studentized_residuals, residual_outliers, studentized_residuals};

use crate::solvers::FittedCell;
use faer::Col;
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Conventional |Rstudent| cutoff for flagging a suspect line
/// (approximately the 95% two-sided level at large df).
pub const SUSPECT_RSTUDENT: f64 = 2.0;

/// Influence measures for one observation.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationDiagnostics {
    /// Position of the observation in the fit input.
    pub index: usize,
    /// Raw residual Q_obs − Q_calc.
    pub residual: f64,
    /// Hat-matrix diagonal h_ii.
    pub leverage: f64,
    /// Internally studentized residual.
    pub studentized: f64,
    /// Externally studentized residual.
    pub rstudent: f64,
    /// Two-sided p-value of `rstudent` against t(df − 1).
    pub rstudent_pvalue: f64,
    /// DFFITS; `None` when deletion degrees of freedom are insufficient.
    pub dffits: Option<f64>,
    /// DFBETAS, one entry per fitted coefficient; `None` as for DFFITS.
    pub dfbetas: Option<Vec<f64>>,
}

impl ObservationDiagnostics {
    /// Whether the line exceeds the conventional Rstudent cutoff.
    pub fn is_suspect(&self) -> bool {
        self.rstudent.abs() > SUSPECT_RSTUDENT
    }
}

/// Diagnostics for a whole fit, or the reason they are not available.
///
/// Unavailability is a documented degraded mode, not an error: a fit
/// with one residual degree of freedom is still a valid fit, it just
/// cannot support deletion statistics.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostics {
    /// One row per observation, in fit-input order.
    Available(Vec<ObservationDiagnostics>),
    /// Too few residual degrees of freedom (need at least 2).
    Unavailable { df_residual: usize },
}

impl Diagnostics {
    /// Whether per-observation rows were computed.
    pub fn is_available(&self) -> bool {
        matches!(self, Diagnostics::Available(_))
    }

    /// The per-observation rows, if available.
    pub fn rows(&self) -> Option<&[ObservationDiagnostics]> {
        match self {
            Diagnostics::Available(rows) => Some(rows),
            Diagnostics::Unavailable { .. } => None,
        }
    }

    /// Indices of lines flagged by the Rstudent cutoff.
    pub fn suspects(&self) -> Vec<usize> {
        self.rows()
            .map(|rows| {
                rows.iter()
                    .filter(|row| row.is_suspect())
                    .map(|row| row.index)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Compute per-observation diagnostics for a completed fit.
///
/// Requires df = n − p ≥ 2; below that every statistic that divides by
/// a deletion variance is undefined and the whole set is reported as
/// [`Diagnostics::Unavailable`]. DFFITS and DFBETAS additionally need
/// df ≥ 3 (at least two deletion degrees of freedom) and come back as
/// `None` per row otherwise, while leverage and the studentized
/// residuals remain populated.
pub fn diagnose(fit: &FittedCell) -> Diagnostics {
    let result = fit.result();
    let df = result.df_residual;

    if df < 2 {
        return Diagnostics::Unavailable { df_residual: df };
    }

    let studentized = studentized_residuals(&result.residuals, &result.leverage, result.mse);
    let rstudent =
        externally_studentized_residuals(&result.residuals, &result.leverage, result.mse, df);

    let deletion_defined = df >= 3;
    let dffits_col = deletion_defined
        .then(|| dffits(&result.residuals, &result.leverage, result.mse, df));
    let dfbetas_mat = deletion_defined.then(|| {
        dfbetas(
            fit.design(),
            fit.xtx_inverse(),
            &result.residuals,
            &result.leverage,
            result.mse,
            df,
        )
    });

    let t_dist = StudentsT::new(0.0, 1.0, (df - 1) as f64).ok();

    let rows = (0..result.n_observations)
        .map(|i| {
            let rstudent_pvalue = match (&t_dist, rstudent[i].is_finite()) {
                (Some(dist), true) => 2.0 * (1.0 - dist.cdf(rstudent[i].abs())),
                _ => f64::NAN,
            };

            ObservationDiagnostics {
                index: i,
                residual: result.residuals[i],
                leverage: result.leverage[i],
                studentized: studentized[i],
                rstudent: rstudent[i],
                rstudent_pvalue,
                dffits: dffits_col.as_ref().map(|d| d[i]),
                dfbetas: dfbetas_mat
                    .as_ref()
                    .map(|b| (0..result.n_parameters).map(|j| b[(i, j)]).collect()),
            }
        })
        .collect();

    Diagnostics::Available(rows)
}

/// Indices of observations with leverage above `threshold`.
///
/// The conventional cutoff is 2p/n.
pub fn high_leverage_points(
    leverage: &Col<f64>,
    n_params: usize,
    threshold: Option<f64>,
) -> Vec<usize> {
    let n = leverage.nrows();
    let cutoff = threshold.unwrap_or(2.0 * n_params as f64 / n as f64);

    leverage
        .iter()
        .enumerate()
        .filter(|(_, &h)| h > cutoff)
        .map(|(i, _)| i)
        .collect()
}
