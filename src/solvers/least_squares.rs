//! Ordinary least squares through the origin.

use crate::error::FitError;
use crate::utils::{cross_product, cross_product_inverse, hat_diagonal};
use faer::{Col, Mat};

/// Solution of the linear system Q = X·p + ε.
///
/// Carries everything downstream consumers need: the coefficient
/// covariance for parameter errors, the retained (XᵀX)⁻¹ for deletion
/// diagnostics, and the hat-matrix diagonal.
#[derive(Debug, Clone)]
pub struct LinearFit {
    /// Fitted coefficient vector p.
    pub coefficients: Col<f64>,
    /// (XᵀX)⁻¹.
    pub xtx_inverse: Mat<f64>,
    /// Coefficient covariance σ̂²·(XᵀX)⁻¹.
    pub covariance: Mat<f64>,
    /// Fitted values X·p.
    pub fitted_values: Col<f64>,
    /// Residuals Q − X·p.
    pub residuals: Col<f64>,
    /// Hat-matrix diagonal.
    pub leverage: Col<f64>,
    /// Residual mean square RSS / (n − p).
    pub mse: f64,
    /// Residual degrees of freedom n − p.
    pub df_residual: usize,
}

/// Solve the least-squares problem with column-pivoted QR.
///
/// The model has no intercept: the response vanishes at h = k = l = 0,
/// so the regression runs through the origin. A design matrix whose
/// numerical rank falls below its column count (collinear basis rows
/// from a pathological Miller-index set) is rejected as
/// [`FitError::SingularDesign`]. Identical inputs always produce
/// identical outputs.
pub fn solve(x: &Mat<f64>, y: &Col<f64>, rank_tolerance: f64) -> Result<LinearFit, FitError> {
    let n = x.nrows();
    let p = x.ncols();

    if n <= p {
        return Err(FitError::InsufficientData { needed: p, got: n });
    }

    let qr = x.col_piv_qr();
    let q = qr.compute_q();
    let r = qr.compute_r();
    let perm = qr.col_permutation();

    // perm_inv[j] = where original column j ended up after pivoting
    let perm_arr = perm.arrays().0;
    let mut perm_inv: Vec<usize> = vec![0; p];
    perm_inv[..p].copy_from_slice(&perm_arr[..p]);

    for i in 0..p {
        if r[(i, i)].abs() < rank_tolerance {
            return Err(FitError::SingularDesign);
        }
    }

    // Back-substitution for the upper triangular system R·p_perm = Qᵀ·y
    let qty = q.transpose() * y;
    let mut beta_perm = Col::zeros(p);
    for i in (0..p).rev() {
        let mut sum = qty[i];
        for j in (i + 1)..p {
            sum -= r[(i, j)] * beta_perm[j];
        }
        beta_perm[i] = sum / r[(i, i)];
    }

    let coefficients = Col::from_fn(p, |j| beta_perm[perm_inv[j]]);

    let mut fitted_values = Col::zeros(n);
    let mut residuals = Col::zeros(n);
    for i in 0..n {
        let mut pred = 0.0;
        for j in 0..p {
            pred += x[(i, j)] * coefficients[j];
        }
        fitted_values[i] = pred;
        residuals[i] = y[i] - pred;
    }

    let rss: f64 = residuals.iter().map(|&e| e * e).sum();
    let df_residual = n - p;
    let mse = rss / df_residual as f64;

    let xtx = cross_product(x);
    let xtx_inverse = cross_product_inverse(&xtx, rank_tolerance).ok_or(FitError::SingularDesign)?;
    let covariance = Mat::from_fn(p, p, |i, j| mse * xtx_inverse[(i, j)]);
    let leverage = hat_diagonal(x, &xtx_inverse);

    Ok(LinearFit {
        coefficients,
        xtx_inverse,
        covariance,
        fitted_values,
        residuals,
        leverage,
        mse,
        df_residual,
    })
}
