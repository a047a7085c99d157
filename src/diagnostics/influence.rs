//! Deletion-influence measures: DFFITS and DFBETAS.

use faer::{Col, Mat};

/// DFFITS: standardized change in the fitted value at observation i
/// when i is deleted.
///
/// DFFITS_i = r*_i·√(h_ii / (1 − h_ii)) with r*_i the externally
/// studentized residual. Large magnitude means the line strongly
/// steers its own prediction.
pub fn dffits(residuals: &Col<f64>, leverage: &Col<f64>, mse: f64, df_residual: usize) -> Col<f64> {
    let n = residuals.nrows();

    if df_residual <= 1 || mse <= 0.0 || !mse.is_finite() {
        return Col::from_fn(n, |_| f64::NAN);
    }

    let rss = mse * df_residual as f64;
    let df_loo = (df_residual - 1) as f64;

    Col::from_fn(n, |i| {
        let e_i = residuals[i];
        let h_ii = leverage[i];
        let one_minus_h = (1.0 - h_ii).max(1e-14);

        let rss_loo = rss - e_i * e_i / one_minus_h;
        if rss_loo <= 0.0 {
            return f64::NAN;
        }
        let s_loo = (rss_loo / df_loo).sqrt();

        let r_star = e_i / (s_loo * one_minus_h.sqrt());
        r_star * (h_ii / one_minus_h).sqrt()
    })
}

/// DFBETAS: standardized change in each coefficient when observation i
/// is deleted, one row per observation and one column per coefficient.
///
/// Uses the closed-form deletion update rather than refitting:
/// β − β_(i) = (XᵀX)⁻¹·xᵢ·e_i / (1 − h_ii), standardized by
/// s_(i)·√((XᵀX)⁻¹_jj).
pub fn dfbetas(
    design: &Mat<f64>,
    xtx_inverse: &Mat<f64>,
    residuals: &Col<f64>,
    leverage: &Col<f64>,
    mse: f64,
    df_residual: usize,
) -> Mat<f64> {
    let n = design.nrows();
    let p = design.ncols();

    if df_residual <= 1 || mse <= 0.0 || !mse.is_finite() {
        return Mat::from_fn(n, p, |_, _| f64::NAN);
    }

    let rss = mse * df_residual as f64;
    let df_loo = (df_residual - 1) as f64;

    Mat::from_fn(n, p, |i, j| {
        let e_i = residuals[i];
        let one_minus_h = (1.0 - leverage[i]).max(1e-14);

        let rss_loo = rss - e_i * e_i / one_minus_h;
        if rss_loo <= 0.0 {
            return f64::NAN;
        }
        let s_loo = (rss_loo / df_loo).sqrt();

        // j-th entry of (XᵀX)⁻¹·xᵢ
        let mut c_ji = 0.0;
        for k in 0..p {
            c_ji += xtx_inverse[(j, k)] * design[(i, k)];
        }

        let delta_beta = c_ji * e_i / one_minus_h;
        delta_beta / (s_loo * xtx_inverse[(j, j)].sqrt())
    })
}

/// Indices of observations with |DFFITS| above `threshold`.
///
/// The conventional cutoff is 2·√(p/n).
pub fn influential_dffits(dffits: &Col<f64>, n_params: usize, threshold: Option<f64>) -> Vec<usize> {
    let n = dffits.nrows();
    let cutoff = threshold.unwrap_or(2.0 * (n_params as f64 / n as f64).sqrt());

    dffits
        .iter()
        .enumerate()
        .filter(|(_, &d)| d.is_finite() && d.abs() > cutoff)
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dffits_grows_with_leverage_and_residual() {
        let mut residuals = Col::from_fn(10, |_| 0.2);
        let mut leverage = Col::from_fn(10, |_| 0.1);
        residuals[6] = 1.5;
        leverage[6] = 0.5;

        let rss: f64 = residuals.iter().map(|&e| e * e).sum();
        let df = 8;
        let d = dffits(&residuals, &leverage, rss / df as f64, df);

        for i in 0..10 {
            if i != 6 && d[i].is_finite() {
                assert!(
                    d[6].abs() > d[i].abs(),
                    "DFFITS[6] = {} should dominate DFFITS[{}] = {}",
                    d[6],
                    i,
                    d[i]
                );
            }
        }
    }

    #[test]
    fn test_deletion_stats_nan_without_deletion_df() {
        let residuals = Col::from_fn(3, |i| i as f64 * 0.1);
        let leverage = Col::from_fn(3, |_| 0.3);
        let design = Mat::from_fn(3, 2, |i, j| (i + j + 1) as f64);
        let xtx_inv = Mat::identity(2, 2);

        let d = dffits(&residuals, &leverage, 0.5, 1);
        let b = dfbetas(&design, &xtx_inv, &residuals, &leverage, 0.5, 1);
        for i in 0..3 {
            assert!(d[i].is_nan());
            assert!(b[(i, 0)].is_nan() && b[(i, 1)].is_nan());
        }
    }

    #[test]
    fn test_influential_dffits_threshold() {
        let mut d = Col::from_fn(16, |_| 0.1);
        d[3] = -2.0;
        d[9] = 1.4;

        let flagged = influential_dffits(&d, 2, Some(1.0));
        assert_eq!(flagged, vec![3, 9]);
    }
}
