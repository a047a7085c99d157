//! Studentized residuals.

use faer::Col;

/// Internally studentized residuals: e_i / (σ̂·√(1 − h_ii)).
///
/// Scaling by the leverage accounts for the varying variance of
/// residuals across the design.
pub fn studentized_residuals(residuals: &Col<f64>, leverage: &Col<f64>, mse: f64) -> Col<f64> {
    let n = residuals.nrows();

    if mse <= 0.0 || !mse.is_finite() {
        return Col::from_fn(n, |_| f64::NAN);
    }

    let s = mse.sqrt();

    Col::from_fn(n, |i| {
        let denominator = s * (1.0 - leverage[i]).max(1e-14).sqrt();
        residuals[i] / denominator
    })
}

/// Externally studentized residuals (Rstudent).
///
/// Uses the leave-one-out residual mean square:
/// e_i / (s_(i)·√(1 − h_ii)), with RSS_(i) = RSS − e_i²/(1 − h_ii).
/// Under the null these follow a t-distribution with df − 1 degrees of
/// freedom, where df = n − p; lines with |Rstudent| > 2 are
/// conventionally treated as suspect.
pub fn externally_studentized_residuals(
    residuals: &Col<f64>,
    leverage: &Col<f64>,
    mse: f64,
    df_residual: usize,
) -> Col<f64> {
    let n = residuals.nrows();

    if df_residual <= 1 || mse <= 0.0 || !mse.is_finite() {
        return Col::from_fn(n, |_| f64::NAN);
    }

    let rss = mse * df_residual as f64;
    let df_loo = (df_residual - 1) as f64;

    Col::from_fn(n, |i| {
        let e_i = residuals[i];
        let one_minus_h = (1.0 - leverage[i]).max(1e-14);

        let rss_loo = rss - e_i * e_i / one_minus_h;
        if rss_loo <= 0.0 {
            return f64::NAN;
        }
        let mse_loo = rss_loo / df_loo;

        e_i / (mse_loo.sqrt() * one_minus_h.sqrt())
    })
}

/// Indices of observations with |studentized residual| above `threshold`.
pub fn residual_outliers(studentized: &Col<f64>, threshold: f64) -> Vec<usize> {
    studentized
        .iter()
        .enumerate()
        .filter(|(_, &r)| r.abs() > threshold)
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_studentized_scaling() {
        let residuals = Col::from_fn(6, |i| i as f64 - 2.5);
        let leverage = Col::from_fn(6, |_| 0.25);
        let mse = 4.0;

        let stud = studentized_residuals(&residuals, &leverage, mse);
        let factor = 2.0 * 0.75_f64.sqrt();
        for i in 0..6 {
            assert!((stud[i] - residuals[i] / factor).abs() < 1e-12);
        }
    }

    #[test]
    fn test_externally_studentized_needs_deletion_df() {
        let residuals = Col::from_fn(3, |i| i as f64 * 0.1);
        let leverage = Col::from_fn(3, |_| 0.3);

        // df_residual = 1 leaves no deletion degree of freedom
        let rstudent = externally_studentized_residuals(&residuals, &leverage, 0.5, 1);
        for i in 0..3 {
            assert!(rstudent[i].is_nan());
        }
    }

    #[test]
    fn test_external_exceeds_internal_for_large_residual() {
        // The dominant residual inflates the full-sample sigma, so
        // removing it makes its own standardized size grow
        let mut residuals = Col::from_fn(8, |_| 0.1);
        residuals[4] = 2.0;
        let leverage = Col::from_fn(8, |_| 0.2);
        let rss: f64 = residuals.iter().map(|&e| e * e).sum();
        let df = 6;
        let mse = rss / df as f64;

        let internal = studentized_residuals(&residuals, &leverage, mse);
        let external = externally_studentized_residuals(&residuals, &leverage, mse, df);
        assert!(external[4].abs() > internal[4].abs());
    }

    #[test]
    fn test_outlier_indices() {
        let studentized = Col::from_fn(5, |i| if i == 3 { -3.5 } else { 0.4 });
        assert_eq!(residual_outliers(&studentized, 2.0), vec![3]);
    }
}
