//! Matrix utility functions shared by the solver and diagnostics.

use faer::{Col, Mat};

/// Compute XᵀX (cross-product matrix).
pub fn cross_product(design: &Mat<f64>) -> Mat<f64> {
    design.transpose() * design
}

/// Compute (XᵀX)⁻¹ using QR decomposition with back-substitution.
///
/// Returns `None` when a diagonal entry of R underflows the tolerance,
/// i.e. the cross-product matrix is numerically singular.
pub fn cross_product_inverse(xtx: &Mat<f64>, tolerance: f64) -> Option<Mat<f64>> {
    let p = xtx.nrows();
    let qr = xtx.qr();
    let q = qr.compute_q();
    let r = qr.compute_r().to_owned();
    let qt = q.transpose().to_owned();

    for i in 0..p {
        if r[(i, i)].abs() < tolerance {
            return None;
        }
    }

    // Solve R · inv[:, col] = Qᵀ[:, col] for each column of the inverse
    let mut inv = Mat::zeros(p, p);
    for col in 0..p {
        let solution = solve_triangular_column(&r, &qt, col, p);
        for row in 0..p {
            inv[(row, col)] = solution[row];
        }
    }
    Some(inv)
}

/// Solve for one column of the inverse via back-substitution.
fn solve_triangular_column(r: &Mat<f64>, qt: &Mat<f64>, col: usize, p: usize) -> Vec<f64> {
    let mut solution = vec![0.0; p];

    for i in (0..p).rev() {
        let mut sum = qt[(i, col)];
        for j in (i + 1)..p {
            sum -= r[(i, j)] * solution[j];
        }
        solution[i] = sum / r[(i, i)];
    }

    solution
}

/// Hat-matrix diagonal h_i = xᵢᵀ·(XᵀX)⁻¹·xᵢ, one entry per design row.
///
/// Each value is clamped to [0, 1]; their sum equals the number of
/// fitted parameters.
pub fn hat_diagonal(design: &Mat<f64>, xtx_inverse: &Mat<f64>) -> Col<f64> {
    let n = design.nrows();
    let p = design.ncols();

    Col::from_fn(n, |i| {
        let mut h_ii = 0.0;
        for j in 0..p {
            for k in 0..p {
                h_ii += design[(i, j)] * xtx_inverse[(j, k)] * design[(i, k)];
            }
        }
        h_ii.clamp(0.0, 1.0)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn well_conditioned_design() -> Mat<f64> {
        Mat::from_fn(20, 2, |i, j| {
            if j == 0 {
                (i + 1) as f64
            } else {
                ((i + 1) as f64).sin() + 2.0
            }
        })
    }

    #[test]
    fn test_cross_product_inverse_roundtrip() {
        let x = well_conditioned_design();
        let xtx = cross_product(&x);
        let inv = cross_product_inverse(&xtx, 1e-12).expect("invertible");

        let product = &xtx * &inv;
        for i in 0..2 {
            for j in 0..2 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!(
                    (product[(i, j)] - expected).abs() < 1e-8,
                    "Product[{},{}] = {}, expected {}",
                    i,
                    j,
                    product[(i, j)],
                    expected
                );
            }
        }
    }

    #[test]
    fn test_singular_cross_product_detected() {
        // Second column is twice the first
        let x = Mat::from_fn(10, 2, |i, j| (i + 1) as f64 * (j + 1) as f64);
        let xtx = cross_product(&x);
        assert!(cross_product_inverse(&xtx, 1e-10).is_none());
    }

    #[test]
    fn test_hat_diagonal_sums_to_parameter_count() {
        let x = well_conditioned_design();
        let xtx = cross_product(&x);
        let inv = cross_product_inverse(&xtx, 1e-12).expect("invertible");

        let h = hat_diagonal(&x, &inv);
        let sum: f64 = h.iter().sum();
        assert!(
            (sum - 2.0).abs() < 1e-8,
            "Sum of leverage {} should equal parameter count 2",
            sum
        );

        for i in 0..h.nrows() {
            assert!(h[i] >= 0.0 && h[i] <= 1.0);
        }
    }
}
