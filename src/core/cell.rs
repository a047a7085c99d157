//! Recovery of direct-space cell parameters from fitted coefficients.

use crate::core::system::CrystalSystem;
use crate::error::FitError;
use faer::{Col, Mat};

/// A derived quantity with its propagated standard error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    pub value: f64,
    pub std_error: f64,
}

/// Direct-space cell parameters with propagated uncertainties.
///
/// Symmetry-equivalent edges repeat the same estimate: a cubic cell
/// reports a = b = c, tetragonal and hexagonal cells report b = a.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellParameters {
    pub a: Estimate,
    pub b: Estimate,
    pub c: Estimate,
    /// Cell volume in cubic length units.
    pub volume: Estimate,
}

/// Map fitted reciprocal-metric coefficients back to cell lengths and
/// volume.
///
/// Each coefficient is p_j = 1/L_j², so L_j = p_j^(-1/2) and, to first
/// order, s(L_j) = ½·L_j³·s(p_j). The volume error uses the full
/// coefficient covariance: lengths sharing a fit are correlated, and
/// the cross terms shift the result.
pub(crate) fn derive_cell(
    system: CrystalSystem,
    coefficients: &Col<f64>,
    covariance: &Mat<f64>,
) -> Result<CellParameters, FitError> {
    let p = system.parameter_count();

    let mut lengths = Vec::with_capacity(p);
    for j in 0..p {
        let coeff = coefficients[j];
        if coeff <= 0.0 {
            return Err(FitError::DegenerateParameter {
                index: j,
                value: coeff,
            });
        }

        let length = coeff.powf(-0.5);
        let var = covariance[(j, j)];
        let std_error = if var >= 0.0 {
            0.5 * length.powi(3) * var.sqrt()
        } else {
            f64::NAN
        };
        lengths.push(Estimate {
            value: length,
            std_error,
        });
    }

    let volume = propagate_volume(system, coefficients, covariance, &lengths);

    let (a, b, c) = match system {
        CrystalSystem::Cubic => (lengths[0], lengths[0], lengths[0]),
        CrystalSystem::Tetragonal | CrystalSystem::Hexagonal => {
            (lengths[0], lengths[0], lengths[1])
        }
        CrystalSystem::Orthorhombic => (lengths[0], lengths[1], lengths[2]),
    };

    Ok(CellParameters { a, b, c, volume })
}

/// Delta-method propagation of the volume uncertainty.
///
/// V = f·∏ L_j^(m_j) = f·∏ p_j^(-m_j/2), so ∂V/∂p_j = -(m_j/2)·V/p_j,
/// and Var(V) = gᵀ·Cov(p)·g.
fn propagate_volume(
    system: CrystalSystem,
    coefficients: &Col<f64>,
    covariance: &Mat<f64>,
    lengths: &[Estimate],
) -> Estimate {
    let exponents = system.length_exponents();
    let p = exponents.len();

    let mut value = system.volume_prefactor();
    for (j, &m) in exponents.iter().enumerate() {
        value *= lengths[j].value.powf(m);
    }

    let gradient: Vec<f64> = (0..p)
        .map(|j| -(exponents[j] / 2.0) * value / coefficients[j])
        .collect();

    let mut var = 0.0;
    for j in 0..p {
        for k in 0..p {
            var += gradient[j] * covariance[(j, k)] * gradient[k];
        }
    }

    Estimate {
        value,
        std_error: if var >= 0.0 { var.sqrt() } else { f64::NAN },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diag_cov(vars: &[f64]) -> Mat<f64> {
        Mat::from_fn(vars.len(), vars.len(), |i, j| if i == j { vars[i] } else { 0.0 })
    }

    #[test]
    fn test_cubic_length_and_error() {
        // p = 1/a² for a = 5 is 0.04
        let coeffs = Col::from_fn(1, |_| 0.04);
        let cov = diag_cov(&[1e-10]);

        let cell = derive_cell(CrystalSystem::Cubic, &coeffs, &cov).expect("physical");
        assert!((cell.a.value - 5.0).abs() < 1e-12);
        assert_eq!(cell.a, cell.b);
        assert_eq!(cell.a, cell.c);

        // s(a) = 0.5 a³ s(p)
        let expected = 0.5 * 125.0 * 1e-5;
        assert!((cell.a.std_error - expected).abs() < 1e-15);

        // V = a³, s(V) = 3a² s(a) for a single parameter
        assert!((cell.volume.value - 125.0).abs() < 1e-9);
        assert!((cell.volume.std_error - 3.0 * 25.0 * expected).abs() < 1e-12);
    }

    #[test]
    fn test_hexagonal_volume_prefactor() {
        // a = 2, c = 4: V = (sqrt(3)/2) a² c
        let coeffs = Col::from_fn(2, |j| if j == 0 { 0.25 } else { 0.0625 });
        let cov = diag_cov(&[0.0, 0.0]);

        let cell = derive_cell(CrystalSystem::Hexagonal, &coeffs, &cov).expect("physical");
        assert_eq!(cell.b, cell.a);
        let expected = 3.0_f64.sqrt() / 2.0 * 4.0 * 4.0;
        assert!((cell.volume.value - expected).abs() < 1e-12);
    }

    #[test]
    fn test_orthorhombic_lengths() {
        let coeffs = Col::from_fn(3, |j| 1.0 / ((j + 2) as f64).powi(2));
        let cov = diag_cov(&[0.0, 0.0, 0.0]);

        let cell = derive_cell(CrystalSystem::Orthorhombic, &coeffs, &cov).expect("physical");
        assert!((cell.a.value - 2.0).abs() < 1e-12);
        assert!((cell.b.value - 3.0).abs() < 1e-12);
        assert!((cell.c.value - 4.0).abs() < 1e-12);
        assert!((cell.volume.value - 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_coefficient_rejected() {
        let coeffs = Col::from_fn(2, |j| if j == 0 { 0.04 } else { -0.01 });
        let cov = diag_cov(&[0.0, 0.0]);

        let err = derive_cell(CrystalSystem::Tetragonal, &coeffs, &cov).unwrap_err();
        match err {
            FitError::DegenerateParameter { index, value } => {
                assert_eq!(index, 1);
                assert!((value - (-0.01)).abs() < 1e-15);
            }
            other => panic!("expected DegenerateParameter, got {other:?}"),
        }
    }
}
