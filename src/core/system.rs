//! Crystal systems and their reciprocal-metric design rows.

use crate::core::observation::Observation;
use crate::error::FitError;
use faer::Mat;

/// Crystal system of the cell being refined.
///
/// Each system fixes the number of free reciprocal-metric coefficients
/// and how they combine the Miller indices:
///
/// | System       | Coefficients            | Basis row                        |
/// |--------------|-------------------------|----------------------------------|
/// | Cubic        | 1/a²                    | h² + k² + l²                     |
/// | Tetragonal   | 1/a², 1/c²              | h² + k², l²                      |
/// | Hexagonal    | 1/a², 1/c²              | (4/3)(h² + hk + k²), l²          |
/// | Orthorhombic | 1/a², 1/b², 1/c²        | h², k², l²                       |
///
/// Monoclinic and triclinic cells need off-diagonal metric terms and
/// are not supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrystalSystem {
    Cubic,
    Tetragonal,
    Hexagonal,
    Orthorhombic,
}

impl CrystalSystem {
    /// Number of free reciprocal-metric coefficients.
    pub fn parameter_count(&self) -> usize {
        match self {
            CrystalSystem::Cubic => 1,
            CrystalSystem::Tetragonal | CrystalSystem::Hexagonal => 2,
            CrystalSystem::Orthorhombic => 3,
        }
    }

    /// Basis-function row for one set of Miller indices.
    pub fn design_row(&self, h: i32, k: i32, l: i32) -> Vec<f64> {
        let (h, k, l) = (f64::from(h), f64::from(k), f64::from(l));
        match self {
            CrystalSystem::Cubic => vec![h * h + k * k + l * l],
            CrystalSystem::Tetragonal => vec![h * h + k * k, l * l],
            CrystalSystem::Hexagonal => vec![4.0 / 3.0 * (h * h + h * k + k * k), l * l],
            CrystalSystem::Orthorhombic => vec![h * h, k * k, l * l],
        }
    }

    /// Build the design matrix, one row per observation.
    ///
    /// The model runs through the origin (Q = 0 when h = k = l = 0), so
    /// no intercept column is added. Fails when the number of
    /// observations does not strictly exceed the parameter count.
    pub fn design_matrix(&self, observations: &[Observation]) -> Result<Mat<f64>, FitError> {
        let n = observations.len();
        let p = self.parameter_count();

        if n <= p {
            return Err(FitError::InsufficientData { needed: p, got: n });
        }

        Ok(Mat::from_fn(n, p, |i, j| {
            let obs = &observations[i];
            self.design_row(obs.h, obs.k, obs.l)[j]
        }))
    }

    /// Exponent of each cell length in the volume formula.
    ///
    /// V = prefactor · ∏ L_j^(m_j): a³ for cubic, a²c for tetragonal and
    /// hexagonal, abc for orthorhombic.
    pub(crate) fn length_exponents(&self) -> &'static [f64] {
        match self {
            CrystalSystem::Cubic => &[3.0],
            CrystalSystem::Tetragonal | CrystalSystem::Hexagonal => &[2.0, 1.0],
            CrystalSystem::Orthorhombic => &[1.0, 1.0, 1.0],
        }
    }

    /// Geometric prefactor of the volume formula.
    pub(crate) fn volume_prefactor(&self) -> f64 {
        match self {
            CrystalSystem::Hexagonal => 3.0_f64.sqrt() / 2.0,
            _ => 1.0,
        }
    }
}
