//! Observed diffraction lines and their linear-model response.

use crate::error::FitError;
use faer::Col;

/// A single indexed powder-diffraction line.
///
/// `two_theta` is the diffraction angle in degrees as read off the
/// instrument; theta is half of it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// Miller index h.
    pub h: i32,
    /// Miller index k.
    pub k: i32,
    /// Miller index l.
    pub l: i32,
    /// Diffraction angle in degrees.
    pub two_theta: f64,
}

impl Observation {
    /// Create an observation from an indexed line.
    pub fn new(h: i32, k: i32, l: i32, two_theta: f64) -> Self {
        Self { h, k, l, two_theta }
    }

    /// Half the diffraction angle, in radians.
    pub fn theta_radians(&self) -> f64 {
        (self.two_theta / 2.0).to_radians()
    }

    /// d-spacing via Bragg's law: d = wavelength / (2 sin(theta)).
    ///
    /// Returns `None` when sin(theta) falls outside (0, 1) or the
    /// wavelength is non-positive, in which case no plane spacing
    /// corresponds to the line.
    pub fn d_spacing(&self, wavelength: f64) -> Option<f64> {
        if wavelength <= 0.0 {
            return None;
        }
        let sin_theta = self.theta_radians().sin();
        if sin_theta <= 0.0 || sin_theta >= 1.0 {
            return None;
        }
        Some(wavelength / (2.0 * sin_theta))
    }

    /// Linear-model response Q = 1/d².
    pub fn q_value(&self, wavelength: f64) -> Option<f64> {
        self.d_spacing(wavelength).map(|d| 1.0 / (d * d))
    }
}

/// Build the response vector Q, one entry per observation in input order.
///
/// The wavelength is validated once up front; each observation is then
/// checked against the physical range of Bragg's law.
pub fn response_vector(observations: &[Observation], wavelength: f64) -> Result<Col<f64>, FitError> {
    if wavelength <= 0.0 {
        return Err(FitError::InvalidWavelength(wavelength));
    }

    let mut q = Col::zeros(observations.len());
    for (index, obs) in observations.iter().enumerate() {
        match obs.q_value(wavelength) {
            Some(value) => q[index] = value,
            None => {
                return Err(FitError::InvalidObservation {
                    index,
                    two_theta: obs.two_theta,
                    wavelength,
                })
            }
        }
    }

    Ok(q)
}
