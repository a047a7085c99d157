//! Error types for cell refinement.

use thiserror::Error;

/// Errors that can occur during a unit-cell fit.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    /// The wavelength does not describe a physical beam.
    #[error("wavelength must be positive, got {0}")]
    InvalidWavelength(f64),

    /// An observation falls outside the physical range of Bragg's law.
    #[error(
        "invalid observation at index {index}: two-theta {two_theta} deg with \
         wavelength {wavelength} gives sin(theta) outside (0, 1)"
    )]
    InvalidObservation {
        index: usize,
        two_theta: f64,
        wavelength: f64,
    },

    /// Too few observations for the chosen crystal system.
    #[error("insufficient observations: need more than {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// The Miller-index set does not determine all metric parameters.
    #[error("design matrix is singular or nearly singular")]
    SingularDesign,

    /// A fitted reciprocal-metric coefficient is non-positive, so no
    /// real cell length corresponds to it.
    #[error("fitted coefficient {index} is {value}, expected positive; cell parameters undefined")]
    DegenerateParameter { index: usize, value: f64 },
}
