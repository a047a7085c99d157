//! Shared datasets and generators for integration tests.

use unitcell::Observation;

/// Five indexed Mg(OH)₂ lines measured at wavelength 0.4133 Å.
pub const MG_OH2_WAVELENGTH: f64 = 0.4133;

pub fn mg_oh2_lines() -> Vec<Observation> {
    vec![
        Observation::new(0, 0, 1, 5.692435),
        Observation::new(1, 0, 0, 9.362543),
        Observation::new(0, 1, 1, 10.966361),
        Observation::new(0, 1, 2, 14.766217),
        Observation::new(1, 1, 0, 16.248651),
    ]
}

/// Six indexed stishovite (tetragonal SiO₂) lines at the same wavelength.
pub fn stishovite_lines() -> Vec<Observation> {
    vec![
        Observation::new(1, 1, 0, 8.277043),
        Observation::new(1, 0, 1, 10.776637),
        Observation::new(1, 1, 1, 12.262541),
        Observation::new(2, 1, 0, 13.083539),
        Observation::new(2, 1, 1, 15.932403),
        Observation::new(2, 2, 0, 16.564225),
    ]
}

/// Two-theta (degrees) of a line with response Q at the given wavelength.
///
/// Inverse of Bragg's law; lets tests generate noise-free synthetic
/// observations from known cell parameters.
pub fn two_theta_for(q: f64, wavelength: f64) -> f64 {
    let sin_theta = wavelength * q.sqrt() / 2.0;
    2.0 * sin_theta.asin().to_degrees()
}
