//! Natural units: energy in eV, length in angstrom, mass in amu.
//!
//! The derived unit of time is about 10.18 fs.

/// Boltzmann constant in eV/K
pub const K_B: f64 = 8.617343e-5;

/// Femtoseconds per natural time unit
pub const TIME_UNIT_CONVERSION: f64 = 1.018051e1;

/// Spatial dimension, used for degrees of freedom
pub const DIM: usize = 3;

/// Convert a timestep in fs into natural time units
pub fn fs_to_natural(dt_fs: f64) -> f64 {
    dt_fs / TIME_UNIT_CONVERSION
}
