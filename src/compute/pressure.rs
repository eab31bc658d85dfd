use super::twice_kinetic_energy;
use crate::{atomic::ForceBuffers, container::MinimumImage, units::DIM, Atoms};

/// Hydrostatic pressure in eV/A^3: (sum m v^2 + trace of the virial) / 3V
pub fn pressure(atoms: &Atoms, buffers: &ForceBuffers, container: &impl MinimumImage) -> f64 {
    let trace: f64 = buffers.virial.iter().map(|w| w[0] + w[1] + w[2]).sum();
    (twice_kinetic_energy(atoms) + trace) / (DIM as f64 * container.volume())
}
