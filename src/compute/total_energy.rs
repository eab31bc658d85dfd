use super::{kinetic_energy, potential_energy};
use crate::{atomic::ForceBuffers, Atoms};

pub fn total_energy(atoms: &Atoms, buffers: &ForceBuffers) -> f64 {
    potential_energy(buffers) + kinetic_energy(atoms)
}
