use rayon::prelude::*;

use crate::Atoms;

/// Sum of m v^2 over all atoms, the quantity the thermostats work with
pub fn twice_kinetic_energy(atoms: &Atoms) -> f64 {
    atoms
        .velocities
        .par_iter()
        .zip(atoms.masses.par_iter())
        .map(|(v, m)| m * (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]))
        .sum()
}

pub fn kinetic_energy(atoms: &Atoms) -> f64 {
    0.5 * twice_kinetic_energy(atoms)
}
