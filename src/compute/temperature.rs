use super::twice_kinetic_energy;
use crate::{
    units::{DIM, K_B},
    Atoms,
};

/// Instantaneous temperature in K, with 3N degrees of freedom
pub fn temperature(atoms: &Atoms) -> f64 {
    let n = atoms.num_atoms();
    if n == 0 {
        return 0.0;
    }
    twice_kinetic_energy(atoms) / ((DIM * n) as f64 * K_B)
}
