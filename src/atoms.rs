use log::info;
use rand::{rngs::StdRng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

use crate::{atom_type::Species, units::K_B};

/// Atom properties during simulation, not including forces
#[derive(Clone, Debug, Default)]
pub struct Atoms {
    pub types: Vec<usize>,
    pub masses: Vec<f64>,
    pub positions: Vec<[f64; 3]>,
    pub velocities: Vec<[f64; 3]>,
    species: Vec<Species>,
}
impl Atoms {
    pub fn new(species: Vec<Species>) -> Self {
        assert!(!species.is_empty(), "At least one species is needed");
        Atoms {
            species,
            ..Default::default()
        }
    }
    pub fn num_atoms(&self) -> usize {
        self.types.len()
    }
    pub fn types(&self) -> &[usize] {
        &self.types
    }
    pub fn positions(&self) -> &[[f64; 3]] {
        &self.positions
    }
    pub fn velocities(&self) -> &[[f64; 3]] {
        &self.velocities
    }
    pub fn mass(&self, idx: usize) -> f64 {
        self.masses[idx]
    }
    pub fn species(&self) -> &[Species] {
        &self.species
    }
    pub fn num_types(&self) -> usize {
        self.species.len()
    }
    pub fn add_atoms(&mut self, atom_type: usize, coords: Vec<[f64; 3]>) {
        assert!(
            atom_type < self.num_types(),
            "Atom type {} out of range, {} species defined",
            atom_type,
            self.num_types()
        );
        let num_atoms = coords.len();
        let mass = self.species[atom_type].mass();
        self.types.extend(std::iter::repeat(atom_type).take(num_atoms));
        self.masses.extend(std::iter::repeat(mass).take(num_atoms));
        self.velocities
            .extend(std::iter::repeat([0.0, 0.0, 0.0]).take(num_atoms));
        self.positions.extend(coords);
    }

    /// Draw Maxwell-Boltzmann velocities, remove the center-of-mass drift and
    /// rescale to exactly `temperature`
    pub fn set_temperature(&mut self, temperature: f64, seed: u64) {
        assert!(
            temperature >= 0.0,
            "Temperature should not be negative, found {}",
            temperature
        );
        if self.num_atoms() == 0 {
            return;
        }
        let mut rng = StdRng::seed_from_u64(seed);
        for i in 0..self.num_atoms() {
            let sigma = (K_B * temperature / self.masses[i]).sqrt();
            self.velocities[i] = [0; 3].map(|_| {
                let z: f64 = StandardNormal.sample(&mut rng);
                sigma * z
            });
        }
        self.remove_drift();

        let current = crate::compute::temperature(self);
        if current > 0.0 {
            let lambda = (temperature / current).sqrt();
            self.velocities.iter_mut().for_each(|v| {
                v[0] *= lambda;
                v[1] *= lambda;
                v[2] *= lambda;
            });
        }
        info!(
            "Initialized velocities of {} atoms at {} K (seed {})",
            self.num_atoms(),
            temperature,
            seed
        );
    }

    /// Subtract the center-of-mass velocity from every atom
    pub fn remove_drift(&mut self) {
        let total_mass: f64 = self.masses.iter().sum();
        let mut momentum = [0.0; 3];
        for (v, m) in self.velocities.iter().zip(&self.masses) {
            for d in 0..3 {
                momentum[d] += m * v[d];
            }
        }
        let vcm = momentum.map(|p| p / total_mass);
        self.velocities.iter_mut().for_each(|v| {
            v[0] -= vcm[0];
            v[1] -= vcm[1];
            v[2] -= vcm[2];
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn argon_gas() -> Atoms {
        let mut atoms = Atoms::new(vec![Species::new("Ar", 39.948)]);
        let coords = (0..50).map(|i| [i as f64, 0.0, 0.0]).collect();
        atoms.add_atoms(0, coords);
        atoms
    }

    #[test]
    fn add_atoms_takes_mass_from_species() {
        let atoms = argon_gas();
        assert_eq!(atoms.num_atoms(), 50);
        assert!(atoms.masses.iter().all(|&m| m == 39.948));
    }

    #[test]
    fn set_temperature_is_exact_and_driftless() {
        let mut atoms = argon_gas();
        atoms.set_temperature(300.0, 7);
        assert_relative_eq!(crate::compute::temperature(&atoms), 300.0, epsilon = 1e-9);

        let mut momentum = [0.0; 3];
        for (v, m) in atoms.velocities.iter().zip(&atoms.masses) {
            for d in 0..3 {
                momentum[d] += m * v[d];
            }
        }
        for p in momentum {
            assert!(p.abs() < 1e-10);
        }
    }

    #[test]
    fn same_seed_same_velocities() {
        let mut a = argon_gas();
        let mut b = argon_gas();
        a.set_temperature(100.0, 42);
        b.set_temperature(100.0, 42);
        assert_eq!(a.velocities, b.velocities);
    }
}
