use rayon::prelude::*;

use crate::Atoms;

/// Velocity-verlet integrator
///
/// Atoms marked as fixed keep their positions and have zero velocity.
#[derive(Clone, Debug, Default)]
pub struct Verlet {
    fixed: Vec<bool>,
}

impl Verlet {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_fixed_atoms(num_atoms: usize, fixed: &[usize]) -> Self {
        let mut mask = vec![false; num_atoms];
        for &atom in fixed {
            assert!(atom < num_atoms, "Fixed atom {} out of range", atom);
            mask[atom] = true;
        }
        Self { fixed: mask }
    }
    pub fn num_fixed(&self) -> usize {
        self.fixed.iter().filter(|&&f| f).count()
    }
    pub fn is_fixed(&self, atom: usize) -> bool {
        self.fixed.get(atom).copied().unwrap_or(false)
    }

    /// Kick the velocities by half a timestep, then drift the positions
    pub fn first_half(&self, dt: f64, atoms: &mut Atoms, forces: &[[f64; 3]]) {
        self.increment_velocity_halfstep(dt, atoms, forces);
        atoms
            .positions
            .par_iter_mut()
            .zip(atoms.velocities.par_iter())
            .for_each(|(x, v)| {
                x[0] += dt * v[0];
                x[1] += dt * v[1];
                x[2] += dt * v[2];
            });
    }

    /// Kick the velocities by half a timestep
    pub fn second_half(&self, dt: f64, atoms: &mut Atoms, forces: &[[f64; 3]]) {
        self.increment_velocity_halfstep(dt, atoms, forces);
    }

    fn increment_velocity_halfstep(&self, dt: f64, atoms: &mut Atoms, forces: &[[f64; 3]]) {
        assert_eq!(forces.len(), atoms.num_atoms(), "One force per atom is needed");
        let half_ts = 0.5 * dt;
        atoms
            .velocities
            .par_iter_mut()
            .zip(atoms.masses.par_iter())
            .zip(forces.par_iter())
            .enumerate()
            .for_each(|(i, ((v, m), f))| {
                if self.is_fixed(i) {
                    *v = [0.0; 3];
                    return;
                }
                v[0] += half_ts * f[0] / m;
                v[1] += half_ts * f[1] / m;
                v[2] += half_ts * f[2] / m;
            });
    }
}
