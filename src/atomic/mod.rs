pub mod none;
pub mod reduction;
pub mod tersoff;

pub use none::None_;
pub use tersoff::{Tersoff, TersoffCoefficients, TersoffParameters};

use enum_dispatch::enum_dispatch;

use crate::{Atoms, Container, NeighborList};

/// Per-atom results of a force evaluation
///
/// Potentials add into these buffers, so several potential terms can share
/// them. The owner zeroes them once per step.
#[derive(Clone, Debug, Default)]
pub struct ForceBuffers {
    pub potential: Vec<f64>,
    pub force: Vec<[f64; 3]>,
    /// xx, yy, zz, xy, xz, yz, yx, zx, zy
    pub virial: Vec<[f64; 9]>,
}
impl ForceBuffers {
    pub fn new(num_atoms: usize) -> Self {
        let mut buffers = Self::default();
        buffers.reset(num_atoms);
        buffers
    }
    pub fn num_atoms(&self) -> usize {
        self.potential.len()
    }
    /// Resize to `num_atoms` and zero everything
    pub fn reset(&mut self, num_atoms: usize) {
        self.potential.clear();
        self.potential.resize(num_atoms, 0.0);
        self.force.clear();
        self.force.resize(num_atoms, [0.0; 3]);
        self.virial.clear();
        self.virial.resize(num_atoms, [0.0; 9]);
    }
    /// Sum of all per-atom forces
    pub fn net_force(&self) -> [f64; 3] {
        self.force.iter().fold([0.0; 3], |acc, f| {
            [acc[0] + f[0], acc[1] + f[1], acc[2] + f[2]]
        })
    }
}

#[enum_dispatch]
/// Trait for many-body atomic potentials
pub trait AtomicPotentialTrait {
    /// Get the maximum distance for effective interaction
    fn cutoff_distance(&self) -> f64;

    /// Add potential energy, forces and virials of all atoms into `buffers`
    fn compute(
        &mut self,
        atoms: &Atoms,
        container: &Container,
        neighbors: &NeighborList,
        buffers: &mut ForceBuffers,
    );
}

#[enum_dispatch(AtomicPotentialTrait)]
pub enum AtomicPotential {
    Tersoff,
    None_,
}
