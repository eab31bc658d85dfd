use super::{AtomicPotentialTrait, ForceBuffers};
use crate::{Atoms, Container, NeighborList};

/// No interaction at all, for ideal-gas runs
#[derive(Default)]
pub struct None_ {}
impl None_ {
    pub fn new() -> Self {
        Self {}
    }
}
impl AtomicPotentialTrait for None_ {
    fn cutoff_distance(&self) -> f64 {
        0.0
    }
    fn compute(
        &mut self,
        _atoms: &Atoms,
        _container: &Container,
        _neighbors: &NeighborList,
        _buffers: &mut ForceBuffers,
    ) {
    }
}
