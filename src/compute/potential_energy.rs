use crate::atomic::ForceBuffers;

pub fn potential_energy(buffers: &ForceBuffers) -> f64 {
    buffers.potential.iter().sum()
}
