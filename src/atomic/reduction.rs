//! Per-atom forces and virials from partial pair forces of a many-body
//! potential
use std::ops::Range;

use rayon::prelude::*;

use super::ForceBuffers;
use crate::{container::MinimumImage, utils::displacement, NeighborList};

/// Add forces and virials of the atoms in `range` into `buffers`
///
/// `f12[n1 * max_neighbors + slot]` holds dU_n1/dr_12 for the neighbor in
/// `slot`. The force on n1 collects `f12 - f21` over its neighbors, and the
/// virial of n1 is `r12 (x) f21` with r12 pointing from n1 to n2.
pub fn find_properties_many_body(
    range: Range<usize>,
    positions: &[[f64; 3]],
    container: &impl MinimumImage,
    neighbors: &NeighborList,
    f12: &[[f64; 3]],
    buffers: &mut ForceBuffers,
) {
    let max = neighbors.max_neighbors();
    assert_eq!(
        f12.len(),
        positions.len() * max,
        "Partial forces do not match the neighbor list shape"
    );
    let ForceBuffers { force, virial, .. } = buffers;
    force[range.clone()]
        .par_iter_mut()
        .zip(virial[range.clone()].par_iter_mut())
        .enumerate()
        .for_each(|(offset, (force, virial))| {
            let n1 = range.start + offset;
            for (i1, &n2) in neighbors.neighbors(n1).iter().enumerate() {
                let r12 = container.apply_mic(displacement(&positions[n1], &positions[n2]));
                let f_12 = f12[n1 * max + i1];
                let f_21 = neighbors
                    .slot_of(n2, n1)
                    .map_or([0.0; 3], |slot| f12[n2 * max + slot]);

                for d in 0..3 {
                    force[d] += f_12[d] - f_21[d];
                }
                virial[0] += r12[0] * f_21[0];
                virial[1] += r12[1] * f_21[1];
                virial[2] += r12[2] * f_21[2];
                virial[3] += r12[0] * f_21[1];
                virial[4] += r12[0] * f_21[2];
                virial[5] += r12[1] * f_21[2];
                virial[6] += r12[1] * f_21[0];
                virial[7] += r12[2] * f_21[0];
                virial[8] += r12[2] * f_21[1];
            }
        });
}
