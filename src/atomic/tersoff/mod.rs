//! Tersoff (1988) bond-order potential
//!
//! The energy of atom i is
//! `U_i = 1/2 sum_j fc(d_ij) (fr(d_ij) - b_ij fa(d_ij))` with the bond order
//! `b_ij = (1 + (beta zeta_ij)^n)^(-1/(2n))` and
//! `zeta_ij = sum_{k != j} fc(d_ik) g(cos theta_ijk) e(d_ij, d_ik)`.
//!
//! Evaluation takes two parallel passes over the atoms. The first caches
//! `b_ij` and `db_ij/dzeta` for every neighbor slot, the second uses the cache
//! to write the partial forces `f12 = dU_i/dr_ij` per slot. The pair
//! reduction then turns those into per-atom forces and virials.
mod functions;
mod parameters;

pub use functions::EPSILON;
pub use parameters::{TersoffCoefficients, TersoffEntry, TersoffParameters};

use std::ops::Range;

use rayon::prelude::*;

use super::{reduction, AtomicPotentialTrait, ForceBuffers};
use crate::{
    container::MinimumImage,
    utils::{displacement, dot, norm},
    Atoms, Container, NeighborList,
};

/// Below this zeta the bond order is exactly 1
pub const ZETA_MIN: f64 = 1.0e-16;

/// Bond order and its derivative with respect to zeta
#[inline]
pub fn bond_order(entry: &TersoffEntry, zeta: f64) -> (f64, f64) {
    if zeta < ZETA_MIN {
        return (1.0, 0.0);
    }
    let bzn = (entry.beta * zeta).powf(entry.n);
    let b = (1.0 + bzn).powf(entry.minus_half_over_n);
    (b, -b * bzn * 0.5 / ((1.0 + bzn) * zeta))
}

pub struct Tersoff {
    parameters: TersoffParameters,
    b: Vec<f64>,
    bp: Vec<f64>,
    f12: Vec<[f64; 3]>,
}
impl Tersoff {
    pub fn new(parameters: TersoffParameters) -> Self {
        Self {
            parameters,
            b: Vec::new(),
            bp: Vec::new(),
            f12: Vec::new(),
        }
    }

    // Getters
    pub fn parameters(&self) -> &TersoffParameters {
        &self.parameters
    }
    /// Cached `b` and `db/dzeta` for each neighbor slot of `atom` from the
    /// last evaluation
    pub fn bond_orders(&self, atom: usize, neighbors: &NeighborList) -> (&[f64], &[f64]) {
        let start = atom * neighbors.max_neighbors();
        let end = start + neighbors.count(atom);
        (&self.b[start..end], &self.bp[start..end])
    }
    /// Partial forces `dU_atom/dr` for each neighbor slot from the last
    /// evaluation
    pub fn partial_forces(&self, atom: usize, neighbors: &NeighborList) -> &[[f64; 3]] {
        let start = atom * neighbors.max_neighbors();
        &self.f12[start..start + neighbors.count(atom)]
    }

    /// Evaluate the atoms in `range`
    ///
    /// Potential energy, forces and virials are added into `buffers`. The
    /// partial forces of atoms outside `range` are zero afterwards.
    pub fn compute_range(
        &mut self,
        range: Range<usize>,
        types: &[usize],
        positions: &[[f64; 3]],
        container: &impl MinimumImage,
        neighbors: &NeighborList,
        buffers: &mut ForceBuffers,
    ) {
        let num_atoms = positions.len();
        assert_eq!(types.len(), num_atoms, "One type per atom is needed");
        assert_eq!(
            neighbors.num_atoms(),
            num_atoms,
            "Neighbor list was built for a different number of atoms"
        );
        assert_eq!(buffers.num_atoms(), num_atoms, "Force buffers have the wrong size");
        assert!(range.end <= num_atoms, "Atom range {:?} out of bounds", range);

        let len = num_atoms * neighbors.max_neighbors();
        let Self {
            parameters,
            b,
            bp,
            f12,
        } = self;
        for scratch in [&mut *b, &mut *bp] {
            scratch.clear();
            scratch.resize(len, 0.0);
        }
        f12.clear();
        f12.resize(len, [0.0; 3]);

        find_bond_orders(
            parameters,
            range.clone(),
            types,
            positions,
            container,
            neighbors,
            b,
            bp,
        );
        find_partial_forces(
            parameters,
            range.clone(),
            types,
            positions,
            container,
            neighbors,
            b,
            bp,
            f12,
            &mut buffers.potential,
        );
        reduction::find_properties_many_body(range, positions, container, neighbors, f12, buffers);
    }
}
impl AtomicPotentialTrait for Tersoff {
    fn cutoff_distance(&self) -> f64 {
        self.parameters.cutoff()
    }
    fn compute(
        &mut self,
        atoms: &Atoms,
        container: &Container,
        neighbors: &NeighborList,
        buffers: &mut ForceBuffers,
    ) {
        self.compute_range(
            0..atoms.num_atoms(),
            atoms.types(),
            atoms.positions(),
            container,
            neighbors,
            buffers,
        );
    }
}

#[inline]
fn bond_vector(
    positions: &[[f64; 3]],
    container: &impl MinimumImage,
    from: usize,
    to: usize,
) -> ([f64; 3], f64) {
    let r = container.apply_mic(displacement(&positions[from], &positions[to]));
    (r, norm(&r))
}

#[allow(clippy::too_many_arguments)]
fn find_bond_orders(
    parameters: &TersoffParameters,
    range: Range<usize>,
    types: &[usize],
    positions: &[[f64; 3]],
    container: &impl MinimumImage,
    neighbors: &NeighborList,
    b: &mut [f64],
    bp: &mut [f64],
) {
    let max = neighbors.max_neighbors();
    let rows = range.start * max..range.end * max;
    b[rows.clone()]
        .par_chunks_mut(max)
        .zip(bp[rows].par_chunks_mut(max))
        .enumerate()
        .for_each(|(offset, (b_row, bp_row))| {
            let n1 = range.start + offset;
            let type1 = types[n1];
            let list = neighbors.neighbors(n1);
            for (i1, &n2) in list.iter().enumerate() {
                let type2 = types[n2];
                let (r12, d12) = bond_vector(positions, container, n1, n2);
                let mut zeta = 0.0;
                for &n3 in list {
                    if n3 == n2 {
                        continue;
                    }
                    let type3 = types[n3];
                    let (r13, d13) = bond_vector(positions, container, n1, n3);
                    let cos123 = dot(&r12, &r13) / (d12 * d13);
                    let fc13 = parameters.entry(type1, type3, type3).fc(d13);
                    let ijk = parameters.entry(type1, type2, type3);
                    zeta += fc13 * ijk.g(cos123) * ijk.e(d12, d13);
                }
                let (b12, bp12) = bond_order(parameters.entry(type1, type2, type2), zeta);
                b_row[i1] = b12;
                bp_row[i1] = bp12;
            }
        });
}

#[allow(clippy::too_many_arguments)]
fn find_partial_forces(
    parameters: &TersoffParameters,
    range: Range<usize>,
    types: &[usize],
    positions: &[[f64; 3]],
    container: &impl MinimumImage,
    neighbors: &NeighborList,
    b: &[f64],
    bp: &[f64],
    f12: &mut [[f64; 3]],
    potential: &mut [f64],
) {
    let max = neighbors.max_neighbors();
    potential[range.clone()]
        .par_iter_mut()
        .zip(f12[range.start * max..range.end * max].par_chunks_mut(max))
        .enumerate()
        .for_each(|(offset, (pe, f12_row))| {
            let n1 = range.start + offset;
            let type1 = types[n1];
            let list = neighbors.neighbors(n1);
            let row = n1 * max;
            let mut pot = 0.0;
            for (i1, &n2) in list.iter().enumerate() {
                let type2 = types[n2];
                let (r12, d12) = bond_vector(positions, container, n1, n2);
                let d12inv = 1.0 / d12;

                let ijj = parameters.entry(type1, type2, type2);
                let (fc12, fcp12) = ijj.fc_and_fcp(d12);
                let (fa12, fap12) = ijj.fa_and_fap(d12);
                let (fr12, frp12) = ijj.fr_and_frp(d12);
                let b12 = b[row + i1];
                let bp12 = bp[row + i1];

                // two-body part
                let factor1 = -b12 * fa12 + fr12;
                let factor2 = -b12 * fap12 + frp12;
                let factor3 = (fcp12 * factor1 + fc12 * factor2) * d12inv;
                pot += fc12 * factor1 * 0.5;
                let mut f = [
                    r12[0] * factor3 * 0.5,
                    r12[1] * factor3 * 0.5,
                    r12[2] * factor3 * 0.5,
                ];

                // three-body part, through b_12 and through every b_13
                for (i2, &n3) in list.iter().enumerate() {
                    if n3 == n2 {
                        continue;
                    }
                    let type3 = types[n3];
                    let (r13, d13) = bond_vector(positions, container, n1, n3);
                    let ikk = parameters.entry(type1, type3, type3);
                    let fc13 = ikk.fc(d13);
                    let fa13 = ikk.fa(d13);
                    let bp13 = bp[row + i2];

                    let one_over_d12d13 = 1.0 / (d12 * d13);
                    let cos123 = dot(&r12, &r13) * one_over_d12d13;
                    let cos123_over_d12d12 = cos123 * d12inv * d12inv;

                    let ijk = parameters.entry(type1, type2, type3);
                    let (g123, gp123) = ijk.g_and_gp(cos123);
                    let (e123, ep123) = ijk.e_and_ep(d12, d13);
                    let ikj = parameters.entry(type1, type3, type2);
                    let (g132, gp132) = ikj.g_and_gp(cos123);
                    let (e132, ep132) = ikj.e_and_ep(d13, d12);

                    let dc = -fc12 * bp12 * fa12 * fc13 * gp123 * e123
                        - fc12 * bp13 * fa13 * fc13 * gp132 * e132;
                    let dr = (-fc12 * bp12 * fa12 * fc13 * g123 * ep123
                        + (-fcp12 * bp13 * fa13 * g132 * e132 + fc12 * bp13 * fa13 * g132 * ep132)
                            * fc13)
                        * d12inv;
                    for d in 0..3 {
                        let cos_d = r13[d] * one_over_d12d13 - r12[d] * cos123_over_d12d12;
                        f[d] += (r12[d] * dr + dc * cos_d) * 0.5;
                    }
                }
                f12_row[i1] = f;
            }
            *pe += pot;
        });
}
