use log::{debug, warn};
use rayon::prelude::*;

use super::{grid::Grid, NeighborUpdate};
use crate::{
    container::MinimumImage,
    error::{Error, Result},
    utils::{self, Axis},
    Container,
};

/// Fixed-capacity neighbor lists for all atoms
///
/// Neighbor `slot` of `atom` is stored at `atom * max_neighbors + slot`.
/// Rows are sorted by atom index.
#[derive(Debug)]
pub struct NeighborList {
    cutoff: f64,
    skin: f64,
    max_neighbors: usize,
    update: NeighborUpdate,
    counts: Vec<usize>,
    indices: Vec<usize>,
    built: bool,
    num_builds: usize,
}
impl NeighborList {
    pub fn new(cutoff: f64, skin: f64, max_neighbors: usize, update: NeighborUpdate) -> Self {
        assert!(cutoff >= 0.0, "Force cutoff distance must not be negative");
        assert!(skin >= 0.0, "Neighbor skin must not be negative");
        assert!(max_neighbors > 0, "Neighbor capacity must be positive");
        if let NeighborUpdate::Every(k) = update {
            assert!(k > 0, "Neighbor update interval must be positive");
        }
        Self {
            cutoff,
            skin,
            max_neighbors,
            update,
            counts: Vec::new(),
            indices: Vec::new(),
            built: false,
            num_builds: 0,
        }
    }

    // Getters
    pub fn cutoff_distance(&self) -> f64 {
        self.cutoff
    }
    pub fn skin_distance(&self) -> f64 {
        self.skin
    }
    /// Pairs closer than this are listed
    pub fn list_distance(&self) -> f64 {
        self.cutoff + self.skin
    }
    pub fn max_neighbors(&self) -> usize {
        self.max_neighbors
    }
    pub fn update_policy(&self) -> NeighborUpdate {
        self.update
    }
    pub fn num_atoms(&self) -> usize {
        self.counts.len()
    }
    pub fn is_built(&self) -> bool {
        self.built
    }
    pub fn num_builds(&self) -> usize {
        self.num_builds
    }
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }
    pub fn count(&self, atom: usize) -> usize {
        self.counts[atom]
    }
    pub fn neighbors(&self, atom: usize) -> &[usize] {
        let start = atom * self.max_neighbors;
        &self.indices[start..start + self.counts[atom]]
    }
    /// Slot in which `neighbor` appears in the list of `atom`
    pub fn slot_of(&self, atom: usize, neighbor: usize) -> Option<usize> {
        self.neighbors(atom).iter().position(|&n| n == neighbor)
    }

    // Setters
    pub fn set_update_policy(&mut self, update: NeighborUpdate) {
        self.update = update;
    }

    /// Rebuild if the update policy asks for it at this step
    pub fn update(
        &mut self,
        step: usize,
        positions: &[[f64; 3]],
        container: &Container,
    ) -> Result<bool> {
        let needed = self.update.should_update_neighbors(step, self.built)
            || self.num_atoms() != positions.len();
        if needed {
            self.build(positions, container)?;
        }
        Ok(needed)
    }

    pub fn build(&mut self, positions: &[[f64; 3]], container: &Container) -> Result<()> {
        let rc = self.list_distance();
        let rows = match Grid::new(container, rc) {
            Some(grid) => Self::find_binned(&grid, rc, positions, container),
            None => {
                Self::check_box_size(rc, container)?;
                warn!(
                    "Box too small for binning with list distance {}, using O(N^2) neighbor search",
                    rc
                );
                Self::find_brute_force(rc, positions, container)
            }
        };

        let num_atoms = positions.len();
        self.counts = vec![0; num_atoms];
        self.indices = vec![0; num_atoms * self.max_neighbors];
        for (atom, row) in rows.into_iter().enumerate() {
            if row.len() > self.max_neighbors {
                return Err(Error::NeighborOverflow {
                    atom,
                    count: row.len(),
                    capacity: self.max_neighbors,
                });
            }
            self.counts[atom] = row.len();
            let start = atom * self.max_neighbors;
            self.indices[start..start + row.len()].copy_from_slice(&row);
        }
        self.built = true;
        self.num_builds += 1;
        debug!(
            "Built neighbor list for {} atoms, max count {}",
            num_atoms,
            self.counts.iter().max().copied().unwrap_or(0)
        );
        Ok(())
    }

    fn check_box_size(rc: f64, container: &Container) -> Result<()> {
        for axis in Axis::ALL {
            let length = container.rect().length(axis);
            if container.is_periodic(axis) && rc >= 0.5 * length {
                return Err(Error::InvalidConfig(format!(
                    "neighbor list distance {} is not less than half the periodic box length {} along {:?}",
                    rc, length, axis
                )));
            }
        }
        Ok(())
    }

    fn within(
        rc2: f64,
        i: usize,
        j: usize,
        positions: &[[f64; 3]],
        container: &Container,
    ) -> bool {
        let d = container.apply_mic(utils::displacement(&positions[i], &positions[j]));
        utils::dot(&d, &d) < rc2
    }

    fn find_brute_force(
        rc: f64,
        positions: &[[f64; 3]],
        container: &Container,
    ) -> Vec<Vec<usize>> {
        let rc2 = rc * rc;
        (0..positions.len())
            .into_par_iter()
            .map(|i| {
                (0..positions.len())
                    .filter(|&j| j != i && Self::within(rc2, i, j, positions, container))
                    .collect()
            })
            .collect()
    }

    fn find_binned(
        grid: &Grid,
        rc: f64,
        positions: &[[f64; 3]],
        container: &Container,
    ) -> Vec<Vec<usize>> {
        let rc2 = rc * rc;
        let bins = grid.fill(positions);
        (0..positions.len())
            .into_par_iter()
            .map(|i| {
                let mut row: Vec<usize> = grid
                    .stencil(grid.bin_3d(&positions[i]))
                    .into_iter()
                    .flat_map(|b| bins[b].iter().copied())
                    .filter(|&j| j != i && Self::within(rc2, i, j, positions, container))
                    .collect();
                row.sort_unstable();
                row
            })
            .collect()
    }
}
