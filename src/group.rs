use crate::{
    error::{Error, Result},
    region::Region,
    utils::Axis,
};

/// Read access to one way of partitioning the atoms into groups
pub trait GroupScheme {
    fn num_groups(&self) -> usize;
    /// Group label of an atom
    fn group_of(&self, atom: usize) -> usize;
    /// Atom indices belonging to a group, in ascending order
    fn members(&self, group: usize) -> &[usize];
    fn group_size(&self, group: usize) -> usize {
        self.members(group).len()
    }
}

/// Every atom carries exactly one group label
#[derive(Clone, Debug)]
pub struct Grouping {
    labels: Vec<usize>,
    members: Vec<Vec<usize>>,
}
impl Grouping {
    pub fn from_labels(labels: Vec<usize>) -> Self {
        let num_groups = labels.iter().max().map_or(0, |m| m + 1);
        let mut members = vec![Vec::new(); num_groups];
        for (atom, &label) in labels.iter().enumerate() {
            members[label].push(atom);
        }
        Self { labels, members }
    }

    /// Label atoms by the first region containing them. Atoms inside no
    /// region are an error.
    pub fn from_regions<R: Region>(positions: &[[f64; 3]], regions: &[R]) -> Result<Self> {
        let labels = positions
            .iter()
            .enumerate()
            .map(|(atom, coord)| {
                regions
                    .iter()
                    .position(|r| r.contains(coord))
                    .ok_or_else(|| {
                        Error::InvalidGroup(format!(
                            "atom {} at {:?} lies in none of the {} regions",
                            atom,
                            coord,
                            regions.len()
                        ))
                    })
            })
            .collect::<Result<Vec<usize>>>()?;
        Ok(Self::from_labels(labels))
    }

    /// Cut `[lo, hi)` along `axis` into `num_slabs` equal slabs. Coordinates
    /// outside the interval are clamped into the first or last slab.
    pub fn from_slabs(
        positions: &[[f64; 3]],
        axis: Axis,
        lo: f64,
        hi: f64,
        num_slabs: usize,
    ) -> Self {
        assert!(num_slabs > 0, "Need at least one slab");
        assert!(lo < hi, "Slab range [{}, {}) is empty", lo, hi);
        let width = (hi - lo) / num_slabs as f64;
        let labels = positions
            .iter()
            .map(|p| {
                let s = ((p[axis.index()] - lo) / width).floor();
                s.clamp(0.0, (num_slabs - 1) as f64) as usize
            })
            .collect();
        Self::from_labels(labels)
    }

    pub fn labels(&self) -> &[usize] {
        &self.labels
    }
}
impl GroupScheme for Grouping {
    fn num_groups(&self) -> usize {
        self.members.len()
    }
    fn group_of(&self, atom: usize) -> usize {
        self.labels[atom]
    }
    fn members(&self, group: usize) -> &[usize] {
        &self.members[group]
    }
}
