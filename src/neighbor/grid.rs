use crate::{utils::Axis, Container};

/// Neighbor list grid of bins, each at least one cutoff wide
#[derive(Debug)]
pub(super) struct Grid {
    lo: [f64; 3],
    lengths: [f64; 3],
    num_bins: [usize; 3],
    periodic: [bool; 3],
}
impl Grid {
    /// `None` when some periodic axis is too short for three bins; the
    /// 27-bin stencil would then visit a bin twice.
    pub fn new(container: &Container, cutoff: f64) -> Option<Self> {
        assert!(
            cutoff > 0.0,
            "Cutoff should be positive, found {}",
            cutoff
        );
        let rect = container.rect();
        let lengths = rect.lengths();
        let mut num_bins = [1; 3];
        let mut periodic = [false; 3];
        for axis in Axis::ALL {
            let i = axis.index();
            periodic[i] = container.is_periodic(axis);
            num_bins[i] = ((lengths[i] / cutoff).floor() as usize).max(1);
            if periodic[i] && num_bins[i] < 3 {
                return None;
            }
        }
        Some(Self {
            lo: rect.lo(),
            lengths,
            num_bins,
            periodic,
        })
    }
    pub fn total_num_bins(&self) -> usize {
        self.num_bins[0] * self.num_bins[1] * self.num_bins[2]
    }
    pub fn bin_3d(&self, coord: &[f64; 3]) -> [usize; 3] {
        let mut inds = [0; 3];
        for i in 0..3 {
            let n = self.num_bins[i];
            let s = ((coord[i] - self.lo[i]) / self.lengths[i] * n as f64).floor();
            inds[i] = s.clamp(0.0, (n - 1) as f64) as usize;
        }
        inds
    }
    pub fn bin_idx_from_3d_idx(&self, inds: &[usize; 3]) -> usize {
        (inds[0] * self.num_bins[1] + inds[1]) * self.num_bins[2] + inds[2]
    }
    /// Sort atom indices into bins
    pub fn fill(&self, positions: &[[f64; 3]]) -> Vec<Vec<usize>> {
        let mut bins = vec![Vec::new(); self.total_num_bins()];
        for (atom, p) in positions.iter().enumerate() {
            bins[self.bin_idx_from_3d_idx(&self.bin_3d(p))].push(atom);
        }
        bins
    }
    /// The bin of `center` and its up to 26 surrounding bins
    pub fn stencil(&self, center: [usize; 3]) -> Vec<usize> {
        let mut out = Vec::with_capacity(27);
        for dx in -1i64..=1 {
            for dy in -1i64..=1 {
                for dz in -1i64..=1 {
                    let offset = [dx, dy, dz];
                    let mut inds = [0usize; 3];
                    let mut inside = true;
                    for i in 0..3 {
                        let n = self.num_bins[i] as i64;
                        let mut b = center[i] as i64 + offset[i];
                        if self.periodic[i] {
                            b = b.rem_euclid(n);
                        } else if b < 0 || b >= n {
                            inside = false;
                        }
                        inds[i] = b as usize;
                    }
                    if inside {
                        out.push(self.bin_idx_from_3d_idx(&inds));
                    }
                }
            }
        }
        out
    }
}
