use super::Region;
use crate::utils::Axis;

/// Axis-aligned rectangular box
#[derive(Clone, Debug, PartialEq)]
pub struct Rect {
    lo: [f64; 3],
    hi: [f64; 3],
}
impl Rect {
    pub fn new(xlo: f64, xhi: f64, ylo: f64, yhi: f64, zlo: f64, zhi: f64) -> Self {
        Self::from_corners([xlo, ylo, zlo], [xhi, yhi, zhi])
    }
    pub fn from_corners(lo: [f64; 3], hi: [f64; 3]) -> Self {
        for axis in Axis::ALL {
            let i = axis.index();
            assert!(
                lo[i] < hi[i],
                "Lower bound {} should be less than upper bound {} along {:?}",
                lo[i],
                hi[i],
                axis,
            );
        }
        Self { lo, hi }
    }
    pub fn lo(&self) -> [f64; 3] {
        self.lo
    }
    pub fn hi(&self) -> [f64; 3] {
        self.hi
    }
    pub fn get_bounds(&self, axis: Axis) -> [f64; 2] {
        [self.lo[axis.index()], self.hi[axis.index()]]
    }
    pub fn length(&self, axis: Axis) -> f64 {
        self.hi[axis.index()] - self.lo[axis.index()]
    }
    pub fn lengths(&self) -> [f64; 3] {
        [
            self.length(Axis::X),
            self.length(Axis::Y),
            self.length(Axis::Z),
        ]
    }
    pub fn volume(&self) -> f64 {
        let [lx, ly, lz] = self.lengths();
        lx * ly * lz
    }
}
impl Region for Rect {
    /// Half-open on the upper side, so that stacked slabs do not overlap
    fn contains(&self, coord: &[f64; 3]) -> bool {
        (0..3).all(|i| self.lo[i] <= coord[i] && coord[i] < self.hi[i])
    }
}
