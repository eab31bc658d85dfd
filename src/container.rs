use crate::{region::Rect, utils::Axis};

/// Boundary conditions for simulation box.
///
/// P: Periodic (must be set for both sides)
/// F: Fixed boundary
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BC {
    PP,
    FF,
}
impl BC {
    /// Check whether the boundary condition is periodic
    pub fn is_periodic(&self) -> bool {
        matches!(self, BC::PP)
    }
}

/// What the force kernel needs to know about the simulation box
pub trait MinimumImage: Sync {
    fn volume(&self) -> f64;

    /// Shortest periodic image of the displacement `d`
    fn apply_mic(&self, d: [f64; 3]) -> [f64; 3];
}

/// Simulation box, represented by a rectangular box and boundary conditions
#[derive(Clone, Debug)]
pub struct Container {
    rect: Rect,
    bc: [BC; 3],
}
impl Container {
    // Creation

    /// Create a new container from boundary values and conditions
    pub fn new(rect: Rect, bc: [BC; 3]) -> Self {
        Self { rect, bc }
    }
    /// Create a fully periodic container from a given rectangular box
    pub fn from_rect_periodic(rect: Rect) -> Self {
        Self {
            rect,
            bc: [BC::PP, BC::PP, BC::PP],
        }
    }

    // Getters
    /// Check whether the boundary condition along a given axis (X, Y, Z) is periodic
    pub fn is_periodic(&self, axis: Axis) -> bool {
        self.bc[axis.index()].is_periodic()
    }
    /// A reference to the rectangular box
    pub fn rect(&self) -> &Rect {
        &self.rect
    }

    // Setters

    pub fn set_boundary_condition(&mut self, axis: Axis, bc: BC) {
        self.bc[axis.index()] = bc;
    }

    /// Map positions that left the box through a periodic face back inside
    pub fn wrap(&self, positions: &mut [[f64; 3]]) {
        for axis in Axis::ALL {
            if !self.is_periodic(axis) {
                continue;
            }
            let i = axis.index();
            let [lo, hi] = self.rect.get_bounds(axis);
            let length = hi - lo;
            positions.iter_mut().for_each(|p| {
                if p[i] < lo || p[i] >= hi {
                    p[i] -= ((p[i] - lo) / length).floor() * length;
                }
            });
        }
    }
}
impl MinimumImage for Container {
    fn volume(&self) -> f64 {
        self.rect.volume()
    }
    fn apply_mic(&self, mut d: [f64; 3]) -> [f64; 3] {
        for axis in Axis::ALL {
            if self.is_periodic(axis) {
                let length = self.rect.length(axis);
                let i = axis.index();
                d[i] -= (d[i] / length).round() * length;
            }
        }
        d
    }
}
