mod diamond;

pub use diamond::Diamond;

use crate::region::Rect;

/// A crystal lattice with a rectangular conventional cell
pub trait Lattice {
    fn cell_lengths(&self) -> [f64; 3];
    /// Basis sites in fractional coordinates of the conventional cell
    fn basis(&self) -> &[[f64; 3]];

    /// Fill `cells[0] x cells[1] x cells[2]` conventional cells starting at
    /// the origin. Returns the box they span and the site coordinates.
    fn replicate(&self, cells: [usize; 3]) -> (Rect, Vec<[f64; 3]>) {
        assert!(
            cells.iter().all(|&n| n > 0),
            "Need at least one cell along each axis, found {:?}",
            cells
        );
        let a = self.cell_lengths();
        let basis = self.basis();
        let mut coords = Vec::with_capacity(cells[0] * cells[1] * cells[2] * basis.len());
        for i in 0..cells[0] {
            for j in 0..cells[1] {
                for k in 0..cells[2] {
                    let origin = [i as f64, j as f64, k as f64];
                    for site in basis {
                        coords.push([
                            (origin[0] + site[0]) * a[0],
                            (origin[1] + site[1]) * a[1],
                            (origin[2] + site[2]) * a[2],
                        ]);
                    }
                }
            }
        }
        let hi = [
            cells[0] as f64 * a[0],
            cells[1] as f64 * a[1],
            cells[2] as f64 * a[2],
        ];
        (Rect::from_corners([0.0; 3], hi), coords)
    }
}
