use super::Lattice;

const BASIS: [[f64; 3]; 8] = [
    [0.0, 0.0, 0.0],
    [0.0, 0.5, 0.5],
    [0.5, 0.0, 0.5],
    [0.5, 0.5, 0.0],
    [0.25, 0.25, 0.25],
    [0.25, 0.75, 0.75],
    [0.75, 0.25, 0.75],
    [0.75, 0.75, 0.25],
];

/// Diamond cubic lattice, 8 sites per conventional cell
#[derive(Debug)]
pub struct Diamond {
    a: f64,
}
impl Diamond {
    pub fn new(a: f64) -> Self {
        assert!(a > 0.0, "Lattice constant should be positive, found {}", a);
        Self { a }
    }
    pub fn lattice_constant(&self) -> f64 {
        self.a
    }
    /// Nearest-neighbor distance, sqrt(3)/4 of the lattice constant
    pub fn bond_length(&self) -> f64 {
        3.0f64.sqrt() * 0.25 * self.a
    }
}
impl Lattice for Diamond {
    fn cell_lengths(&self) -> [f64; 3] {
        [self.a, self.a, self.a]
    }
    fn basis(&self) -> &[[f64; 3]] {
        &BASIS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::distance_squared;
    use approx::assert_relative_eq;

    #[test]
    fn replicate_counts_and_box() {
        let (rect, coords) = Diamond::new(2.0).replicate([2, 1, 3]);
        assert_eq!(coords.len(), 48);
        assert_eq!(rect.hi(), [4.0, 2.0, 6.0]);
        assert!(coords.iter().all(|c| (0..3).all(|d| c[d] < rect.hi()[d])));
    }

    #[test]
    fn closest_pair_is_the_bond() {
        let lattice = Diamond::new(5.432);
        let (_, coords) = lattice.replicate([1, 1, 1]);
        let min = coords[1..]
            .iter()
            .map(|c| distance_squared(&coords[4], c))
            .filter(|&d2| d2 > 0.0)
            .fold(f64::INFINITY, f64::min);
        assert_relative_eq!(min.sqrt(), lattice.bond_length(), max_relative = 1e-12);
    }
}
