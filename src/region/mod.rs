pub mod rect;
pub use rect::Rect;

/// A region of space, used to select atoms
pub trait Region {
    fn contains(&self, coord: &[f64; 3]) -> bool;
}
