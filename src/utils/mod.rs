mod axis;
/// Group of useful computations
pub mod computations;

pub use axis::Axis;
pub use computations::*;
