pub mod ensemble;
pub mod nhc;
mod verlet;

pub use ensemble::{Ensemble, EnsembleConfig, EnsembleTrait, HeatNhc, Nve, NvtNhc};
pub use nhc::NoseHooverChain;
pub use verlet::Verlet;
