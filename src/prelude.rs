pub use super::atom_type::Species;
pub use super::atomic::{
    AtomicPotential, AtomicPotentialTrait, ForceBuffers, None_, Tersoff, TersoffCoefficients,
    TersoffParameters,
};
pub use super::atoms::Atoms;
pub use super::container::{Container, MinimumImage, BC};
pub use super::group::{GroupScheme, Grouping};
pub use super::integrators::{Ensemble, EnsembleConfig, EnsembleTrait};
pub use super::lattice::{Diamond, Lattice};
pub use super::neighbor::{NeighborList, NeighborUpdate};
pub use super::region::{Rect, Region};
pub use super::simulation::{Simulation, SimulationConfig};
pub use super::utils::Axis;
