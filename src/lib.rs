//! Molecular dynamics with the Tersoff bond-order potential and Nose-Hoover
//! chain thermostats
pub mod atom_type;
pub mod atomic;
pub mod atoms;
pub mod compute;
pub mod container;
pub mod error;
pub mod group;
pub mod integrators;
pub mod lattice;
pub mod neighbor;
pub mod prelude;
pub mod region;
pub mod simulation;
pub mod units;
pub mod utils;

pub use atomic::*;
pub use atoms::Atoms;
pub use container::{Container, BC};
pub use error::{Error, Result};
pub use integrators::*;
pub use neighbor::NeighborList;
pub use simulation::{Simulation, SimulationConfig, Thermo};
