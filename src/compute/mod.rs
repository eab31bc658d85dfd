//! Scalar thermodynamic quantities computed from atoms and force buffers
mod group;
mod kinetic_energy;
mod potential_energy;
mod pressure;
mod temperature;
mod total_energy;

pub use group::{group_com_and_ek2, group_temperatures};
pub use kinetic_energy::{kinetic_energy, twice_kinetic_energy};
pub use potential_energy::potential_energy;
pub use pressure::pressure;
pub use temperature::temperature;
pub use total_energy::total_energy;
