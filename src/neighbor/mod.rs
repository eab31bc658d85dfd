mod grid;
pub mod neighbor_list;
pub mod neighbor_update_settings;

pub use neighbor_list::NeighborList;
pub use neighbor_update_settings::NeighborUpdate;
