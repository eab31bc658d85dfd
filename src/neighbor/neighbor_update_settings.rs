/// When the owning simulation rebuilds the neighbor list
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NeighborUpdate {
    EveryStep,
    /// Rebuild on steps that are a multiple of k
    Every(usize),
    /// Build before the first step and keep it for the whole run
    Once,
}

impl NeighborUpdate {
    pub fn should_update_neighbors(&self, step: usize, built: bool) -> bool {
        if !built {
            return true;
        }
        match *self {
            NeighborUpdate::EveryStep => true,
            NeighborUpdate::Every(k) => step % k == 0,
            NeighborUpdate::Once => false,
        }
    }
}
