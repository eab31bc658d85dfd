mod species;

pub use species::Species;
