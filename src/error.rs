use thiserror::Error;

/// Error types
///
/// Everything here is raised while loading or constructing a simulation.
/// Once a run has started the force and thermostat paths do not fail.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Tersoff parameter {name} of entry {entry} is {value}, but should be {requirement}")]
    InvalidParameter {
        name: &'static str,
        entry: usize,
        value: f64,
        requirement: &'static str,
    },

    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Atom {atom} has {count} neighbors, more than the capacity of {capacity}")]
    NeighborOverflow {
        atom: usize,
        count: usize,
        capacity: usize,
    },

    #[error("Invalid thermostat: {0}")]
    InvalidThermostat(String),

    #[error("Invalid group: {0}")]
    InvalidGroup(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
