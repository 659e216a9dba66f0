use thiserror::Error;

/// Construction-time failures. Once a lattice and engine exist, stepping
/// cannot fail.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("invalid lattice size {0}: side length must be >= 1")]
    InvalidLatticeSize(usize),

    #[error("invalid temperature {0}: must be finite and > 0")]
    InvalidTemperature(f64),

    #[error("expected {expected} spins, found {found}")]
    SpinCountMismatch { expected: usize, found: usize },

    #[error("spin at index {index} is {value}, expected +1 or -1")]
    InvalidSpin { index: usize, value: i8 },

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, SimError>;
