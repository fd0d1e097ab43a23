use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdevolveError {
    #[error("Invalid population size: {0}")]
    InvalidPopulationSize(String),

    #[error("Genome length mismatch: expected {expected}, got {actual}")]
    GenomeLengthMismatch { expected: usize, actual: usize },

    #[error("Configuration error: {0}")]
    InvalidConfiguration(String),
}

pub type Result<T> = std::result::Result<T, PdevolveError>;
