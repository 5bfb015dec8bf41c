//! Error types for schemlay-solver.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("singular constraint matrix")]
    SingularMatrix,

    #[error("invalid matrix dimensions: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("iteration failed to converge after {iterations} iterations")]
    ConvergenceFailed { iterations: usize },

    #[error("floating coordinate-node at index {index}")]
    FloatingNode { index: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
