//! Error types for schemlay-layout.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// An unclassified solver failure. Propagated unmodified; floating-node
    /// reports never reach callers because the repair loop consumes them.
    #[error(transparent)]
    Solver(#[from] schemlay_solver::Error),

    /// Floating-node repair re-encountered a node it already patched.
    #[error("floating-node repair stalled at {node}")]
    RepairStalled { node: String },
}

pub type Result<T> = std::result::Result<T, Error>;
