//! Solvers for the schemlay layout network.
//!
//! This crate provides:
//! - a dense LU solve for purely linear constraint networks
//! - an outer piecewise-linear iteration for networks containing one-sided
//!   (minimum-offset) branches
//! - the structural well-formedness check that reports floating
//!   coordinate-nodes before any factorization is attempted

pub mod error;
pub mod floating;
pub mod linear;
pub mod nonlinear;

pub use error::{Error, Result};
pub use floating::check_well_formed;
pub use linear::{solve_dense, solve_direct};
pub use nonlinear::{solve_iterative, ConvergenceCriteria, IterationResult, Restamp};
