//! Dense linear solve for the constraint network.

use nalgebra::{DMatrix, DVector};
use schemlay_core::LayoutSystem;

use crate::error::{Error, Result};
use crate::floating::check_well_formed;

/// Solve Ax = b by LU decomposition.
pub fn solve_dense(a: &DMatrix<f64>, b: &DVector<f64>) -> Result<DVector<f64>> {
    if a.nrows() != a.ncols() {
        return Err(Error::DimensionMismatch {
            expected: a.nrows(),
            actual: a.ncols(),
        });
    }
    if a.nrows() != b.len() {
        return Err(Error::DimensionMismatch {
            expected: a.nrows(),
            actual: b.len(),
        });
    }

    a.clone().lu().solve(b).ok_or(Error::SingularMatrix)
}

/// Solve a fully-stamped linear layout system in one direct pass.
///
/// The well-formedness check runs first, so a floating coordinate-node is
/// reported as [`Error::FloatingNode`] rather than surfacing as whatever a
/// factorization makes of a structurally empty row.
pub fn solve_direct(system: &LayoutSystem) -> Result<DVector<f64>> {
    check_well_formed(system)?;
    solve_dense(system.matrix(), system.rhs())
}
