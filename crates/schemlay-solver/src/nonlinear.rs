//! Outer piecewise-linear iteration for one-sided constraints.
//!
//! Minimum-offset branches behave like ideal diodes: the branch a presence
//! stamps depends on whether the current solution violates the minimum. The
//! outer loop re-stamps the system at each operating point and solves again
//! until successive solutions agree, exactly the shape of a Newton-Raphson
//! loop over linearized device stamps.

use nalgebra::DVector;
use schemlay_core::LayoutSystem;

use crate::error::{Error, Result};
use crate::floating::check_well_formed;
use crate::linear::solve_dense;

/// Convergence criteria for the outer iteration.
#[derive(Debug, Clone)]
pub struct ConvergenceCriteria {
    /// Absolute coordinate tolerance.
    pub abstol: f64,
    /// Relative coordinate tolerance.
    pub reltol: f64,
    /// Maximum iterations before the solve is abandoned.
    pub max_iterations: usize,
}

impl Default for ConvergenceCriteria {
    fn default() -> Self {
        Self {
            abstol: 1e-9,
            reltol: 1e-6,
            max_iterations: 50,
        }
    }
}

/// Callback that stamps the network linearized at the given solution.
///
/// Implementations must clear the system and stamp every branch: linear
/// branches ignore the solution, one-sided branches pick their conducting
/// state from it.
pub trait Restamp {
    fn stamp_at(&self, system: &mut LayoutSystem, solution: &DVector<f64>);
}

/// A converged iterative solve.
#[derive(Debug, Clone)]
pub struct IterationResult {
    /// Solution vector.
    pub solution: DVector<f64>,
    /// Number of linear solves performed.
    pub iterations: usize,
}

/// Solve a network containing one-sided branches.
///
/// The first stamp is evaluated at the all-zero solution; the
/// well-formedness check runs on that stamp, so a floating node surfaces as
/// [`Error::FloatingNode`] before any factorization. Running out of
/// iterations is a hard failure: an oscillating constraint network is a
/// defect, not a best-effort layout.
pub fn solve_iterative(
    size: usize,
    stamper: &dyn Restamp,
    criteria: &ConvergenceCriteria,
) -> Result<IterationResult> {
    let mut system = LayoutSystem::new(size);
    let mut solution = DVector::zeros(size);

    stamper.stamp_at(&mut system, &solution);
    check_well_formed(&system)?;

    for iteration in 0..criteria.max_iterations {
        let new_solution = solve_dense(system.matrix(), system.rhs())?;
        let converged = check_convergence(&solution, &new_solution, criteria);
        solution = new_solution;

        if converged {
            return Ok(IterationResult {
                solution,
                iterations: iteration + 1,
            });
        }

        system.clear();
        stamper.stamp_at(&mut system, &solution);
    }

    Err(Error::ConvergenceFailed {
        iterations: criteria.max_iterations,
    })
}

fn check_convergence(
    old: &DVector<f64>,
    new: &DVector<f64>,
    criteria: &ConvergenceCriteria,
) -> bool {
    old.iter().zip(new.iter()).all(|(&a, &b)| {
        let tol = criteria.reltol * a.abs().max(b.abs()) + criteria.abstol;
        (a - b).abs() <= tol
    })
}
