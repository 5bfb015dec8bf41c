//! The capability set every layout participant implements.

use schemlay_core::{DiagnosticSink, NodeContext};

use crate::solution::Solution;
use crate::solver_context::CircuitSolverContext;

/// Anything that owns coordinate-nodes and contributes constraints.
///
/// The solve pipeline drives each presence through the same lifecycle:
/// `reset` before every attempt, `discover` once per discovery sub-phase,
/// `register` once, and `update` after a successful solve. Discovery and
/// registration must not depend on the order presences are visited in —
/// visitation order may change representative identity, never the final
/// equivalence classes or solved coordinates.
pub trait Presence {
    fn name(&self) -> &str;

    /// Drop any state left over from a previous solve.
    fn reset(&mut self);

    /// Declare relationships for the sub-phase given by `context.mode`.
    fn discover(&self, context: &mut NodeContext);

    /// Emit constraint branches into the solver context. Modeling problems
    /// go to `diagnostics`; registration itself never fails.
    fn register(&self, context: &mut CircuitSolverContext, diagnostics: &mut dyn DiagnosticSink);

    /// Consume solved values to populate locations.
    fn update(&mut self, solution: &Solution);
}
