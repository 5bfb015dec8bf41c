//! The assembled solvable network for the registration phase.

use indexmap::IndexMap;
use nalgebra::DVector;
use schemlay_core::{is_ground_alias, DiagnosticSink, LayoutSystem, NodeContext};
use schemlay_solver::Restamp;

use crate::constraint::{MinimumConstraint, OffsetConstraint, Stamp, WeakGroundTie};

/// The ordered node names of one wire, kept for geometry reconstruction.
#[derive(Debug, Clone)]
pub struct WirePath {
    pub name: String,
    /// `(x, y)` coordinate-node names per vertex.
    pub nodes: Vec<(String, String)>,
}

/// Collects the branches every presence registers, assigns matrix indices
/// to group representatives, and accumulates wire geometry.
///
/// One matrix unknown per non-ground representative, in first-touch order;
/// anything grouped with ground maps to `None` and stays out of the matrix.
pub struct CircuitSolverContext {
    nodes: NodeContext,
    /// Representative → matrix index.
    unknowns: IndexMap<String, usize>,
    branches: Vec<Box<dyn Stamp>>,
    one_sided: usize,
    wire_paths: Vec<WirePath>,
    ground_referenced: bool,
}

impl CircuitSolverContext {
    /// Take over the node context produced by relationship discovery.
    pub fn new(nodes: NodeContext) -> Self {
        Self {
            nodes,
            unknowns: IndexMap::new(),
            branches: Vec::new(),
            one_sided: 0,
            wire_paths: Vec::new(),
            ground_referenced: false,
        }
    }

    /// The discovery results backing this context.
    pub fn nodes(&self) -> &NodeContext {
        &self.nodes
    }

    /// The matrix index of a coordinate-node (`None` = ground), assigning
    /// the next free index to a representative seen for the first time.
    pub fn index_of(&mut self, name: &str) -> Option<usize> {
        if is_ground_alias(name) || self.nodes.shorts.is_ground(name) {
            self.ground_referenced = true;
            return None;
        }
        let representative = self.nodes.shorts.representative(name).to_string();
        let next = self.unknowns.len();
        Some(*self.unknowns.entry(representative).or_insert(next))
    }

    /// Ensure a coordinate-node is part of the system even if no branch
    /// references it yet. An owned node nobody constrains must still end up
    /// in the matrix, where the floating-node check can find it.
    pub fn touch(&mut self, name: &str) {
        let _ = self.index_of(name);
    }

    /// Register an exact-offset branch `v(pos) - v(neg) = offset`.
    pub fn add_offset(
        &mut self,
        pos: &str,
        neg: &str,
        offset: f64,
        diagnostics: &mut dyn DiagnosticSink,
    ) {
        let p = self.index_of(pos);
        let n = self.index_of(neg);
        if p == n {
            // Already coincident; a nonzero offset between grouped nodes is
            // a contradiction in the model, not in the solver.
            if offset != 0.0 {
                diagnostics.warning(&format!(
                    "cannot keep {} and {} exactly {} apart: they are fixed to the same location",
                    pos, neg, offset
                ));
            }
            return;
        }
        self.branches.push(Box::new(OffsetConstraint {
            pos: p,
            neg: n,
            offset,
        }));
    }

    /// Register a one-sided branch `v(pos) - v(neg) >= minimum`.
    pub fn add_minimum(
        &mut self,
        pos: &str,
        neg: &str,
        minimum: f64,
        diagnostics: &mut dyn DiagnosticSink,
    ) {
        let p = self.index_of(pos);
        let n = self.index_of(neg);
        if p == n {
            if minimum > 0.0 {
                diagnostics.warning(&format!(
                    "cannot keep {} and {} at least {} apart: they are fixed to the same location",
                    pos, neg, minimum
                ));
            }
            return;
        }
        self.branches.push(Box::new(MinimumConstraint {
            pos: p,
            neg: n,
            minimum,
        }));
        self.one_sided += 1;
    }

    /// Register the repair branch for a floating unknown.
    pub fn add_ground_tie(&mut self, node: usize) {
        self.branches.push(Box::new(WeakGroundTie { node }));
    }

    /// Record a wire's vertex node names for geometry reconstruction.
    pub fn add_wire_path(&mut self, path: WirePath) {
        self.wire_paths.push(path);
    }

    pub fn unknown_count(&self) -> usize {
        self.unknowns.len()
    }

    pub fn branch_count(&self) -> usize {
        self.branches.len()
    }

    /// Whether any registered branch is one-sided (needs the outer
    /// piecewise-linear iteration).
    pub fn has_one_sided(&self) -> bool {
        self.one_sided > 0
    }

    /// Whether anything registered so far references the ground group.
    pub fn ground_referenced(&self) -> bool {
        self.ground_referenced
    }

    /// Representatives in matrix-index order.
    pub fn unknown_names(&self) -> impl Iterator<Item = &str> {
        self.unknowns.keys().map(|name| name.as_str())
    }

    /// Decompose into the node context, the wire geometry and the
    /// representative index map, once solving is done.
    pub fn into_parts(self) -> (NodeContext, Vec<WirePath>, IndexMap<String, usize>) {
        (self.nodes, self.wire_paths, self.unknowns)
    }
}

impl Restamp for CircuitSolverContext {
    fn stamp_at(&self, system: &mut LayoutSystem, solution: &DVector<f64>) {
        for branch in &self.branches {
            branch.stamp(system, solution);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemlay_core::CollectingSink;

    #[test]
    fn test_indices_follow_first_touch_order() {
        let mut ctx = CircuitSolverContext::new(NodeContext::new());
        assert_eq!(ctx.index_of("b.x"), Some(0));
        assert_eq!(ctx.index_of("a.x"), Some(1));
        assert_eq!(ctx.index_of("b.x"), Some(0));
        assert_eq!(ctx.unknown_count(), 2);
    }

    #[test]
    fn test_grouped_nodes_share_an_index() {
        let mut nodes = NodeContext::new();
        nodes.shorts.group("a.x", "b.x");

        let mut ctx = CircuitSolverContext::new(nodes);
        assert_eq!(ctx.index_of("a.x"), ctx.index_of("b.x"));
        assert_eq!(ctx.unknown_count(), 1);
    }

    #[test]
    fn test_ground_maps_to_none() {
        let mut nodes = NodeContext::new();
        nodes.shorts.group("a.x", "gnd");

        let mut ctx = CircuitSolverContext::new(nodes);
        assert_eq!(ctx.index_of("a.x"), None);
        assert_eq!(ctx.index_of("0"), None);
        assert!(ctx.ground_referenced());
        assert_eq!(ctx.unknown_count(), 0);
    }

    #[test]
    fn test_offset_between_grouped_nodes_is_a_diagnostic() {
        let mut nodes = NodeContext::new();
        nodes.shorts.group("a.x", "b.x");

        let mut ctx = CircuitSolverContext::new(nodes);
        let mut sink = CollectingSink::new();
        ctx.add_offset("a.x", "b.x", 5.0, &mut sink);

        assert_eq!(ctx.branch_count(), 0);
        assert_eq!(sink.diagnostics.len(), 1);
    }

    #[test]
    fn test_zero_offset_between_grouped_nodes_is_silent() {
        let mut nodes = NodeContext::new();
        nodes.shorts.group("a.x", "b.x");

        let mut ctx = CircuitSolverContext::new(nodes);
        let mut sink = CollectingSink::new();
        ctx.add_offset("a.x", "b.x", 0.0, &mut sink);

        assert_eq!(ctx.branch_count(), 0);
        assert!(sink.diagnostics.is_empty());
    }

    #[test]
    fn test_one_sided_branches_are_counted() {
        let mut ctx = CircuitSolverContext::new(NodeContext::new());
        let mut sink = CollectingSink::new();
        assert!(!ctx.has_one_sided());
        ctx.add_minimum("a.x", "b.x", 10.0, &mut sink);
        assert!(ctx.has_one_sided());
    }
}
