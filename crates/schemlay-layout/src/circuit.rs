//! The graphical circuit: presence ownership and solve orchestration.

use indexmap::{IndexMap, IndexSet};
use nalgebra::{DVector, Vector2};
use schemlay_core::{DiagnosticSink, DiscoveryMode, LayoutSystem, NodeContext};
use schemlay_solver::{solve_direct, solve_iterative, ConvergenceCriteria, Restamp};

use crate::component::Component;
use crate::error::{Error, Result};
use crate::pin::ResolveOutcome;
use crate::presence::Presence;
use crate::solution::Solution;
use crate::solver_context::CircuitSolverContext;
use crate::wire::Wire;

/// Where a circuit is in its solve pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SolveState {
    #[default]
    Unsolved,
    RelationshipsDiscovered,
    Registered,
    SystemSolved,
    ValuesDistributed,
    Solved,
}

/// A presence owned by a circuit.
#[derive(Debug, Clone)]
pub enum Item {
    Component(Component),
    Wire(Wire),
}

impl Presence for Item {
    fn name(&self) -> &str {
        match self {
            Item::Component(c) => c.name(),
            Item::Wire(w) => w.name(),
        }
    }

    fn reset(&mut self) {
        match self {
            Item::Component(c) => c.reset(),
            Item::Wire(w) => w.reset(),
        }
    }

    fn discover(&self, context: &mut NodeContext) {
        match self {
            Item::Component(c) => c.discover(context),
            Item::Wire(w) => w.discover(context),
        }
    }

    fn register(&self, context: &mut CircuitSolverContext, diagnostics: &mut dyn DiagnosticSink) {
        match self {
            Item::Component(c) => c.register(context, diagnostics),
            Item::Wire(w) => w.register(context, diagnostics),
        }
    }

    fn update(&mut self, solution: &Solution) {
        match self {
            Item::Component(c) => c.update(solution),
            Item::Wire(w) => w.update(solution),
        }
    }
}

/// A wire's solved polyline.
#[derive(Debug, Clone)]
pub struct SolvedWire {
    pub name: String,
    pub points: Vec<Vector2<f64>>,
}

/// Axis-aligned drawing bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vector2<f64>,
    pub max: Vector2<f64>,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}

/// Owns all presences and runs the discover → register → solve →
/// distribute pipeline, memoizing the result until the next structural
/// mutation.
#[derive(Debug, Default)]
pub struct GraphicalCircuit {
    presences: IndexMap<String, Item>,
    state: SolveState,
    criteria: ConvergenceCriteria,
    solution: Option<Solution>,
    solved_wires: Vec<SolvedWire>,
    extreme_nodes: Vec<String>,
    points: Vec<Vector2<f64>>,
}

impl GraphicalCircuit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_criteria(criteria: ConvergenceCriteria) -> Self {
        Self {
            criteria,
            ..Self::default()
        }
    }

    /// Add a component. A presence with the same name is replaced.
    pub fn add_component(&mut self, component: Component) {
        self.insert(Item::Component(component));
    }

    /// Add a wire. A presence with the same name is replaced.
    pub fn add_wire(&mut self, wire: Wire) {
        self.insert(Item::Wire(wire));
    }

    fn insert(&mut self, item: Item) {
        self.presences.insert(item.name().to_string(), item);
        self.invalidate();
    }

    /// Remove a presence by name. Returns whether anything was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        // Shift-remove keeps the visitation order of the survivors.
        let removed = self.presences.shift_remove(name).is_some();
        if removed {
            self.invalidate();
        }
        removed
    }

    fn invalidate(&mut self) {
        self.state = SolveState::Unsolved;
        self.solution = None;
        self.solved_wires.clear();
        self.extreme_nodes.clear();
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.presences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presences.is_empty()
    }

    pub fn component(&self, name: &str) -> Option<&Component> {
        match self.presences.get(name) {
            Some(Item::Component(c)) => Some(c),
            _ => None,
        }
    }

    pub fn wire(&self, name: &str) -> Option<&Wire> {
        match self.presences.get(name) {
            Some(Item::Wire(w)) => Some(w),
            _ => None,
        }
    }

    pub fn state(&self) -> SolveState {
        self.state
    }

    /// Whether solved values are current. True only between a successful
    /// solve and the next structural mutation.
    pub fn solved(&self) -> bool {
        self.state == SolveState::Solved
    }

    /// The solved values, if current.
    pub fn solution(&self) -> Option<&Solution> {
        self.solution.as_ref()
    }

    /// Solved wire polylines, if current.
    pub fn wire_geometry(&self) -> &[SolvedWire] {
        &self.solved_wires
    }

    /// Representatives never dominated during discovery; candidates for the
    /// drawing region boundary.
    pub fn extreme_nodes(&self) -> &[String] {
        &self.extreme_nodes
    }

    /// Bounds over every solved point, if current and nonempty.
    pub fn bounds(&self) -> Option<Bounds> {
        let first = self.points.first()?;
        let mut bounds = Bounds {
            min: *first,
            max: *first,
        };
        for p in &self.points[1..] {
            bounds.min.x = bounds.min.x.min(p.x);
            bounds.min.y = bounds.min.y.min(p.y);
            bounds.max.x = bounds.max.x.max(p.x);
            bounds.max.y = bounds.max.y.max(p.y);
        }
        Some(bounds)
    }

    /// Lay out every presence.
    ///
    /// Repeated calls without structural mutation are no-ops. Modeling
    /// problems go to `diagnostics` and do not abort; floating nodes are
    /// repaired silently; any other solver failure is returned.
    pub fn solve(&mut self, diagnostics: &mut dyn DiagnosticSink) -> Result<()> {
        if self.solved() {
            return Ok(());
        }
        self.invalidate();

        for item in self.presences.values_mut() {
            item.reset();
        }
        self.resolve_orientations(diagnostics);

        // Phase 1: relationship discovery, one pass per sub-phase.
        let mut nodes = NodeContext::new();
        for mode in [DiscoveryMode::Shorts, DiscoveryMode::Links, DiscoveryMode::Groups] {
            nodes.mode = mode;
            for item in self.presences.values() {
                item.discover(&mut nodes);
            }
        }
        nodes.mode = DiscoveryMode::None;
        self.state = SolveState::RelationshipsDiscovered;

        // Phase 2: registration.
        let mut context = CircuitSolverContext::new(nodes);
        for item in self.presences.values() {
            item.register(&mut context, diagnostics);
        }
        self.state = SolveState::Registered;

        if context.unknown_count() == 0 {
            diagnostics.info("empty layout model; nothing to solve");
        } else if context.branch_count() == 0 {
            diagnostics.info("no constraints between any coordinates");
        }

        // Nothing anchors the layout: translation invariance would make the
        // system singular, so pin the first representative to the origin.
        if context.unknown_count() > 0 && !context.ground_referenced() {
            let first = context
                .unknown_names()
                .next()
                .map(|name| name.to_string())
                .unwrap_or_default();
            diagnostics.info(&format!(
                "no location is anchored; placing {} at the origin",
                first
            ));
            context.add_offset(&first, "0", 0.0, diagnostics);
        }

        // Phase 3: solve, repairing floating nodes as they surface.
        let solved = if context.unknown_count() == 0 {
            DVector::zeros(0)
        } else {
            self.solve_with_repair(&mut context)?
        };
        self.state = SolveState::SystemSolved;

        // Phase 4: distribute.
        let (nodes, wire_paths, unknowns) = context.into_parts();
        self.extreme_nodes = nodes.extremes.extremes().map(String::from).collect();
        let pair_names: Vec<(String, String)> = nodes
            .pairs()
            .map(|(x, y)| (x.to_string(), y.to_string()))
            .collect();

        let solution = Solution::new(nodes.shorts, unknowns, &solved);
        for item in self.presences.values_mut() {
            item.update(&solution);
        }
        self.state = SolveState::ValuesDistributed;

        self.solved_wires = wire_paths
            .into_iter()
            .map(|path| SolvedWire {
                name: path.name,
                points: path
                    .nodes
                    .iter()
                    .filter_map(|(x, y)| solution.point(x, y))
                    .collect(),
            })
            .collect();
        self.points = pair_names
            .iter()
            .filter_map(|(x, y)| solution.point(x, y))
            .collect();
        self.solution = Some(solution);
        self.state = SolveState::Solved;
        Ok(())
    }

    /// Pre-pass: wires tell their endpoint pins which way they leave.
    fn resolve_orientations(&mut self, diagnostics: &mut dyn DiagnosticSink) {
        let mut requests = Vec::new();
        for item in self.presences.values() {
            if let Item::Wire(wire) = item {
                for (owner, pin, direction) in wire.direction_requests() {
                    requests.push((wire.name().to_string(), owner, pin, direction));
                }
            }
        }

        for (wire, owner, pin, direction) in requests {
            match self.presences.get_mut(&owner) {
                Some(Item::Component(component)) => {
                    match component.resolve_pin_direction(&pin, direction) {
                        Some(ResolveOutcome::Resolved) | Some(ResolveOutcome::Matched) => {}
                        Some(ResolveOutcome::Conflict { kept }) => {
                            diagnostics.warning(&format!(
                                "wire {} gives pin {}[{}] direction ({}, {}), keeping ({}, {})",
                                wire, owner, pin, direction.x, direction.y, kept.x, kept.y
                            ));
                        }
                        None => {
                            diagnostics.warning(&format!(
                                "wire {} references undefined pin {}[{}]",
                                wire, owner, pin
                            ));
                        }
                    }
                }
                _ => {
                    diagnostics.warning(&format!(
                        "wire {} references undefined component {}",
                        wire, owner
                    ));
                }
            }
        }
    }

    /// One solve attempt per loop turn; each failed attempt must report a
    /// floating node not seen before, and fixes exactly that one node. The
    /// cumulative fix count strictly increases, so the loop terminates.
    fn solve_with_repair(&self, context: &mut CircuitSolverContext) -> Result<DVector<f64>> {
        let mut fixed: IndexSet<usize> = IndexSet::new();
        loop {
            let size = context.unknown_count();
            let attempt = if context.has_one_sided() {
                solve_iterative(size, &*context, &self.criteria).map(|r| r.solution)
            } else {
                let mut system = LayoutSystem::new(size);
                context.stamp_at(&mut system, &DVector::zeros(size));
                solve_direct(&system)
            };

            match attempt {
                Ok(solution) => return Ok(solution),
                Err(schemlay_solver::Error::FloatingNode { index }) => {
                    let node = context
                        .unknown_names()
                        .nth(index)
                        .unwrap_or("?")
                        .to_string();
                    if !fixed.insert(index) {
                        return Err(Error::RepairStalled { node });
                    }
                    log::debug!("floating coordinate {node}; tying it weakly to the origin");
                    context.add_ground_tie(index);
                }
                Err(e) => return Err(Error::Solver(e)),
            }
        }
    }
}
