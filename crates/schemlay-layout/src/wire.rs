//! Wires: chains of directed segments between pins.

use nalgebra::Vector2;
use schemlay_core::{owner_node, pin_node, Axis, DiagnosticSink, DiscoveryMode, NodeContext};

use crate::presence::Presence;
use crate::solution::Solution;
use crate::solver_context::{CircuitSolverContext, WirePath};

/// Default minimum segment length.
pub const DEFAULT_WIRE_LENGTH: f64 = 10.0;

/// Unit directions for segment construction.
pub mod directions {
    use nalgebra::Vector2;

    pub fn right() -> Vector2<f64> {
        Vector2::new(1.0, 0.0)
    }

    pub fn left() -> Vector2<f64> {
        Vector2::new(-1.0, 0.0)
    }

    pub fn up() -> Vector2<f64> {
        Vector2::new(0.0, 1.0)
    }

    pub fn down() -> Vector2<f64> {
        Vector2::new(0.0, -1.0)
    }
}

/// How long a segment is allowed to be.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    /// Exactly this long.
    Fixed(f64),
    /// At least this long; the solver may stretch it.
    Minimum(f64),
}

impl Default for Length {
    fn default() -> Self {
        Length::Minimum(DEFAULT_WIRE_LENGTH)
    }
}

impl Length {
    fn value(self) -> f64 {
        match self {
            Length::Fixed(l) | Length::Minimum(l) => l,
        }
    }
}

/// One wire vertex: either a component pin or a free intermediate point.
#[derive(Debug, Clone)]
enum Anchor {
    Pin { owner: String, pin: String },
    Free { index: usize },
}

#[derive(Debug, Clone)]
struct Segment {
    /// Unit direction, or zero if the caller supplied a zero vector
    /// (flagged during registration).
    direction: Vector2<f64>,
    length: Length,
}

/// A chain of directed segments. Vertices between segments are free points
/// with generated coordinate-node names `"{WireName}.{k}.x"` / `.y`.
#[derive(Debug, Clone)]
pub struct Wire {
    name: String,
    anchors: Vec<Anchor>,
    segments: Vec<Segment>,
    free_count: usize,
    points: Vec<Vector2<f64>>,
}

impl Wire {
    /// Start a wire at a component pin.
    pub fn from_pin(name: impl Into<String>, owner: impl Into<String>, pin: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            anchors: vec![Anchor::Pin {
                owner: owner.into(),
                pin: pin.into(),
            }],
            segments: Vec::new(),
            free_count: 0,
            points: Vec::new(),
        }
    }

    /// Extend the wire to a new free point.
    pub fn then(mut self, direction: Vector2<f64>, length: Length) -> Self {
        self.push_segment(direction, length);
        let index = self.free_count;
        self.free_count += 1;
        self.anchors.push(Anchor::Free { index });
        self
    }

    /// Extend the wire to a component pin.
    pub fn then_to(
        mut self,
        direction: Vector2<f64>,
        length: Length,
        owner: impl Into<String>,
        pin: impl Into<String>,
    ) -> Self {
        self.push_segment(direction, length);
        self.anchors.push(Anchor::Pin {
            owner: owner.into(),
            pin: pin.into(),
        });
        self
    }

    fn push_segment(&mut self, direction: Vector2<f64>, length: Length) {
        let norm = direction.norm();
        let direction = if norm == 0.0 {
            direction
        } else {
            direction / norm
        };
        self.segments.push(Segment { direction, length });
    }

    /// Solved vertex locations; empty until a successful solve.
    pub fn points(&self) -> &[Vector2<f64>] {
        &self.points
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.anchors.len()
    }

    /// The coordinate-node names of vertex `i`.
    fn vertex_nodes(&self, i: usize) -> (String, String) {
        match &self.anchors[i] {
            Anchor::Pin { owner, pin } => (
                pin_node(owner, pin, Axis::X),
                pin_node(owner, pin, Axis::Y),
            ),
            Anchor::Free { index } => {
                let point = format!("{}.{}", self.name, index);
                (owner_node(&point, Axis::X), owner_node(&point, Axis::Y))
            }
        }
    }

    /// Orientations this wire imposes on its endpoint pins: the start pin
    /// points along the first segment, the end pin back along the last.
    pub(crate) fn direction_requests(&self) -> Vec<(String, String, Vector2<f64>)> {
        let mut requests = Vec::new();
        if self.segments.is_empty() {
            return requests;
        }
        if let Anchor::Pin { owner, pin } = &self.anchors[0] {
            let direction = self.segments[0].direction;
            if direction.norm() != 0.0 {
                requests.push((owner.clone(), pin.clone(), direction));
            }
        }
        if let Some(Anchor::Pin { owner, pin }) = self.anchors.last() {
            if self.anchors.len() > 1 {
                let direction = self.segments[self.segments.len() - 1].direction;
                if direction.norm() != 0.0 {
                    requests.push((owner.clone(), pin.clone(), -direction));
                }
            }
        }
        requests
    }
}

impl Presence for Wire {
    fn name(&self) -> &str {
        &self.name
    }

    fn reset(&mut self) {
        self.points.clear();
    }

    fn discover(&self, context: &mut NodeContext) {
        match context.mode {
            DiscoveryMode::Shorts => {
                for (i, segment) in self.segments.iter().enumerate() {
                    let (ax, ay) = self.vertex_nodes(i);
                    let (bx, by) = self.vertex_nodes(i + 1);
                    if segment.direction.x == 0.0 {
                        context.shorts.group(&ax, &bx);
                    }
                    if segment.direction.y == 0.0 {
                        context.shorts.group(&ay, &by);
                    }
                }
            }
            DiscoveryMode::Links => {
                for (i, segment) in self.segments.iter().enumerate() {
                    if segment.length.value() <= 0.0 {
                        continue;
                    }
                    let (ax, ay) = self.vertex_nodes(i);
                    let (bx, by) = self.vertex_nodes(i + 1);
                    order_along(context, &bx, &ax, segment.direction.x);
                    order_along(context, &by, &ay, segment.direction.y);
                }
            }
            DiscoveryMode::Groups => {
                for i in 0..self.anchors.len() {
                    let (x, y) = self.vertex_nodes(i);
                    context.pair(&x, &y);
                }
            }
            DiscoveryMode::None => {}
        }
    }

    fn register(&self, context: &mut CircuitSolverContext, diagnostics: &mut dyn DiagnosticSink) {
        for i in 0..self.anchors.len() {
            let (x, y) = self.vertex_nodes(i);
            context.touch(&x);
            context.touch(&y);
        }

        for (i, segment) in self.segments.iter().enumerate() {
            let (ax, ay) = self.vertex_nodes(i);
            let (bx, by) = self.vertex_nodes(i + 1);
            let d = segment.direction;

            if d.norm() == 0.0 {
                if segment.length.value() > 0.0 {
                    diagnostics.warning(&format!(
                        "segment {} of wire {} has no direction; skipping its constraints",
                        i, self.name
                    ));
                }
                continue;
            }

            match segment.length {
                Length::Fixed(l) => {
                    if d.x != 0.0 {
                        context.add_offset(&bx, &ax, d.x * l, diagnostics);
                    }
                    if d.y != 0.0 {
                        context.add_offset(&by, &ay, d.y * l, diagnostics);
                    }
                }
                Length::Minimum(l) => {
                    if l <= 0.0 {
                        continue;
                    }
                    if d.x > 0.0 {
                        context.add_minimum(&bx, &ax, d.x * l, diagnostics);
                    } else if d.x < 0.0 {
                        context.add_minimum(&ax, &bx, -d.x * l, diagnostics);
                    }
                    if d.y > 0.0 {
                        context.add_minimum(&by, &ay, d.y * l, diagnostics);
                    } else if d.y < 0.0 {
                        context.add_minimum(&ay, &by, -d.y * l, diagnostics);
                    }
                }
            }
        }

        context.add_wire_path(WirePath {
            name: self.name.clone(),
            nodes: (0..self.anchors.len()).map(|i| self.vertex_nodes(i)).collect(),
        });
    }

    fn update(&mut self, solution: &Solution) {
        self.points = (0..self.anchors.len())
            .filter_map(|i| {
                let (x, y) = self.vertex_nodes(i);
                solution.point(&x, &y)
            })
            .collect();
    }
}

/// Record which end of a segment dominates the other on one axis.
fn order_along(context: &mut NodeContext, end: &str, start: &str, component: f64) {
    if component > 0.0 {
        context.order(end, start);
    } else if component < 0.0 {
        context.order(start, end);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemlay_core::CollectingSink;

    fn horizontal_wire() -> Wire {
        Wire::from_pin("W1", "R1", "b").then_to(
            directions::right(),
            Length::Minimum(10.0),
            "C1",
            "a",
        )
    }

    #[test]
    fn test_axis_aligned_segment_shorts_perpendicular() {
        let wire = horizontal_wire();

        let mut context = NodeContext::new();
        context.mode = DiscoveryMode::Shorts;
        wire.discover(&mut context);

        assert!(context.shorts.are_grouped("R1[b].y", "C1[a].y"));
        assert!(!context.shorts.are_grouped("R1[b].x", "C1[a].x"));
    }

    #[test]
    fn test_segment_orders_along_direction() {
        let wire = horizontal_wire();

        let mut context = NodeContext::new();
        context.mode = DiscoveryMode::Links;
        wire.discover(&mut context);

        // The far end is not exceeded by the near end.
        assert!(context.extremes.is_extreme("C1[a].x"));
        assert!(!context.extremes.is_extreme("R1[b].x"));
    }

    #[test]
    fn test_minimum_segment_registers_one_sided_branch() {
        let wire = horizontal_wire();

        let mut ctx = CircuitSolverContext::new(NodeContext::new());
        let mut sink = CollectingSink::new();
        wire.register(&mut ctx, &mut sink);

        assert_eq!(ctx.branch_count(), 1);
        assert!(ctx.has_one_sided());
    }

    #[test]
    fn test_fixed_diagonal_registers_both_axes() {
        let wire = Wire::from_pin("W1", "R1", "b").then(
            Vector2::new(1.0, 1.0),
            Length::Fixed(10.0),
        );

        let mut ctx = CircuitSolverContext::new(NodeContext::new());
        let mut sink = CollectingSink::new();
        wire.register(&mut ctx, &mut sink);

        assert_eq!(ctx.branch_count(), 2);
        assert!(!ctx.has_one_sided());
    }

    #[test]
    fn test_free_vertices_get_generated_names() {
        let wire = Wire::from_pin("W1", "R1", "b")
            .then(directions::right(), Length::default())
            .then(directions::up(), Length::default());

        assert_eq!(wire.vertex_count(), 3);
        assert_eq!(wire.vertex_nodes(1), ("W1.0.x".to_string(), "W1.0.y".to_string()));
        assert_eq!(wire.vertex_nodes(2), ("W1.1.x".to_string(), "W1.1.y".to_string()));
    }

    #[test]
    fn test_direction_requests_for_endpoint_pins() {
        let wire = horizontal_wire();
        let requests = wire.direction_requests();

        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].0, "R1");
        assert_eq!(requests[0].2, directions::right());
        assert_eq!(requests[1].0, "C1");
        assert_eq!(requests[1].2, directions::left());
    }

    #[test]
    fn test_zero_direction_segment_warns() {
        let wire = Wire::from_pin("W1", "R1", "b").then(Vector2::zeros(), Length::Fixed(5.0));

        let mut ctx = CircuitSolverContext::new(NodeContext::new());
        let mut sink = CollectingSink::new();
        wire.register(&mut ctx, &mut sink);

        assert_eq!(ctx.branch_count(), 0);
        assert_eq!(sink.diagnostics.len(), 1);
    }
}
