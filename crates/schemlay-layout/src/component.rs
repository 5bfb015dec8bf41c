//! A placed component: a located presence that owns pins.

use nalgebra::Vector2;
use schemlay_core::{owner_node, Axis, DiagnosticSink, DiscoveryMode, NodeContext};

use crate::pin::{Pin, ResolveOutcome};
use crate::presence::Presence;
use crate::solution::Solution;
use crate::solver_context::CircuitSolverContext;
use crate::transform::Transform;

/// A drawable with a location of its own and a set of pins.
///
/// The component's location is the pair of coordinate-nodes
/// `"{Name}.x"` / `"{Name}.y"`; every pin constrains itself relative to
/// those through the component's active transform.
#[derive(Debug, Clone)]
pub struct Component {
    name: String,
    transform: Transform,
    pins: Vec<Pin>,
    /// Fix the component's location at an absolute point.
    anchor: Option<Vector2<f64>>,
    location: Option<Vector2<f64>>,
}

impl Component {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::default(),
            pins: Vec::new(),
            anchor: None,
            location: None,
        }
    }

    pub fn with_pin(mut self, pin: Pin) -> Self {
        self.pins.push(pin);
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_anchor(mut self, anchor: Vector2<f64>) -> Self {
        self.anchor = Some(anchor);
        self
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Solved location; valid only after a successful solve.
    pub fn location(&self) -> Option<Vector2<f64>> {
        self.location
    }

    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    pub fn pin(&self, name: &str) -> Option<&Pin> {
        self.pins.iter().find(|p| p.name() == name)
    }

    /// Resolve a pin's orientation from an attached wire. `None` if the pin
    /// does not exist.
    pub(crate) fn resolve_pin_direction(
        &mut self,
        pin: &str,
        direction: Vector2<f64>,
    ) -> Option<ResolveOutcome> {
        let transform = self.transform;
        self.pins
            .iter_mut()
            .find(|p| p.name() == pin)
            .map(|p| p.resolve_direction(direction, &transform))
    }
}

impl Presence for Component {
    fn name(&self) -> &str {
        &self.name
    }

    fn reset(&mut self) {
        self.location = None;
        for pin in &mut self.pins {
            pin.reset();
        }
    }

    fn discover(&self, context: &mut NodeContext) {
        let x = owner_node(&self.name, Axis::X);
        let y = owner_node(&self.name, Axis::Y);

        match context.mode {
            DiscoveryMode::Shorts => {
                if let Some(anchor) = self.anchor {
                    // Anchoring at zero is an exact coincidence with ground.
                    if anchor.x == 0.0 {
                        context.shorts.group(&x, "0");
                    }
                    if anchor.y == 0.0 {
                        context.shorts.group(&y, "0");
                    }
                }
            }
            DiscoveryMode::Groups => {
                context.pair(&x, &y);
            }
            DiscoveryMode::Links | DiscoveryMode::None => {}
        }

        for pin in &self.pins {
            pin.discover(&self.name, &self.transform, context);
        }
    }

    fn register(&self, context: &mut CircuitSolverContext, diagnostics: &mut dyn DiagnosticSink) {
        let x = owner_node(&self.name, Axis::X);
        let y = owner_node(&self.name, Axis::Y);

        context.touch(&x);
        context.touch(&y);

        if let Some(anchor) = self.anchor {
            context.add_offset(&x, "0", anchor.x, diagnostics);
            context.add_offset(&y, "0", anchor.y, diagnostics);
        }

        for pin in &self.pins {
            pin.register(&self.name, &self.transform, context, diagnostics);
        }
    }

    fn update(&mut self, solution: &Solution) {
        let x = owner_node(&self.name, Axis::X);
        let y = owner_node(&self.name, Axis::Y);
        self.location = solution.point(&x, &y);

        for pin in &mut self.pins {
            pin.update(&self.name, solution);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemlay_core::CollectingSink;

    #[test]
    fn test_origin_anchor_shorts_to_ground() {
        let component = Component::new("R1").with_anchor(Vector2::zeros());

        let mut context = NodeContext::new();
        context.mode = DiscoveryMode::Shorts;
        component.discover(&mut context);

        assert!(context.shorts.is_ground("R1.x"));
        assert!(context.shorts.is_ground("R1.y"));
    }

    #[test]
    fn test_nonzero_anchor_registers_offsets_from_ground() {
        let component = Component::new("R1").with_anchor(Vector2::new(10.0, 0.0));

        let mut ctx = CircuitSolverContext::new(NodeContext::new());
        let mut sink = CollectingSink::new();
        component.register(&mut ctx, &mut sink);

        // One branch per coordinate, both referencing ground.
        assert_eq!(ctx.branch_count(), 2);
        assert!(ctx.ground_referenced());
    }

    #[test]
    fn test_unanchored_component_registers_its_nodes() {
        let component = Component::new("R1").with_pin(Pin::loose("a"));

        let mut ctx = CircuitSolverContext::new(NodeContext::new());
        let mut sink = CollectingSink::new();
        component.register(&mut ctx, &mut sink);

        assert_eq!(ctx.branch_count(), 0);
        // R1.x, R1.y, R1[a].x, R1[a].y.
        assert_eq!(ctx.unknown_count(), 4);
    }

    #[test]
    fn test_pin_lookup() {
        let component = Component::new("R1").with_pin(Pin::loose("a"));
        assert!(component.pin("a").is_some());
        assert!(component.pin("b").is_none());
    }
}
