//! Pin variants and their constraint contributions.

use nalgebra::Vector2;
use schemlay_core::{owner_node, pin_node, Axis, DiagnosticSink, DiscoveryMode, NodeContext};

use crate::solution::Solution;
use crate::solver_context::CircuitSolverContext;
use crate::transform::Transform;

/// How a pin relates to the component that owns it.
#[derive(Debug, Clone)]
pub enum PinKind {
    /// Offset and orientation known in the owner's local frame; both are
    /// pushed through the owner's active rotation/mirror before branches
    /// are emitted.
    Fixed {
        offset: Vector2<f64>,
        direction: Vector2<f64>,
    },
    /// Orientation resolved externally (by the wire that attaches here);
    /// the offset magnitude is fixed once the orientation is known. The
    /// resolved direction is global, not subject to the owner transform.
    LooseOriented {
        length: f64,
        direction: Option<Vector2<f64>>,
    },
    /// Fully delegated to whatever else constrains it.
    Loose,
    /// At least `minimum` away from the owner along the pin's direction.
    MinimumOffset {
        direction: Vector2<f64>,
        minimum: f64,
    },
}

/// Outcome of resolving a pin's orientation from a wire.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ResolveOutcome {
    /// A loosely-oriented pin accepted the direction.
    Resolved,
    /// The pin's existing orientation already agrees.
    Matched,
    /// The pin's orientation disagrees; the earlier one is kept.
    Conflict { kept: Vector2<f64> },
}

/// One connection point of a component.
#[derive(Debug, Clone)]
pub struct Pin {
    name: String,
    kind: PinKind,
    location: Option<Vector2<f64>>,
}

impl Pin {
    pub fn fixed(name: impl Into<String>, offset: Vector2<f64>, direction: Vector2<f64>) -> Self {
        Self {
            name: name.into(),
            kind: PinKind::Fixed { offset, direction },
            location: None,
        }
    }

    pub fn loose(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: PinKind::Loose,
            location: None,
        }
    }

    pub fn loose_oriented(name: impl Into<String>, length: f64) -> Self {
        Self {
            name: name.into(),
            kind: PinKind::LooseOriented {
                length,
                direction: None,
            },
            location: None,
        }
    }

    pub fn minimum_offset(name: impl Into<String>, direction: Vector2<f64>, minimum: f64) -> Self {
        Self {
            name: name.into(),
            kind: PinKind::MinimumOffset { direction, minimum },
            location: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &PinKind {
        &self.kind
    }

    /// Solved location; valid only after a successful solve.
    pub fn location(&self) -> Option<Vector2<f64>> {
        self.location
    }

    /// The pin's offset from its owner in the global frame, if it has one.
    fn global_offset(&self, transform: &Transform) -> Option<Vector2<f64>> {
        match &self.kind {
            PinKind::Fixed { offset, .. } => Some(transform.apply(*offset)),
            PinKind::LooseOriented {
                length,
                direction: Some(direction),
            } => Some(direction * *length),
            PinKind::LooseOriented { direction: None, .. } => None,
            PinKind::Loose => None,
            PinKind::MinimumOffset { .. } => None,
        }
    }

    /// The direction the pin points in the global frame, if known.
    pub fn direction(&self, transform: &Transform) -> Option<Vector2<f64>> {
        match &self.kind {
            PinKind::Fixed { direction, .. } => Some(transform.apply(*direction)),
            PinKind::LooseOriented { direction, .. } => *direction,
            PinKind::Loose => None,
            PinKind::MinimumOffset { direction, .. } => Some(transform.apply(*direction)),
        }
    }

    pub(crate) fn reset(&mut self) {
        self.location = None;
        if let PinKind::LooseOriented { direction, .. } = &mut self.kind {
            *direction = None;
        }
    }

    /// Accept or reject an externally supplied orientation.
    pub(crate) fn resolve_direction(
        &mut self,
        direction: Vector2<f64>,
        transform: &Transform,
    ) -> ResolveOutcome {
        let own = self.direction(transform);
        match &mut self.kind {
            PinKind::LooseOriented { direction: slot, .. } => match slot {
                None => {
                    *slot = Some(direction);
                    ResolveOutcome::Resolved
                }
                Some(kept) if same_direction(*kept, direction) => ResolveOutcome::Matched,
                Some(kept) => ResolveOutcome::Conflict { kept: *kept },
            },
            PinKind::Loose => ResolveOutcome::Matched,
            _ => {
                // Fixed orientation; flag disagreement, keep the pin's own.
                let kept = own.unwrap_or_else(Vector2::zeros);
                if same_direction(kept, direction) {
                    ResolveOutcome::Matched
                } else {
                    ResolveOutcome::Conflict { kept }
                }
            }
        }
    }

    pub(crate) fn discover(&self, owner: &str, transform: &Transform, context: &mut NodeContext) {
        let x = pin_node(owner, &self.name, Axis::X);
        let y = pin_node(owner, &self.name, Axis::Y);
        let ox = owner_node(owner, Axis::X);
        let oy = owner_node(owner, Axis::Y);

        match context.mode {
            DiscoveryMode::Shorts => {
                if let Some(global) = self.global_offset(transform) {
                    if global.x == 0.0 {
                        context.shorts.group(&x, &ox);
                    }
                    if global.y == 0.0 {
                        context.shorts.group(&y, &oy);
                    }
                } else if let PinKind::MinimumOffset { .. } = self.kind {
                    // The pin lies on the ray from the owner: coordinates
                    // perpendicular to the ray coincide exactly.
                    if let Some(direction) = self.direction(transform) {
                        if direction.x == 0.0 {
                            context.shorts.group(&x, &ox);
                        }
                        if direction.y == 0.0 {
                            context.shorts.group(&y, &oy);
                        }
                    }
                }
            }
            DiscoveryMode::Links => {
                if let Some(global) = self.global_offset(transform) {
                    order_along(context, &x, &ox, global.x);
                    order_along(context, &y, &oy, global.y);
                } else if let PinKind::MinimumOffset { direction, minimum } = &self.kind {
                    if *minimum > 0.0 {
                        let global = transform.apply(*direction) * *minimum;
                        order_along(context, &x, &ox, global.x);
                        order_along(context, &y, &oy, global.y);
                    }
                }
            }
            DiscoveryMode::Groups => {
                context.pair(&x, &y);
            }
            DiscoveryMode::None => {}
        }
    }

    pub(crate) fn register(
        &self,
        owner: &str,
        transform: &Transform,
        context: &mut CircuitSolverContext,
        diagnostics: &mut dyn DiagnosticSink,
    ) {
        let x = pin_node(owner, &self.name, Axis::X);
        let y = pin_node(owner, &self.name, Axis::Y);
        let ox = owner_node(owner, Axis::X);
        let oy = owner_node(owner, Axis::Y);

        context.touch(&x);
        context.touch(&y);

        match &self.kind {
            PinKind::Fixed { .. } | PinKind::LooseOriented { direction: Some(_), .. } => {
                // Zero components were shorted during discovery.
                let global = self
                    .global_offset(transform)
                    .unwrap_or_else(Vector2::zeros);
                if global.x != 0.0 {
                    context.add_offset(&x, &ox, global.x, diagnostics);
                }
                if global.y != 0.0 {
                    context.add_offset(&y, &oy, global.y, diagnostics);
                }
            }
            PinKind::LooseOriented { direction: None, .. } => {
                diagnostics.warning(&format!(
                    "orientation of {}[{}] was never resolved; leaving the pin loose",
                    owner, self.name
                ));
            }
            PinKind::Loose => {}
            PinKind::MinimumOffset { direction, minimum } => {
                let global = transform.apply(*direction);
                if global.x > 0.0 {
                    context.add_minimum(&x, &ox, global.x * minimum, diagnostics);
                } else if global.x < 0.0 {
                    context.add_minimum(&ox, &x, -global.x * minimum, diagnostics);
                }
                if global.y > 0.0 {
                    context.add_minimum(&y, &oy, global.y * minimum, diagnostics);
                } else if global.y < 0.0 {
                    context.add_minimum(&oy, &y, -global.y * minimum, diagnostics);
                }
            }
        }
    }

    pub(crate) fn update(&mut self, owner: &str, solution: &Solution) {
        let x = pin_node(owner, &self.name, Axis::X);
        let y = pin_node(owner, &self.name, Axis::Y);
        self.location = solution.point(&x, &y);
    }
}

/// Record which side of a separation dominates the other on one axis.
fn order_along(context: &mut NodeContext, node: &str, owner: &str, separation: f64) {
    if separation > 0.0 {
        context.order(node, owner);
    } else if separation < 0.0 {
        context.order(owner, node);
    }
}

/// Direction comparison, tolerant of magnitude.
pub(crate) fn same_direction(a: Vector2<f64>, b: Vector2<f64>) -> bool {
    let (na, nb) = (a.norm(), b.norm());
    if na == 0.0 || nb == 0.0 {
        return true;
    }
    (a / na - b / nb).norm() < 1e-6
}
