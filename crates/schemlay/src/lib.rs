//! # schemlay
//!
//! A constraint-solving layout engine for circuit diagrams.
//!
//! schemlay turns symbolic relationships between component pins ("this pin
//! sits 5 units right of that one", "these two are coincident", "these two
//! must be at least 10 apart") into concrete 2D coordinates. Every
//! coordinate unknown becomes a node of a resistive network, every
//! relationship a branch, and the network is solved like a DC circuit —
//! including a self-healing retry loop for coordinates nothing constrains.
//!
//! ## Quick start
//!
//! ```rust
//! use schemlay::prelude::*;
//! use nalgebra::Vector2;
//!
//! let mut circuit = GraphicalCircuit::new();
//! circuit.add_component(
//!     Component::new("R1")
//!         .with_anchor(Vector2::zeros())
//!         .with_pin(Pin::fixed("b", Vector2::new(4.0, 0.0), directions::right())),
//! );
//! circuit.add_component(
//!     Component::new("C1")
//!         .with_pin(Pin::fixed("a", Vector2::new(-4.0, 0.0), directions::left())),
//! );
//! circuit.add_wire(Wire::from_pin("W1", "R1", "b").then_to(
//!     directions::right(),
//!     Length::Minimum(10.0),
//!     "C1",
//!     "a",
//! ));
//!
//! let mut diagnostics = CollectingSink::new();
//! circuit.solve(&mut diagnostics).unwrap();
//!
//! let c1 = circuit.component("C1").unwrap().location().unwrap();
//! assert!((c1.x - 18.0).abs() < 1e-6);
//! ```

pub use schemlay_core as core;
pub use schemlay_layout as layout;
pub use schemlay_solver as solver;

// Convenient re-exports from schemlay-core.
pub use schemlay_core::{
    // Discovery context
    DiscoveryMode,
    NodeContext,
    NodeExtremeFinder,
    // Node model
    NodeGrouper,
    // Equation system
    LayoutSystem,
    // Diagnostics
    CollectingSink,
    Diagnostic,
    DiagnosticSink,
    LogSink,
    Severity,
};

// Convenient re-exports from schemlay-solver.
pub use schemlay_solver::{
    check_well_formed, solve_direct, solve_iterative, ConvergenceCriteria,
    Error as SolverError, IterationResult, Restamp,
};

// Convenient re-exports from schemlay-layout.
pub use schemlay_layout::{
    directions,
    Bounds,
    CircuitSolverContext,
    Component,
    Error as LayoutError,
    GraphicalCircuit,
    Length,
    Pin,
    PinKind,
    Presence,
    Rotation,
    Solution,
    SolvedWire,
    Transform,
    Wire,
    DEFAULT_WIRE_LENGTH,
};

/// Re-export of nalgebra's 2D vector type.
pub use nalgebra::Vector2;

/// Commonly used types and traits.
///
/// ```rust
/// use schemlay::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        directions, Bounds, CollectingSink, Component, ConvergenceCriteria, DiagnosticSink,
        GraphicalCircuit, Length, LogSink, Pin, Presence, Rotation, Severity, Solution,
        Transform, Vector2, Wire,
    };
}
