//! Presences, constraint branches and solve orchestration for schemlay.
//!
//! This crate holds everything that knows it is laying out a *diagram*:
//! components with pins, wires, the constraint branches they emit, the
//! solver context the branches are registered into, the read-only solved
//! value adapter and the [`GraphicalCircuit`] that drives the whole
//! discover → register → solve → distribute pipeline.

pub mod circuit;
pub mod component;
pub mod constraint;
pub mod error;
pub mod pin;
pub mod presence;
pub mod solution;
pub mod solver_context;
pub mod transform;
pub mod wire;

pub use circuit::{Bounds, GraphicalCircuit, Item, SolveState, SolvedWire};
pub use component::Component;
pub use constraint::{MinimumConstraint, OffsetConstraint, Stamp, WeakGroundTie};
pub use error::{Error, Result};
pub use pin::{Pin, PinKind};
pub use presence::Presence;
pub use solution::Solution;
pub use solver_context::{CircuitSolverContext, WirePath};
pub use transform::{Rotation, Transform};
pub use wire::{directions, Length, Wire, DEFAULT_WIRE_LENGTH};
