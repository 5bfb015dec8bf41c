//! Core node model and layout equation system for schemlay.
//!
//! This crate provides the fundamental data structures of the constraint
//! solver: string-keyed coordinate-nodes, the disjoint-set grouper that
//! tracks exactly-coincident nodes, the extreme finder, the discovery
//! context handed to every presence, and the node-potential equation system
//! the constraints are stamped into.

pub mod context;
pub mod diagnostics;
pub mod extremes;
pub mod group;
pub mod node;
pub mod system;

pub use context::{DiscoveryMode, NodeContext};
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticSink, LogSink, Severity};
pub use extremes::NodeExtremeFinder;
pub use group::NodeGrouper;
pub use node::{is_ground_alias, owner_node, pin_node, Axis, GROUND_ALIASES};
pub use system::LayoutSystem;
