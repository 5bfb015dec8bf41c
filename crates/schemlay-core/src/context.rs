//! The shared context handed to every presence during relationship
//! discovery.

use indexmap::IndexSet;

use crate::extremes::NodeExtremeFinder;
use crate::group::NodeGrouper;

/// Which discovery sub-phase is active.
///
/// Exact-coincidence facts must be fully discovered before ordering or
/// pairing facts are recorded, because the latter are evaluated on group
/// representatives rather than raw node names. The circuit therefore visits
/// every presence once per mode, in the order `Shorts`, `Links`, `Groups`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiscoveryMode {
    /// Not inside a discovery pass.
    #[default]
    None,
    /// Declare exact-coincidence (zero-offset) facts via [`NodeContext::shorts`].
    Shorts,
    /// Declare ordering facts via [`NodeContext::extremes`].
    Links,
    /// Declare X/Y pairings via [`NodeContext::pair`].
    Groups,
}

/// Mutable discovery state shared by all presences of a circuit.
#[derive(Debug, Default)]
pub struct NodeContext {
    /// Exactly-coincident node groups.
    pub shorts: NodeGrouper,
    /// Domination facts between representatives.
    pub extremes: NodeExtremeFinder,
    /// X/Y coordinate-node pairs that belong to one 2D point.
    pairs: IndexSet<(String, String)>,
    /// The active sub-phase.
    pub mode: DiscoveryMode,
}

impl NodeContext {
    pub fn new() -> Self {
        Self {
            shorts: NodeGrouper::new(),
            extremes: NodeExtremeFinder::new(),
            pairs: IndexSet::new(),
            mode: DiscoveryMode::None,
        }
    }

    /// Record that `extreme` is not exceeded by `non_extreme`.
    ///
    /// Both sides are resolved to their representatives first; ordering a
    /// node against something it is grouped with is a no-op, since a node
    /// must never dominate itself out of the extreme set.
    pub fn order(&mut self, extreme: &str, non_extreme: &str) {
        let a = self.shorts.representative(extreme).to_string();
        let b = self.shorts.representative(non_extreme).to_string();
        if a != b {
            self.extremes.order(&a, &b);
        }
    }

    /// Record that `x` and `y` are the two coordinates of one point.
    /// Resolved to representatives, so coincident points pair once.
    pub fn pair(&mut self, x: &str, y: &str) {
        let x = self.shorts.representative(x).to_string();
        let y = self.shorts.representative(y).to_string();
        self.pairs.insert((x, y));
    }

    /// All recorded (x, y) pairings, in first-recorded order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(x, y)| (x.as_str(), y.as_str()))
    }
}
