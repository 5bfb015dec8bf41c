//! Disjoint-set grouping of exactly-coincident coordinate-nodes.

use std::collections::HashMap;

use indexmap::IndexSet;

use crate::node::GROUND_ALIASES;

/// Slot index of the ground group. Never merged away.
const GROUND: usize = 0;

/// Tracks which coordinate-nodes are known to be exactly coincident.
///
/// Nodes are grouped with explicit membership sets: a union moves every
/// member of the smaller set into the larger one, so merge cost is
/// proportional to the smaller group. The ground group is seeded with the
/// literal aliases `"0"`, `"gnd"` and `"gnd!"` and always absorbs the other
/// side of a union regardless of size, so no ordinary coordinate can ever
/// become the representative of ground.
#[derive(Debug, Clone)]
pub struct NodeGrouper {
    /// Node name to group slot.
    slots: HashMap<String, usize>,
    /// Membership sets. Merged-away slots are left empty rather than
    /// removed so slot indices stay stable.
    groups: Vec<IndexSet<String>>,
}

impl NodeGrouper {
    /// Create a grouper with only the ground group.
    pub fn new() -> Self {
        let mut ground = IndexSet::new();
        let mut slots = HashMap::new();
        for alias in GROUND_ALIASES {
            ground.insert(alias.to_string());
            slots.insert(alias.to_string(), GROUND);
        }
        Self {
            slots,
            groups: vec![ground],
        }
    }

    /// Record that `a` and `b` are exactly coincident.
    ///
    /// Self-unions and redundant unions are no-ops. The operation is total:
    /// any two identifiers may be grouped.
    pub fn group(&mut self, a: &str, b: &str) {
        if a == b {
            return;
        }
        match (self.slots.get(a).copied(), self.slots.get(b).copied()) {
            (Some(x), Some(y)) => {
                if x != y {
                    self.merge(x, y);
                }
            }
            (Some(x), None) => {
                self.groups[x].insert(b.to_string());
                self.slots.insert(b.to_string(), x);
            }
            (None, Some(y)) => {
                self.groups[y].insert(a.to_string());
                self.slots.insert(a.to_string(), y);
            }
            (None, None) => {
                let slot = self.groups.len();
                let mut set = IndexSet::new();
                set.insert(a.to_string());
                set.insert(b.to_string());
                self.groups.push(set);
                self.slots.insert(a.to_string(), slot);
                self.slots.insert(b.to_string(), slot);
            }
        }
    }

    /// The canonical representative of `name`'s group, or `name` itself if
    /// it was never grouped.
    pub fn representative<'a>(&'a self, name: &'a str) -> &'a str {
        match self.slots.get(name) {
            Some(&slot) => self.groups[slot]
                .first()
                .map(|s| s.as_str())
                .unwrap_or(name),
            None => name,
        }
    }

    /// Whether `a` and `b` resolve to the same group.
    pub fn are_grouped(&self, a: &str, b: &str) -> bool {
        self.representative(a) == self.representative(b)
    }

    /// Whether `name` belongs to the ground group.
    pub fn is_ground(&self, name: &str) -> bool {
        self.slots.get(name) == Some(&GROUND)
    }

    /// Merge two distinct slots. Ground always absorbs; otherwise the
    /// smaller set is drained into the larger one.
    fn merge(&mut self, x: usize, y: usize) {
        let (into, from) = if x == GROUND {
            (x, y)
        } else if y == GROUND {
            (y, x)
        } else if self.groups[x].len() >= self.groups[y].len() {
            (x, y)
        } else {
            (y, x)
        };
        let moved = std::mem::take(&mut self.groups[from]);
        for name in moved {
            self.slots.insert(name.clone(), into);
            self.groups[into].insert(name);
        }
    }
}

impl Default for NodeGrouper {
    fn default() -> Self {
        Self::new()
    }
}
