//! Domination tracking for region-boundary candidates.

use indexmap::IndexSet;

/// Tracks a one-way domination relation between coordinate-nodes.
///
/// A node is an *extreme* while no `order` call has placed it on the
/// dominated side. Once dominated, a node never re-enters the extreme set,
/// even if later calls make it dominate something else.
#[derive(Debug, Clone, Default)]
pub struct NodeExtremeFinder {
    /// Every node mentioned so far, in first-mention order.
    seen: IndexSet<String>,
    /// Nodes that have appeared on the dominated side.
    dominated: IndexSet<String>,
}

impl NodeExtremeFinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `extreme` is not exceeded by `non_extreme`.
    pub fn order(&mut self, extreme: &str, non_extreme: &str) {
        self.seen.insert(extreme.to_string());
        self.seen.insert(non_extreme.to_string());
        self.dominated.insert(non_extreme.to_string());
    }

    /// Whether `name` is still a boundary candidate. Nodes never mentioned
    /// are vacuously extreme.
    pub fn is_extreme(&self, name: &str) -> bool {
        !self.dominated.contains(name)
    }

    /// The currently-undominated nodes, in first-mention order.
    pub fn extremes(&self) -> impl Iterator<Item = &str> {
        self.seen
            .iter()
            .filter(|name| !self.dominated.contains(*name))
            .map(|name| name.as_str())
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.seen.clear();
        self.dominated.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dominated_node_leaves_extremes() {
        let mut finder = NodeExtremeFinder::new();
        finder.order("a", "b");

        let extremes: Vec<_> = finder.extremes().collect();
        assert_eq!(extremes, vec!["a"]);
        assert!(finder.is_extreme("a"));
        assert!(!finder.is_extreme("b"));
    }

    #[test]
    fn test_dominated_node_never_returns() {
        let mut finder = NodeExtremeFinder::new();
        finder.order("a", "b");
        // b now dominates c, but b stays out of the extreme set.
        finder.order("b", "c");

        let extremes: Vec<_> = finder.extremes().collect();
        assert_eq!(extremes, vec!["a"]);
    }

    #[test]
    fn test_clear() {
        let mut finder = NodeExtremeFinder::new();
        finder.order("a", "b");
        finder.clear();

        assert_eq!(finder.extremes().count(), 0);
        assert!(finder.is_extreme("b"));
    }
}
