//! Read-only view of the solved coordinate values.

use std::ops::Index;

use indexmap::IndexMap;
use nalgebra::{DVector, Vector2};
use schemlay_core::NodeGrouper;

/// The solved numeric vector exposed as a name → value lookup.
///
/// Sized `N + 1`: slot 0 is the ground representative, fixed at 0.0; slots
/// `1..=N` correspond 1:1 to the non-ground representatives in registration
/// order. Lookups resolve through the grouper, so any alias of a solved
/// node finds its value. This is a closed view by construction: it supports
/// lookup and enumeration only, and indexing a name the solver never saw
/// panics rather than inventing a value.
#[derive(Debug, Clone)]
pub struct Solution {
    grouper: NodeGrouper,
    /// Representative → slot in `values`.
    slots: IndexMap<String, usize>,
    /// Slot 0 is ground.
    values: Vec<f64>,
}

impl Solution {
    pub(crate) fn new(
        grouper: NodeGrouper,
        unknowns: IndexMap<String, usize>,
        solved: &DVector<f64>,
    ) -> Self {
        let mut values = vec![0.0; unknowns.len() + 1];
        let mut slots = IndexMap::with_capacity(unknowns.len());
        for (representative, index) in unknowns {
            values[index + 1] = solved[index];
            slots.insert(representative, index + 1);
        }
        Self {
            grouper,
            slots,
            values,
        }
    }

    /// Number of stored values, ground included.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Look up a coordinate-node by any of its names.
    pub fn get(&self, name: &str) -> Option<f64> {
        if self.grouper.is_ground(name) {
            return Some(0.0);
        }
        let representative = self.grouper.representative(name);
        self.slots.get(representative).map(|&slot| self.values[slot])
    }

    /// Look up a 2D point from its two coordinate-node names.
    pub fn point(&self, x: &str, y: &str) -> Option<Vector2<f64>> {
        Some(Vector2::new(self.get(x)?, self.get(y)?))
    }

    /// Enumerate `(representative, value)`, ground first.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        let ground = std::iter::once((self.grouper.representative("0"), 0.0));
        ground.chain(
            self.slots
                .iter()
                .map(|(name, &slot)| (name.as_str(), self.values[slot])),
        )
    }
}

impl Index<&str> for Solution {
    type Output = f64;

    /// Panics if `name` was never part of the solved system.
    fn index(&self, name: &str) -> &f64 {
        if self.grouper.is_ground(name) {
            return &self.values[0];
        }
        let representative = self.grouper.representative(name);
        match self.slots.get(representative) {
            Some(&slot) => &self.values[slot],
            None => panic!("no solved value for coordinate-node {:?}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Solution {
        let mut grouper = NodeGrouper::new();
        grouper.group("R1[a].x", "W1.0.x");
        let rep = grouper.representative("R1[a].x").to_string();

        let mut unknowns = IndexMap::new();
        unknowns.insert(rep, 0);
        unknowns.insert("R1[a].y".to_string(), 1);

        Solution::new(grouper, unknowns, &DVector::from_vec(vec![4.0, -2.0]))
    }

    #[test]
    fn test_ground_is_slot_zero() {
        let solution = sample();
        assert_eq!(solution.len(), 3);
        assert_eq!(solution.get("0"), Some(0.0));
        assert_eq!(solution.get("gnd!"), Some(0.0));
        assert_eq!(solution.iter().next(), Some(("0", 0.0)));
    }

    #[test]
    fn test_lookup_resolves_aliases() {
        let solution = sample();
        // Both names of the grouped pair see the same value.
        assert_eq!(solution.get("R1[a].x"), Some(4.0));
        assert_eq!(solution.get("W1.0.x"), Some(4.0));
        assert_eq!(solution["R1[a].y"], -2.0);
    }

    #[test]
    fn test_point() {
        let solution = sample();
        let p = solution.point("R1[a].x", "R1[a].y").unwrap();
        assert_eq!(p, Vector2::new(4.0, -2.0));
    }

    #[test]
    fn test_unknown_name_is_none() {
        let solution = sample();
        assert_eq!(solution.get("C9[b].x"), None);
    }

    #[test]
    #[should_panic(expected = "no solved value")]
    fn test_indexing_unknown_name_panics() {
        let solution = sample();
        let _ = solution["C9[b].x"];
    }
}
