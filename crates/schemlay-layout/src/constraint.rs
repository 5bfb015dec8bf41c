//! Constraint branches and their network stamps.
//!
//! Every relationship the solver can enforce is one of three branch kinds,
//! each stamped into the [`LayoutSystem`] the way a circuit device stamps an
//! MNA matrix:
//!
//! - an exact offset is a small series resistance plus an ideal offset
//!   source, stamped as its Norton equivalent;
//! - a minimum offset is a rectifying branch in series with a controlled
//!   source: stiff while the separation sits at or below the minimum,
//!   `gmin`-weak and force-free once other constraints hold it above (the
//!   two-slope linearization of an ideal diode);
//! - a weak ground tie is the repair branch for floating coordinates.

use nalgebra::DVector;
use schemlay_core::LayoutSystem;

/// Conductance of an exact-offset branch.
pub const G_OFFSET: f64 = 1e3;
/// Conductance of a violated minimum branch.
pub const G_MINIMUM_ON: f64 = 1e3;
/// Residual conductance of a satisfied minimum branch. Keeps the branch
/// structurally present so its nodes never look floating.
pub const G_MINIMUM_OFF: f64 = 1e-9;
/// Conductance of the repair pull-to-ground.
pub const G_WEAK: f64 = 1e-9;

/// Engagement tolerance for minimum branches.
const MINIMUM_SLACK: f64 = 1e-9;

/// A branch that can stamp itself into the layout system.
///
/// `solution` is the current operating point; linear branches ignore it.
pub trait Stamp {
    fn stamp(&self, system: &mut LayoutSystem, solution: &DVector<f64>);

    /// Whether this branch's stamp depends on the operating point.
    fn is_one_sided(&self) -> bool {
        false
    }
}

/// Soft equality: `v(pos) - v(neg) = offset`, to within the branch's series
/// resistance.
#[derive(Debug, Clone)]
pub struct OffsetConstraint {
    /// Positive node index (`None` = ground).
    pub pos: Option<usize>,
    /// Negative node index (`None` = ground).
    pub neg: Option<usize>,
    /// Target separation.
    pub offset: f64,
}

impl Stamp for OffsetConstraint {
    fn stamp(&self, system: &mut LayoutSystem, _solution: &DVector<f64>) {
        system.stamp_conductance(self.pos, self.neg, G_OFFSET);
        system.stamp_current(self.neg, self.pos, G_OFFSET * self.offset);
    }
}

/// One-sided inequality: `v(pos) - v(neg) >= minimum`.
///
/// While the operating point sits at or below the minimum the branch
/// conducts: a stiff source drives the separation to exactly `minimum`, so
/// an uncontested constraint settles right on it. Once other constraints
/// hold the separation strictly above the minimum, the branch goes slack:
/// a residual conductance keeps it structurally present, with its source
/// matched to the operating point so it exerts no force — a reverse-biased
/// branch carries no current, and a weak biased pull would also leave a
/// weakly-anchored subtree numerically ill-conditioned.
#[derive(Debug, Clone)]
pub struct MinimumConstraint {
    pub pos: Option<usize>,
    pub neg: Option<usize>,
    /// Smallest allowed separation. Positive.
    pub minimum: f64,
}

impl Stamp for MinimumConstraint {
    fn stamp(&self, system: &mut LayoutSystem, solution: &DVector<f64>) {
        let dv = LayoutSystem::potential(solution, self.pos)
            - LayoutSystem::potential(solution, self.neg);
        if dv < self.minimum + MINIMUM_SLACK {
            system.stamp_conductance(self.pos, self.neg, G_MINIMUM_ON);
            system.stamp_current(self.neg, self.pos, G_MINIMUM_ON * self.minimum);
        } else {
            system.stamp_conductance(self.pos, self.neg, G_MINIMUM_OFF);
            system.stamp_current(self.neg, self.pos, G_MINIMUM_OFF * dv);
        }
    }

    fn is_one_sided(&self) -> bool {
        true
    }
}

/// Very weak pull of one coordinate toward the origin; injected by the
/// floating-node repair loop and never by presences.
#[derive(Debug, Clone)]
pub struct WeakGroundTie {
    pub node: usize,
}

impl Stamp for WeakGroundTie {
    fn stamp(&self, system: &mut LayoutSystem, _solution: &DVector<f64>) {
        system.stamp_conductance(Some(self.node), None, G_WEAK);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemlay_solver::solve_direct;

    #[test]
    fn test_offset_branch_holds_separation() {
        // Node 0 anchored to ground, node 1 offset +7 from node 0.
        let mut sys = LayoutSystem::new(2);
        let zeros = DVector::zeros(2);
        OffsetConstraint {
            pos: Some(0),
            neg: None,
            offset: 0.0,
        }
        .stamp(&mut sys, &zeros);
        OffsetConstraint {
            pos: Some(1),
            neg: Some(0),
            offset: 7.0,
        }
        .stamp(&mut sys, &zeros);

        let x = solve_direct(&sys).unwrap();
        assert!(x[0].abs() < 1e-9);
        assert!((x[1] - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_minimum_branch_engages_when_violated() {
        let branch = MinimumConstraint {
            pos: Some(0),
            neg: None,
            minimum: 10.0,
        };

        let mut sys = LayoutSystem::new(1);
        branch.stamp(&mut sys, &DVector::zeros(1));
        // Violated at 0: stiff conductance driving toward the minimum.
        assert!((sys.matrix()[(0, 0)] - G_MINIMUM_ON).abs() < 1e-12);
        assert!((sys.rhs()[0] - G_MINIMUM_ON * 10.0).abs() < 1e-9);

        let mut sys = LayoutSystem::new(1);
        branch.stamp(&mut sys, &DVector::from_vec(vec![12.0]));
        // Slack at 12: residual conductance, no net force.
        assert!((sys.matrix()[(0, 0)] - G_MINIMUM_OFF).abs() < 1e-12);
        assert!((sys.rhs()[0] - G_MINIMUM_OFF * 12.0).abs() < 1e-18);
    }

    #[test]
    fn test_active_minimum_settles_exactly_on_the_minimum() {
        // A node held only by the minimum branch converges onto the bound.
        let branch = MinimumConstraint {
            pos: Some(0),
            neg: None,
            minimum: 10.0,
        };

        let mut sys = LayoutSystem::new(1);
        branch.stamp(&mut sys, &DVector::zeros(1));
        let x = solve_direct(&sys).unwrap();
        assert!((x[0] - 10.0).abs() < 1e-9);

        // Re-stamping at the bound keeps the branch active and the value put.
        let mut sys = LayoutSystem::new(1);
        branch.stamp(&mut sys, &x);
        let again = solve_direct(&sys).unwrap();
        assert_eq!(x[0], again[0]);
    }

    #[test]
    fn test_weak_ground_tie_pins_isolated_node() {
        let mut sys = LayoutSystem::new(1);
        WeakGroundTie { node: 0 }.stamp(&mut sys, &DVector::zeros(1));

        let x = solve_direct(&sys).unwrap();
        assert_eq!(x[0], 0.0);
    }
}
