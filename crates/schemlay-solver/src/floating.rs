//! Structural well-formedness check for the constraint network.

use schemlay_core::LayoutSystem;

use crate::error::{Error, Result};

/// Verify that every unknown has at least one constraining branch.
///
/// Reports the *first* floating node only; the repair loop in the layout
/// crate patches one node per retry, and its termination argument (a
/// strictly increasing fix count) depends on that one-at-a-time discipline.
pub fn check_well_formed(system: &LayoutSystem) -> Result<()> {
    match system.floating_rows().first() {
        Some(&index) => Err(Error::FloatingNode { index }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed_system_passes() {
        let mut sys = LayoutSystem::new(2);
        sys.stamp_conductance(Some(0), Some(1), 1.0);
        sys.stamp_conductance(Some(1), None, 1.0);

        assert!(check_well_formed(&sys).is_ok());
    }

    #[test]
    fn test_first_floating_node_reported() {
        let mut sys = LayoutSystem::new(3);
        sys.stamp_conductance(Some(1), None, 1.0);

        // Rows 0 and 2 are both floating; only the first is reported.
        assert!(matches!(
            check_well_formed(&sys),
            Err(Error::FloatingNode { index: 0 })
        ));
    }

    #[test]
    fn test_empty_system_is_well_formed() {
        let sys = LayoutSystem::new(0);
        assert!(check_well_formed(&sys).is_ok());
    }
}
