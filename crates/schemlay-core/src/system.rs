//! The node-potential equation system constraints are stamped into.

use nalgebra::{DMatrix, DVector};

/// Layout system: Ax = b.
///
/// One unknown "potential" per non-ground group representative; the solved
/// potential of a node *is* its coordinate value. Ground is excluded from
/// the matrix and fixed at zero, so stamp operations take `Option<usize>`
/// indices with `None` meaning ground — the same convention a nodal-analysis
/// matrix uses for its reference node.
///
/// Constraints are expressed with two stamps only: a conductance between two
/// nodes and an injected current. An ideal offset source in series with a
/// small resistance is stamped as its Norton equivalent (conductance `g`
/// plus current `g * offset`), which ties the two potentials to within the
/// offset without introducing branch-current unknowns.
#[derive(Debug, Clone)]
pub struct LayoutSystem {
    /// The coefficient matrix.
    matrix: DMatrix<f64>,
    /// The right-hand side vector.
    rhs: DVector<f64>,
}

impl LayoutSystem {
    /// Create a zeroed system for `size` non-ground unknowns.
    pub fn new(size: usize) -> Self {
        Self {
            matrix: DMatrix::zeros(size, size),
            rhs: DVector::zeros(size),
        }
    }

    /// Number of unknowns.
    pub fn size(&self) -> usize {
        self.rhs.len()
    }

    /// Reset the matrix and RHS to zeros.
    pub fn clear(&mut self) {
        self.matrix.fill(0.0);
        self.rhs.fill(0.0);
    }

    /// Stamp a conductance between two nodes (`None` = ground).
    ///
    /// For a conductance g between nodes i and j:
    /// - A[i,i] += g, A[j,j] += g
    /// - A[i,j] -= g, A[j,i] -= g
    pub fn stamp_conductance(&mut self, node_i: Option<usize>, node_j: Option<usize>, g: f64) {
        if let Some(i) = node_i {
            self.matrix[(i, i)] += g;
        }
        if let Some(j) = node_j {
            self.matrix[(j, j)] += g;
        }
        if let (Some(i), Some(j)) = (node_i, node_j) {
            self.matrix[(i, j)] -= g;
            self.matrix[(j, i)] -= g;
        }
    }

    /// Stamp a current flowing from node i into node j (`None` = ground).
    pub fn stamp_current(&mut self, node_i: Option<usize>, node_j: Option<usize>, current: f64) {
        if let Some(i) = node_i {
            self.rhs[i] -= current;
        }
        if let Some(j) = node_j {
            self.rhs[j] += current;
        }
    }

    /// The potential of a node under `solution` (`None` = ground = 0).
    pub fn potential(solution: &DVector<f64>, node: Option<usize>) -> f64 {
        match node {
            Some(i) => solution[i],
            None => 0.0,
        }
    }

    /// Unknowns no branch attaches to.
    ///
    /// A coordinate-node nobody constrained leaves its row all-zero; the
    /// diagonal alone is enough to detect that, since every stamped branch
    /// touches the diagonal of each non-ground node it connects. Detection
    /// reads the matrix structure directly so it stays independent of
    /// whichever factorization reports singularity.
    pub fn floating_rows(&self) -> Vec<usize> {
        (0..self.size())
            .filter(|&i| self.matrix[(i, i)] == 0.0)
            .collect()
    }

    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    pub fn rhs(&self) -> &DVector<f64> {
        &self.rhs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stamp_conductance() {
        let mut sys = LayoutSystem::new(2);
        sys.stamp_conductance(Some(0), Some(1), 2.0);

        assert_eq!(sys.matrix()[(0, 0)], 2.0);
        assert_eq!(sys.matrix()[(1, 1)], 2.0);
        assert_eq!(sys.matrix()[(0, 1)], -2.0);
        assert_eq!(sys.matrix()[(1, 0)], -2.0);
    }

    #[test]
    fn test_stamp_conductance_to_ground() {
        let mut sys = LayoutSystem::new(2);
        sys.stamp_conductance(Some(1), None, 1.0);

        assert_eq!(sys.matrix()[(0, 0)], 0.0);
        assert_eq!(sys.matrix()[(1, 1)], 1.0);
    }

    #[test]
    fn test_stamp_current() {
        let mut sys = LayoutSystem::new(2);
        sys.stamp_current(None, Some(0), 1.5);

        assert_eq!(sys.rhs()[0], 1.5);
        assert_eq!(sys.rhs()[1], 0.0);
    }

    #[test]
    fn test_floating_rows() {
        let mut sys = LayoutSystem::new(3);
        sys.stamp_conductance(Some(0), Some(2), 1.0);

        assert_eq!(sys.floating_rows(), vec![1]);
    }

    #[test]
    fn test_clear() {
        let mut sys = LayoutSystem::new(1);
        sys.stamp_conductance(Some(0), None, 1.0);
        sys.stamp_current(None, Some(0), 1.0);
        sys.clear();

        assert_eq!(sys.matrix()[(0, 0)], 0.0);
        assert_eq!(sys.rhs()[0], 0.0);
    }
}
