//! The tidal tensor (the Hessian of the potential), under the same
//! unit-point-mass convention as [`super::Potential`].

use crate::point::{distance2, Point};
use crate::quantity::Quantity;
use crate::scratch::DisjointMut;
use crate::tree::Tree;

type Tensor = [[f64; 3]; 3];

/// Accumulates the softened tidal tensor, `r = x_target - x_source`,
/// `d^2 = |r|^2 + eps^2`:
///
/// `T_ii = G * m * (r_j^2 + r_k^2 - 2 r_i^2) / (d^2 * d^2 * sqrt(d^2))`
/// for `(i,j,k)` a cyclic permutation, and
/// `T_ij = -3 G * m * r_i * r_j / (d^2 * d^2 * sqrt(d^2))`,
/// into a caller-owned buffer indexed by original point position.
pub struct TidalTensor<'a> {
    tensor: DisjointMut<'a, Tensor>,
    g: f64,
}

impl<'a> TidalTensor<'a> {
    /// Uses the unit convention `G * m_particle = 1`.
    pub fn new(tensor: &'a mut [Tensor]) -> Self {
        Self::with_g(tensor, 1.0)
    }

    /// Uses an explicit `g`.
    pub fn with_g(tensor: &'a mut [Tensor], g: f64) -> Self {
        TidalTensor { tensor: DisjointMut::new(tensor), g }
    }

    fn add(&self, target: &Point, target_orig: usize, source: &Point, mass: f64, eps2: f64) {
        let d2 = distance2(target, source) + eps2;
        if d2 == 0.0 {
            return;
        }
        let r = [target[0] - source[0], target[1] - source[1], target[2] - source[2]];
        let scale = self.g * mass / (d2 * d2 * d2.sqrt());
        unsafe {
            let out = self.tensor.get_mut(target_orig);
            for a in 0..3 {
                let (j, k) = ((a + 1) % 3, (a + 2) % 3);
                out[a][a] += scale * (r[j] * r[j] + r[k] * r[k] - 2.0 * r[a] * r[a]);
                for b in (a + 1)..3 {
                    let off = -3.0 * scale * r[a] * r[b];
                    out[a][b] += off;
                    out[b][a] += off;
                }
            }
        }
    }
}

impl Quantity for TidalTensor<'_> {
    fn len(&self) -> usize {
        self.tensor.len()
    }

    fn two_sided_leaf(&self, tree: &Tree, node: usize, eps2: f64) {
        let n = tree.node(node);
        let (start, end) = n.range();
        let points = tree.points();
        let index = tree.index();
        for a in start..end {
            for b in (a + 1)..end {
                self.add(&points[a], index[a], &points[b], 1.0, eps2);
                self.add(&points[b], index[b], &points[a], 1.0, eps2);
            }
        }
    }

    fn one_sided_leaf(&self, source: &Tree, target: &Tree, source_node: usize, target_node: usize, eps2: f64) {
        let (ss, se) = source.node(source_node).range();
        let (ts, te) = target.node(target_node).range();
        for a in ts..te {
            for b in ss..se {
                self.add(&target.points()[a], target.index()[a], &source.points()[b], 1.0, eps2);
            }
        }
    }

    fn approximate(&self, source: &Tree, target: &Tree, source_node: usize, target_node: usize, eps2: f64) {
        let sn = source.node(source_node);
        let mass = sn.cardinality() as f64;
        let center = sn.center();
        let (ts, te) = target.node(target_node).range();
        for a in ts..te {
            self.add(&target.points()[a], target.index()[a], &center, mass, eps2);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::TreeOptions;
    use float_cmp::approx_eq;

    #[test]
    fn test_unsoftened_tensor_is_traceless() {
        // Laplace's equation: tr(T) == 0, since the per-axis numerators
        // sum to zero independent of the common eps-dependent scale.
        let points = vec![[0.0, 0.0, 0.0], [3.0, 1.0, -2.0]];
        let tree = Tree::build(&points, TreeOptions::new());
        let mut tensor = vec![[[0.0; 3]; 3]; 2];
        let mut quantity = TidalTensor::with_g(&mut tensor, 1.0);
        crate::evaluate(&tree, 0.0, &mut quantity);

        let trace: f64 = (0..3).map(|k| tensor[0][k][k]).sum();
        assert!(approx_eq!(f64, trace, 0.0, epsilon = 1e-9));
    }

    #[test]
    fn test_trace_is_zero_even_with_softening() {
        let points = vec![[0.0, 0.0, 0.0], [3.0, 1.0, -2.0]];
        let tree = Tree::build(&points, TreeOptions::new());
        let mut tensor = vec![[[0.0; 3]; 3]; 2];
        let mut quantity = TidalTensor::with_g(&mut tensor, 1.0);
        crate::evaluate(&tree, 0.5, &mut quantity);

        let trace: f64 = (0..3).map(|k| tensor[0][k][k]).sum();
        assert!(approx_eq!(f64, trace, 0.0, epsilon = 1e-9));
    }

    #[test]
    fn test_tensor_is_symmetric() {
        let points = vec![[0.0, 0.0, 0.0], [1.0, 2.0, 3.0]];
        let tree = Tree::build(&points, TreeOptions::new());
        let mut tensor = vec![[[0.0; 3]; 3]; 2];
        let mut quantity = TidalTensor::with_g(&mut tensor, 1.0);
        crate::evaluate(&tree, 0.1, &mut quantity);

        for a in 0..3 {
            for b in 0..3 {
                assert!(approx_eq!(f64, tensor[0][a][b], tensor[0][b][a], epsilon = 1e-9));
            }
        }
    }
}
