//! Gravitational acceleration, under the same unit-point-mass
//! convention as [`super::Potential`].

use crate::point::{distance2, Point};
use crate::quantity::Quantity;
use crate::scratch::DisjointMut;
use crate::tree::Tree;

/// Accumulates softened acceleration
/// `a_i = G * sum_{j != i} m_j * (x_j - x_i) / (r_ij^2 + eps^2)^(3/2)`
/// into a caller-owned buffer, indexed by original point position.
pub struct Acceleration<'a> {
    acc: DisjointMut<'a, Point>,
    g: f64,
}

impl<'a> Acceleration<'a> {
    /// Uses the unit convention `G * m_particle = 1`.
    pub fn new(acc: &'a mut [Point]) -> Self {
        Self::with_g(acc, 1.0)
    }

    /// Uses an explicit `g`.
    pub fn with_g(acc: &'a mut [Point], g: f64) -> Self {
        Acceleration { acc: DisjointMut::new(acc), g }
    }

    /// Adds the pull of `mass` sitting at `source` onto the point `target`
    /// (original index `target_orig`).
    fn pull(&self, target: &Point, target_orig: usize, source: &Point, mass: f64, eps2: f64) {
        let r2 = distance2(target, source) + eps2;
        if r2 == 0.0 {
            return;
        }
        let inv_r3 = self.g * mass / (r2 * r2.sqrt());
        unsafe {
            let out = self.acc.get_mut(target_orig);
            for k in 0..3 {
                out[k] += inv_r3 * (source[k] - target[k]);
            }
        }
    }
}

impl Quantity for Acceleration<'_> {
    fn len(&self) -> usize {
        self.acc.len()
    }

    fn two_sided_leaf(&self, tree: &Tree, node: usize, eps2: f64) {
        let n = tree.node(node);
        let (start, end) = n.range();
        let points = tree.points();
        let index = tree.index();
        for a in start..end {
            for b in (a + 1)..end {
                self.pull(&points[a], index[a], &points[b], 1.0, eps2);
                self.pull(&points[b], index[b], &points[a], 1.0, eps2);
            }
        }
    }

    fn one_sided_leaf(&self, source: &Tree, target: &Tree, source_node: usize, target_node: usize, eps2: f64) {
        let (ss, se) = source.node(source_node).range();
        let (ts, te) = target.node(target_node).range();
        for a in ts..te {
            for b in ss..se {
                self.pull(&target.points()[a], target.index()[a], &source.points()[b], 1.0, eps2);
            }
        }
    }

    fn approximate(&self, source: &Tree, target: &Tree, source_node: usize, target_node: usize, eps2: f64) {
        let sn = source.node(source_node);
        let mass = sn.cardinality() as f64;
        let center = sn.center();
        let (ts, te) = target.node(target_node).range();
        for a in ts..te {
            self.pull(&target.points()[a], target.index()[a], &center, mass, eps2);
        }
    }
}
