//! Gravitational potential, assuming every point carries unit mass;
//! per-particle mass only reenters at [`crate::binding`]'s level, where
//! all particles share one mass.

use crate::point::distance2;
use crate::quantity::Quantity;
use crate::scratch::DisjointMut;
use crate::tree::Tree;

/// Accumulates softened potential `phi[i] = -G * sum_{j != i} 1 / sqrt(r_ij^2 + eps^2)`
/// into a caller-owned buffer, indexed by original point position.
pub struct Potential<'a> {
    phi: DisjointMut<'a, f64>,
    g: f64,
}

impl<'a> Potential<'a> {
    /// Uses the unit convention `G * m_particle = 1`. Per-particle mass
    /// and any physical `G` only reenter at [`crate::binding`]'s level.
    pub fn new(phi: &'a mut [f64]) -> Self {
        Self::with_g(phi, 1.0)
    }

    /// Uses an explicit `g`.
    pub fn with_g(phi: &'a mut [f64], g: f64) -> Self {
        Potential { phi: DisjointMut::new(phi), g }
    }

    fn add(&self, i: usize, j: usize, tree: &Tree, other: &Tree, eps2: f64) {
        let pi = tree.points()[i];
        let pj = other.points()[j];
        let r2 = distance2(&pi, &pj) + eps2;
        if r2 == 0.0 {
            return;
        }
        let contribution = -self.g / r2.sqrt();
        let oi = tree.index()[i];
        unsafe {
            *self.phi.get_mut(oi) += contribution;
        }
    }
}

impl Quantity for Potential<'_> {
    fn len(&self) -> usize {
        self.phi.len()
    }

    fn two_sided_leaf(&self, tree: &Tree, node: usize, eps2: f64) {
        let n = tree.node(node);
        let (start, end) = n.range();
        for a in start..end {
            for b in (a + 1)..end {
                self.add(a, b, tree, tree, eps2);
                self.add(b, a, tree, tree, eps2);
            }
        }
    }

    fn one_sided_leaf(&self, source: &Tree, target: &Tree, source_node: usize, target_node: usize, eps2: f64) {
        let (ss, se) = source.node(source_node).range();
        let (ts, te) = target.node(target_node).range();
        for a in ts..te {
            for b in ss..se {
                self.add(a, b, target, source, eps2);
            }
        }
    }

    fn approximate(&self, source: &Tree, target: &Tree, source_node: usize, target_node: usize, eps2: f64) {
        let sn = source.node(source_node);
        let mass = sn.cardinality() as f64;
        let center = sn.center();
        let (ts, te) = target.node(target_node).range();
        for a in ts..te {
            let pa = target.points()[a];
            let r2 = distance2(&pa, &center) + eps2;
            if r2 == 0.0 {
                continue;
            }
            let oi = target.index()[a];
            unsafe {
                *self.phi.get_mut(oi) += -self.g * mass / r2.sqrt();
            }
        }
    }
}
