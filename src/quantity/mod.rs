//! The kernel interface the dual walk ([`crate::walk`]) dispatches
//! through, plus the three concrete kernels built on top of it.
//!
//! Methods accumulate into storage the implementor owns, because the
//! walk calls them from many leaf jobs that must all be able to write
//! concurrently.

mod acceleration;
mod potential;
mod tidal;

pub use acceleration::Acceleration;
pub use potential::Potential;
pub use tidal::TidalTensor;

use crate::tree::Tree;

/// A quantity accumulated over a tree's points by the dual walk.
///
/// Implementors own their output storage and must be safe to call from
/// multiple threads concurrently, provided distinct calls never target
/// the same underlying point. [`crate::walk::evaluate`] and
/// [`crate::walk::evaluate_at`] uphold that by construction: every
/// concurrently-running job walks a different leaf of the *target*
/// tree, and target leaves partition the point array disjointly.
///
/// The three methods mirror the three interaction kernels the dual walk
/// dispatches between: two points close enough that both need the exact
/// pairwise term, one point evaluated exactly against a group it isn't
/// part of, and one point evaluated against a distant group's monopole.
pub trait Quantity: Sync {
    /// Number of points this quantity is sized for; must equal the
    /// evaluated tree's `point_count()`.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Exact pairwise interaction between every pair of distinct points
    /// in `tree`'s node `node` (which must be a leaf), softened by
    /// `eps2`. Called only by the single-tree walk
    /// ([`crate::walk::evaluate`]); cross-tree walks never call this,
    /// since source and target points are never the same point there.
    fn two_sided_leaf(&self, tree: &Tree, node: usize, eps2: f64);

    /// Exact contribution of every point in `source`'s node
    /// `source_node` (a leaf) on every point in `target`'s node
    /// `target_node` (a leaf), without the reflexive update
    /// `two_sided_leaf` would also apply to the source points.
    fn one_sided_leaf(&self, source: &Tree, target: &Tree, source_node: usize, target_node: usize, eps2: f64);

    /// Monopole-approximated contribution of `source`'s node
    /// `source_node` (any node, leaf or internal) on every point in
    /// `target`'s node `target_node` (a leaf).
    fn approximate(&self, source: &Tree, target: &Tree, source_node: usize, target_node: usize, eps2: f64);
}

/// The next multipole order past the monopole kernels above; kept as a
/// named, unreachable slot rather than silently dropped.
#[allow(dead_code)]
pub(crate) struct Quadrupole;

impl Quadrupole {
    #[allow(dead_code)]
    pub(crate) fn moment(&self, _tree: &Tree, _node: usize) -> [[f64; 3]; 3] {
        todo!("quadrupole moments are not implemented")
    }
}
