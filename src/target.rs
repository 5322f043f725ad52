//! A mutable set of query points for repeated [`crate::evaluate_at`]
//! calls against a fixed source tree — e.g. tracer particles sampled at
//! every timestep of a simulation whose source distribution is rebuilt
//! separately.
//!
//! A flat per-point structure rather than a k-d subdivision, since the
//! cross-tree walk only needs *source*-side spatial structure — the
//! target side is just a list of leaf jobs to dispatch.

use crate::point::Point;
use crate::tree::Tree;

/// Wraps a [`Tree`] built with [`Tree::singletons`] so every point is
/// its own leaf, letting callers update positions or disable points
/// between evaluations without rebuilding anything.
pub struct Target {
    tree: Tree,
}

impl Target {
    /// Builds a target set over `points`, all initially active.
    pub fn new(points: &[Point]) -> Self {
        Target { tree: Tree::singletons(points) }
    }

    /// The underlying tree, to pass as the `target` argument of
    /// [`crate::evaluate_at`].
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn point_count(&self) -> usize {
        self.tree.point_count()
    }

    /// Moves point `i` to `point`. Panics if `i >= point_count()`.
    pub fn update(&mut self, i: usize, point: Point) {
        self.tree.update_singleton(i, point);
    }

    /// Enables or disables point `i`. A disabled point is skipped
    /// entirely by [`crate::evaluate_at`] — its output slot is left
    /// untouched, not zeroed.
    pub fn set_active(&mut self, i: usize, active: bool) {
        self.tree.set_node_active(i, active);
    }
}
