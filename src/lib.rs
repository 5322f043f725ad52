//! gravkd: a gravitational k-d tree for Newtonian potential, acceleration,
//! and tidal-tensor evaluation over equal-mass point clouds.
//!
//! The core is a dual-tree walk (`walk`) that collapses distant
//! point-to-cluster interactions into a monopole term once a node pair
//! passes one of three opening criteria (`criterion`). Three quantities
//! (`quantity::{Potential, Acceleration, TidalTensor}`) plug into that
//! walk. A `rayon`-backed worker pool (`parallel`) partitions the leaves
//! of the target tree across threads, and `binding` sits atop the tree
//! as an iterative unbinding driver.

mod constants;
mod criterion;
mod error;
mod helpers;
mod options;
mod partition;
mod point;
mod scratch;
mod tree;
mod walk;

pub mod binding;
pub mod brute_force;
pub mod parallel;
pub mod quantity;
pub mod target;

pub use constants::GRAVITATIONAL_CONSTANT_KPC_MSUN_KMS;
pub use criterion::OpeningCriterion;
pub use error::ConfigError;
pub use options::TreeOptions;
pub use point::Point;
pub use quantity::Quantity;
pub use tree::{Node, Tree};

/// Builds a [`Tree`] over `points` using `options`.
///
/// Empty input produces an empty tree (no nodes, no root).
pub fn build_tree(points: &[Point], options: TreeOptions) -> Tree {
    Tree::build(points, options)
}

/// Runs the single-tree dual walk, writing the result into `quantity`.
///
/// # Panics
///
/// Panics if `quantity.len() != tree.point_count()`.
pub fn evaluate<Q: Quantity>(tree: &Tree, eps: f64, quantity: &mut Q) {
    walk::evaluate(tree, eps, quantity)
}

/// Runs the cross-tree dual walk, sampling `source`'s field at `target`'s
/// points and writing the result into `quantity`.
///
/// # Panics
///
/// Panics if `quantity.len() != target.point_count()`.
pub fn evaluate_at<Q: Quantity>(source: &Tree, target: &Tree, eps: f64, quantity: &mut Q) {
    walk::evaluate_at(source, target, eps, quantity)
}
