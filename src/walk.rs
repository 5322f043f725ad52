//! The dual-tree walk: for every leaf of a target tree, recurse down a
//! source tree choosing between the exact pairwise kernel, the exact
//! one-sided kernel, and the monopole approximation.
//!
//! Leaf jobs are dispatched through [`crate::parallel`]; distinct target
//! leaves never touch the same output index, so no job needs to wait on
//! another.

use crate::point::distance2;
use crate::quantity::Quantity;
use crate::tree::Tree;

/// Whether `source_node` is far enough from (or close enough to)
/// `target_node` that the monopole approximation applies, rather than
/// an exact pairwise evaluation.
fn use_approximation(source: &Tree, target: &Tree, source_node: usize, target_node: usize, eps2: f64) -> bool {
    let s = source.node(source_node);
    let t = target.node(target_node);
    let dx2 = distance2(&s.center(), &t.center());
    dx2 > t.r_max2() + s.r_open2() || dx2 < eps2
}

fn walk_self<Q: Quantity>(tree: &Tree, node: usize, leaf: usize, eps2: f64, quantity: &Q) {
    if node == leaf {
        quantity.two_sided_leaf(tree, leaf, eps2);
        return;
    }
    if use_approximation(tree, tree, node, leaf, eps2) {
        quantity.approximate(tree, tree, node, leaf, eps2);
        return;
    }
    let n = tree.node(node);
    if n.is_leaf() {
        quantity.one_sided_leaf(tree, tree, node, leaf, eps2);
        return;
    }
    walk_self(tree, n.left().expect("non-leaf node must have a left child"), leaf, eps2, quantity);
    walk_self(tree, n.right().expect("non-leaf node must have a right child"), leaf, eps2, quantity);
}

fn walk_cross<Q: Quantity>(source: &Tree, target: &Tree, node: usize, leaf: usize, eps2: f64, quantity: &Q) {
    if use_approximation(source, target, node, leaf, eps2) {
        quantity.approximate(source, target, node, leaf, eps2);
        return;
    }
    let n = source.node(node);
    if n.is_leaf() {
        quantity.one_sided_leaf(source, target, node, leaf, eps2);
        return;
    }
    walk_cross(source, target, n.left().expect("non-leaf node must have a left child"), leaf, eps2, quantity);
    walk_cross(source, target, n.right().expect("non-leaf node must have a right child"), leaf, eps2, quantity);
}

/// Evaluates `quantity` over `tree` against itself: every point feels
/// every other point, exactly at close range and via the monopole
/// approximation beyond the opening criterion.
///
/// `quantity.len()` must equal `tree.point_count()`.
pub fn evaluate<Q: Quantity>(tree: &Tree, eps: f64, quantity: &Q) {
    assert_eq!(
        quantity.len(),
        tree.point_count(),
        "quantity is sized for {} points but tree has {}",
        quantity.len(),
        tree.point_count()
    );
    let Some(root) = tree.root() else { return };
    let eps2 = eps * eps;
    let leaves = tree.leaves();
    crate::parallel::for_each(&leaves, |&leaf| {
        if tree.node(leaf).is_active() {
            walk_self(tree, root, leaf, eps2, quantity);
        }
    });
}

/// Evaluates `quantity` over `target` due to `source`: every target
/// point feels every source point, but source points never feel
/// anything back and never feel each other.
///
/// `quantity.len()` must equal `target.point_count()`.
pub fn evaluate_at<Q: Quantity>(source: &Tree, target: &Tree, eps: f64, quantity: &Q) {
    assert_eq!(
        quantity.len(),
        target.point_count(),
        "quantity is sized for {} points but target tree has {}",
        quantity.len(),
        target.point_count()
    );
    let (Some(source_root), Some(_)) = (source.root(), target.root()) else { return };
    let eps2 = eps * eps;
    let leaves = target.leaves();
    crate::parallel::for_each(&leaves, |&leaf| {
        if target.node(leaf).is_active() {
            walk_cross(source, target, source_root, leaf, eps2, quantity);
        }
    });
}
