//! The tree builder: partitions a point cloud into a flat array of
//! [`Node`]s, each carrying the center of mass and the two squared radii
//! the dual walk needs.
//!
//! Child indices are stable under the `append` that grows the node
//! array, but a parent's node reference must not be held across its
//! child's recursive build call (which may reallocate that array) —
//! the parent is reacquired through its index afterward instead.

use crate::criterion::{self, OpeningCriterion};
use crate::options::TreeOptions;
use crate::point::{bounding_box, centroid, max_radius2, Point};

/// One node of a [`Tree`]'s flat node array. The root is always index 0.
#[derive(Debug, Clone, Copy)]
pub struct Node {
    center: Point,
    r_max2: f64,
    r_open2: f64,
    left: i64,
    right: i64,
    start: usize,
    end: usize,
    active: bool,
}

impl Node {
    fn blank(start: usize, end: usize) -> Self {
        Node {
            center: [0.0, 0.0, 0.0],
            r_max2: 0.0,
            r_open2: 0.0,
            left: -1,
            right: -1,
            start,
            end,
            active: true,
        }
    }

    /// Center of mass of the points in this node.
    pub fn center(&self) -> Point {
        self.center
    }

    /// Max squared distance from `center` to any point in the node.
    pub fn r_max2(&self) -> f64 {
        self.r_max2
    }

    /// Squared opening radius, per the tree's chosen criterion.
    pub fn r_open2(&self) -> f64 {
        self.r_open2
    }

    /// Half-open range `[start, end)` into the tree's point array.
    pub fn range(&self) -> (usize, usize) {
        (self.start, self.end)
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of points directly covered by this node's range.
    pub fn cardinality(&self) -> usize {
        self.end - self.start
    }

    pub fn is_leaf(&self) -> bool {
        self.left == -1
    }

    /// Index of the left child, or `None` for a leaf.
    pub fn left(&self) -> Option<usize> {
        (self.left != -1).then_some(self.left as usize)
    }

    /// Index of the right child, or `None` for a leaf.
    pub fn right(&self) -> Option<usize> {
        (self.right != -1).then_some(self.right as usize)
    }

    /// Whether this node currently participates in a walk. Only
    /// [`crate::target`]'s per-point target trees ever turn this off.
    pub fn is_active(&self) -> bool {
        self.active
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

/// Reusable storage for a [`Tree`] build, handed back by
/// [`Tree::into_buffers`] so a caller can avoid reallocating across
/// repeated builds (e.g. the per-iteration trees in [`crate::binding`]).
#[derive(Debug, Default)]
pub struct TreeBuffers {
    pub points: Vec<Point>,
    pub index: Vec<usize>,
    pub nodes: Vec<Node>,
}

/// An immutable k-d tree over a point cloud, built for gravitational
/// evaluation.
///
/// See the crate-level invariants: `points[start..end]` covers exactly
/// the subtree rooted at each node, `index` is a permutation of
/// `0..point_count()` with `points[i] == original[index[i]]`, and
/// non-leaf children partition their parent's range exactly.
#[derive(Debug)]
pub struct Tree {
    points: Vec<Point>,
    index: Vec<usize>,
    nodes: Vec<Node>,
    leaf_size: usize,
    criterion: OpeningCriterion,
    theta: f64,
}

impl Tree {
    /// Builds a tree over `points` using `options`, allocating fresh
    /// storage.
    pub fn build(points: &[Point], options: TreeOptions) -> Self {
        Self::build_with_buffers(points, options, TreeBuffers::default())
    }

    /// Builds a tree over `points` using `options`, reusing `buffers`'
    /// allocations where possible.
    pub fn build_with_buffers(points: &[Point], options: TreeOptions, mut buffers: TreeBuffers) -> Self {
        let n = points.len();

        buffers.points.clear();
        buffers.points.extend_from_slice(points);
        buffers.index.clear();
        buffers.index.extend(0..n);
        buffers.nodes.clear();

        let leaf_size = options.leaf_size();
        let criterion = options.criterion();
        let theta = options.theta();

        if n > 0 {
            let capacity = (2 * n).div_ceil(leaf_size.max(1));
            buffers.nodes.reserve(capacity);
            let span = bounding_box(&buffers.points);
            build_node(
                &mut buffers.points,
                &mut buffers.index,
                0,
                n,
                span,
                &mut buffers.nodes,
                leaf_size,
                criterion,
                theta,
            );
        }

        log::debug!("built tree over {n} points with {} nodes", buffers.nodes.len());

        Tree {
            points: buffers.points,
            index: buffers.index,
            nodes: buffers.nodes,
            leaf_size,
            criterion,
            theta,
        }
    }

    /// Builds a degenerate tree with one leaf per point and no
    /// subdivision: used by [`crate::target`] for target point sets that
    /// need per-point `active`/`update` control, which the recursive
    /// splitter in [`build_node`] can't guarantee under duplicate
    /// coordinates.
    pub(crate) fn singletons(points: &[Point]) -> Self {
        let n = points.len();
        let nodes = (0..n)
            .map(|i| Node {
                center: points[i],
                r_max2: 0.0,
                r_open2: 0.0,
                left: -1,
                right: -1,
                start: i,
                end: i + 1,
                active: true,
            })
            .collect();
        Tree {
            points: points.to_vec(),
            index: (0..n).collect(),
            nodes,
            leaf_size: 1,
            criterion: OpeningCriterion::default(),
            theta: 1.0,
        }
    }

    /// Discards the tree, returning its backing storage for reuse in a
    /// later build.
    pub fn into_buffers(self) -> TreeBuffers {
        TreeBuffers {
            points: self.points,
            index: self.index,
            nodes: self.nodes,
        }
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The root node's index, or `None` for an empty tree.
    pub fn root(&self) -> Option<usize> {
        (!self.nodes.is_empty()).then_some(0)
    }

    pub fn leaf_size(&self) -> usize {
        self.leaf_size
    }

    pub fn criterion(&self) -> OpeningCriterion {
        self.criterion
    }

    pub fn theta(&self) -> f64 {
        self.theta
    }

    pub fn node(&self, i: usize) -> &Node {
        &self.nodes[i]
    }

    pub(crate) fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// The permuted points, in the order a node's `[start, end)` range
    /// indexes into.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// `index()[i]` gives the original input position of `points()[i]`.
    pub fn index(&self) -> &[usize] {
        &self.index
    }

    /// Indices of every leaf node, in ascending node-index order. This
    /// is the order [`crate::walk::evaluate`] dispatches jobs in on a
    /// single thread, so sequential runs are deterministic and
    /// reproducible across test fixtures.
    pub fn leaves(&self) -> Vec<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_leaf())
            .map(|(i, _)| i)
            .collect()
    }

    pub(crate) fn set_node_active(&mut self, i: usize, active: bool) {
        self.nodes[i].set_active(active);
    }

    pub(crate) fn set_node_center(&mut self, i: usize, center: Point) {
        self.nodes[i].center = center;
    }

    /// Moves singleton node `i` (as built by [`Tree::singletons`]) to
    /// `point`, updating both the node's center and its backing point.
    pub(crate) fn update_singleton(&mut self, i: usize, point: Point) {
        let (start, end) = self.nodes[i].range();
        debug_assert_eq!(end - start, 1, "update_singleton requires a one-point node");
        self.points[start] = point;
        self.nodes[i].center = point;
    }
}

#[allow(clippy::too_many_arguments)]
fn build_node(
    points: &mut [Point],
    index: &mut [usize],
    start: usize,
    end: usize,
    span: [Point; 2],
    nodes: &mut Vec<Node>,
    leaf_size: usize,
    criterion: OpeningCriterion,
    theta: f64,
) -> usize {
    let node_idx = nodes.len();
    nodes.push(Node::blank(start, end));

    let slice = &points[start..end];
    let center = centroid(slice);
    let r_max2 = max_radius2(&center, slice);
    let r_open2 = criterion::r_open2(criterion, &center, r_max2, &span, slice, theta);

    nodes[node_idx].center = center;
    nodes[node_idx].r_max2 = r_max2;
    nodes[node_idx].r_open2 = r_open2;

    if end - start <= leaf_size {
        return node_idx;
    }

    let dim = criterion::choose_split_dimension(&span);
    let pivot = criterion::choose_pivot(&span, dim);
    let mid = crate::partition::partition(&mut points[start..end], &mut index[start..end], dim, pivot);

    // Degenerate split (all points equal along `dim`, or the midpoint
    // fell strictly to one side of every value): stop subdividing this
    // range rather than recursing forever.
    if mid == 0 || mid == end - start {
        return node_idx;
    }

    let mut left_span = span;
    left_span[1][dim] = pivot;
    let mut right_span = span;
    right_span[0][dim] = pivot;

    let left_idx = build_node(points, index, start, start + mid, left_span, nodes, leaf_size, criterion, theta);
    // Reacquire `node_idx` through the array rather than holding a
    // reference across the recursive call above, which may have
    // reallocated `nodes`.
    nodes[node_idx].left = left_idx as i64;

    let right_idx = build_node(points, index, start + mid, end, right_span, nodes, leaf_size, criterion, theta);
    nodes[node_idx].right = right_idx as i64;

    node_idx
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    fn four_square() -> Vec<Point> {
        vec![[1.0, 1.0, 0.0], [1.0, -1.0, 0.0], [-1.0, 1.0, 0.0], [-1.0, -1.0, 0.0]]
    }

    #[test]
    fn test_empty_tree() {
        let tree = Tree::build(&[], TreeOptions::new());
        assert!(tree.is_empty());
        assert_eq!(tree.node_count(), 0);
        assert_eq!(tree.root(), None);
    }

    #[test]
    fn test_four_point_square() {
        let points = four_square();
        let options = TreeOptions::new().with_leaf_size(1).unwrap();
        let tree = Tree::build(&points, options);

        let root = tree.node(tree.root().unwrap());
        assert!(approx_eq!(f64, root.center()[0], 0.0, epsilon = 1e-12));
        assert!(approx_eq!(f64, root.center()[1], 0.0, epsilon = 1e-12));
        assert!(approx_eq!(f64, root.r_max2(), 2.0, epsilon = 1e-12));
    }

    #[test]
    fn test_permutation_integrity() {
        let points = four_square();
        let options = TreeOptions::new().with_leaf_size(1).unwrap();
        let tree = Tree::build(&points, options);

        let mut seen: Vec<Point> = tree.points().to_vec();
        seen.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let mut expected = points.clone();
        expected.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(seen, expected);

        for (i, &orig) in tree.index().iter().enumerate() {
            assert_eq!(tree.points()[i], points[orig]);
        }
    }

    #[test]
    fn test_range_coverage() {
        let points: Vec<Point> = (0..37).map(|i| [i as f64, 0.0, 0.0]).collect();
        let options = TreeOptions::new().with_leaf_size(4).unwrap();
        let tree = Tree::build(&points, options);

        fn check(tree: &Tree, i: usize) {
            let node = tree.node(i);
            if let (Some(l), Some(r)) = (node.left(), node.right()) {
                let (ls, le) = tree.node(l).range();
                let (rs, re) = tree.node(r).range();
                assert_eq!(le, rs, "children ranges must be contiguous");
                assert_eq!((ls, re), node.range(), "children ranges must union to the parent's");
                check(tree, l);
                check(tree, r);
            }
        }
        check(&tree, tree.root().unwrap());
    }

    #[test]
    fn test_center_and_rmax_consistency() {
        let points: Vec<Point> = (0..50)
            .map(|i| [(i as f64).sin(), (i as f64).cos(), (i as f64) * 0.1])
            .collect();
        let options = TreeOptions::new().with_leaf_size(5).unwrap();
        let tree = Tree::build(&points, options);

        for node in tree.nodes() {
            let (s, e) = node.range();
            let slice = &tree.points()[s..e];
            let center = centroid(slice);
            for k in 0..3 {
                assert!(approx_eq!(f64, center[k], node.center()[k], epsilon = 1e-9));
            }
            let r_max2 = max_radius2(&center, slice);
            assert!(approx_eq!(f64, r_max2, node.r_max2(), epsilon = 1e-9));
        }
    }

    #[test]
    fn test_degenerate_all_equal_points() {
        let points: Vec<Point> = (0..20).map(|_| [1.0, 2.0, 3.0]).collect();
        let options = TreeOptions::new().with_leaf_size(4).unwrap();
        let tree = Tree::build(&points, options);
        // Must terminate and leave the root (or some ancestor) as a leaf
        // rather than recursing forever.
        assert!(tree.node_count() >= 1);
        assert_eq!(tree.point_count(), 20);
    }

    #[test]
    fn test_leaf_size_respected() {
        let points: Vec<Point> = (0..200).map(|i| [(i as f64) * 0.37 % 10.0, 0.0, 0.0]).collect();
        let options = TreeOptions::new().with_leaf_size(16).unwrap();
        let tree = Tree::build(&points, options);
        for node in tree.nodes() {
            if node.is_leaf() {
                assert!(node.cardinality() <= 16);
            }
        }
    }

    #[test]
    fn test_buffer_reuse() {
        let points = four_square();
        let tree = Tree::build(&points, TreeOptions::new().with_leaf_size(1).unwrap());
        let node_count = tree.node_count();
        let buffers = tree.into_buffers();
        assert_eq!(buffers.points.len(), 4);

        let tree2 = Tree::build_with_buffers(&points, TreeOptions::new().with_leaf_size(1).unwrap(), buffers);
        assert_eq!(tree2.node_count(), node_count);
    }
}
