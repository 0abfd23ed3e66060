use sstree::{distance, Node, SsTree};

const TOLERANCE: f64 = 1e-9;

/// Checks the envelope of every node, the fanout of every non-root node, and
/// that all leaves sit at the same depth.
pub fn check_tree<const D: usize>(tree: &SsTree<D>) {
    let fanout = tree.fanout();
    let mut leaf_depths = Vec::new();
    let mut stack = vec![(0, tree.root())];
    while let Some((depth, node)) = stack.pop() {
        check_envelope(node);
        if depth > 0 {
            assert!(node.len() >= fanout.min_entries(), "underfull node {node}");
            assert!(node.len() <= fanout.max_entries(), "overfull node {node}");
        }
        if node.is_leaf() {
            assert!(node.children().is_empty());
            leaf_depths.push(depth);
        } else {
            assert!(node.points().is_empty());
        }
        for child in node.children() {
            stack.push((depth + 1, child));
        }
    }
    assert!(leaf_depths.windows(2).all(|w| w[0] == w[1]));
}

/// The sphere of `node` matches its entries: centroid is their mean, the
/// radius is the largest covering distance, and each child sphere is inside.
pub fn check_envelope<const D: usize>(node: &Node<D>) {
    if node.is_empty() {
        return;
    }

    let mut positions = node.points().to_vec();
    positions.extend(node.children().iter().map(|c| *c.centroid()));
    let count = positions.len() as f64;
    for axis in 0..D {
        let mean = positions.iter().map(|p| p[axis]).sum::<f64>() / count;
        assert!((node.centroid()[axis] - mean).abs() < TOLERANCE);
    }

    let mut radius: f64 = 0.0;
    for point in node.points() {
        let d = distance(node.centroid(), point);
        assert!(d <= node.radius() + TOLERANCE);
        radius = radius.max(d);
    }
    for child in node.children() {
        let d = distance(node.centroid(), child.centroid()) + child.radius();
        assert!(node.sphere().encloses(child.sphere(), TOLERANCE));
        radius = radius.max(d);
    }
    assert!((node.radius() - radius).abs() < TOLERANCE);
}
