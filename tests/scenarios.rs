mod common;

use common::check_tree;
use rand::{rngs::StdRng, Rng, SeedableRng};
use sstree::{Fanout, SsTree};

#[test]
fn three_points_then_split() {
    let mut tree = SsTree::new([0.0, 0.0]).unwrap();
    tree.insert([1.0, 1.0]).unwrap();
    tree.insert([2.0, 2.0]).unwrap();

    // One leaf root holding all three points
    let root = tree.root();
    assert!(root.is_leaf());
    assert_eq!(root.len(), 3);
    assert_eq!(root.centroid(), &[1.0, 1.0]);
    assert!((root.radius() - 2.0_f64.sqrt()).abs() < 1e-12);

    // The fourth point overflows the root
    tree.insert([10.0, 10.0]).unwrap();
    let root = tree.root();
    assert!(!root.is_leaf());
    assert_eq!(root.len(), 2);
    for child in root.children() {
        assert!(child.is_leaf());
        assert_eq!(child.len(), 2);
    }
    check_tree(&tree);
}

#[test]
fn duplicates_are_ignored() {
    let mut tree = SsTree::new([0.0, 0.0]).unwrap();
    for _ in 0..3 {
        tree.insert([1.0, 2.0]).unwrap();
        tree.insert([0.0, 0.0]).unwrap();
    }
    assert_eq!(tree.len(), 2);

    // Also once the tree has grown
    for i in 0..10 {
        tree.insert([f64::from(i), 5.0]).unwrap();
    }
    let len = tree.len();
    for i in 0..10 {
        tree.insert([f64::from(i), 5.0]).unwrap();
    }
    assert_eq!(tree.len(), len);
    check_tree(&tree);
}

#[test]
fn delete_from_line() {
    let mut tree = SsTree::new([0.0, 0.0]).unwrap();
    for x in 1..5 {
        tree.insert([f64::from(x), 0.0]).unwrap();
    }
    assert_eq!(tree.height(), 2);
    check_tree(&tree);

    // Remove the middle point
    assert!(tree.delete(&[2.0, 0.0]));
    check_tree(&tree);
    assert_eq!(tree.len(), 4);

    // The left leaf underflows and, with no sibling to spare an entry, merges
    assert!(tree.delete(&[1.0, 0.0]));
    check_tree(&tree);
    assert_eq!(tree.height(), 1);
    assert_eq!(tree.points(), vec![[0.0, 0.0], [3.0, 0.0], [4.0, 0.0]]);
}

#[test]
fn delete_last_point() {
    let mut tree = SsTree::new([4.0, 2.0]).unwrap();
    assert!(!tree.delete(&[2.0, 4.0]));
    assert!(tree.delete(&[4.0, 2.0]));

    // The root stays an empty leaf
    assert!(tree.is_empty());
    assert!(tree.root().is_leaf());
    assert_eq!(tree.height(), 1);
    let (nodes, points) = tree.dfs();
    assert_eq!(nodes.len(), 1);
    assert!(points.is_empty());
}

#[test]
fn round_trip() {
    let mut rng = StdRng::seed_from_u64(7);
    let points = (0..150)
        .map(|_| [rng.gen_range(-50.0..50.0), rng.gen_range(-50.0..50.0)])
        .collect::<Vec<[f64; 2]>>();

    let mut tree = SsTree::new(points[0]).unwrap();
    for point in &points {
        tree.insert(*point).unwrap();
    }
    assert_eq!(tree.len(), points.len());
    check_tree(&tree);

    for point in &points {
        assert!(tree.search(point).is_some());
    }

    // Delete from both ends towards the middle
    let mut remaining = points.clone();
    while !remaining.is_empty() {
        let point = if remaining.len() % 2 == 0 {
            remaining.remove(0)
        } else {
            remaining.pop().unwrap()
        };
        assert!(tree.delete(&point));
        assert!(tree.search(&point).is_none());
        assert_eq!(tree.len(), remaining.len());
        check_tree(&tree);
    }

    let (_, points) = tree.dfs();
    assert!(points.is_empty());
}

#[test]
fn insertion_target() {
    let mut tree = SsTree::new([0.0, 0.0]).unwrap();
    for p in [[1.0, 0.0], [10.0, 0.0], [11.0, 0.0]] {
        tree.insert(p).unwrap();
    }

    // The leaf an insertion would descend to is the nearest one
    let leaf = tree.parent_leaf(&[2.0, 0.0]);
    assert_eq!(leaf.points(), &[[0.0, 0.0], [1.0, 0.0]]);
    let leaf = tree.parent_leaf(&[8.0, 3.0]);
    assert_eq!(leaf.points(), &[[10.0, 0.0], [11.0, 0.0]]);

    tree.insert([2.0, 0.0]).unwrap();
    let leaf = tree.search(&[2.0, 0.0]).unwrap();
    assert_eq!(leaf.len(), 3);
}

// `search` only descends into spheres whose `distance <= radius`, so a point
// lying exactly on a boundary can be missed when rounding pushes its distance
// just past the radius. Coordinates here keep every distance exact.
#[test]
fn point_on_boundary() {
    let mut tree = SsTree::new([0.0, 0.0]).unwrap();
    tree.insert([2.0, 0.0]).unwrap();
    let root = tree.root();
    assert_eq!(root.centroid(), &[1.0, 0.0]);
    assert_eq!(root.radius(), 1.0);
    assert!(tree.search(&[2.0, 0.0]).is_some());
    assert!(tree.search(&[0.0, 0.0]).is_some());

    // Two levels: [4, 0] sits on the boundary of its leaf and of the root
    for x in [1.0, 3.0, 4.0] {
        tree.insert([x, 0.0]).unwrap();
    }
    let root = tree.root();
    assert_eq!(tree.height(), 2);
    assert_eq!(root.centroid(), &[1.75, 0.0]);
    assert_eq!(root.radius(), 2.25);
    let leaf = tree.search(&[4.0, 0.0]).unwrap();
    assert_eq!(leaf.points(), &[[2.0, 0.0], [3.0, 0.0], [4.0, 0.0]]);
    assert_eq!(leaf.radius(), 1.0);
    assert!(tree.search(&[0.0, 0.0]).is_some());
    check_tree(&tree);
}

#[test]
fn wider_fanout() {
    let fanout = Fanout::new(4, 9).unwrap();
    let mut tree = SsTree::with_fanout([0.0, 0.0, 0.0], fanout).unwrap();
    for i in 1..200 {
        let t = f64::from(i);
        tree.insert([t.sin() * t, t.cos() * t, t * 0.5]).unwrap();
        check_tree(&tree);
    }
    assert_eq!(tree.len(), 200);
    assert!(tree.height() >= 3);
    for i in (0..200).step_by(3) {
        let t = f64::from(i);
        assert!(tree.delete(&[t.sin() * t, t.cos() * t, t * 0.5]));
        check_tree(&tree);
    }
    assert_eq!(tree.len(), 200 - 67);
}
