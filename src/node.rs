use std::fmt;

use ordered_float::OrderedFloat;
#[cfg(feature = "tracing")]
use tracing::{event, Level};

use crate::{
    distance::distance,
    sphere::{Bounded, Sphere},
    sstree::Fanout,
    stats::{max_variance_axis, min_variance_split},
};

/// What a node holds: points (leaf) or child nodes (internal).
#[derive(Clone, Debug, PartialEq)]
pub enum Entries<const D: usize> {
    Points(Vec<[f64; D]>),
    Children(Vec<Node<D>>),
}

/// A single entry moved from one node to another while rebalancing.
enum Entry<const D: usize> {
    Point([f64; D]),
    Child(Node<D>),
}

impl<const D: usize> Entries<D> {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Entries::Points(points) => points.len(),
            Entries::Children(children) => children.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Representative position of every entry, in order.
    fn positions(&self) -> Vec<[f64; D]> {
        match self {
            Entries::Points(points) => points.clone(),
            Entries::Children(children) => children.iter().map(|c| *c.centroid()).collect(),
        }
    }

    fn remove(&mut self, index: usize) -> Entry<D> {
        match self {
            Entries::Points(points) => Entry::Point(points.remove(index)),
            Entries::Children(children) => Entry::Child(children.remove(index)),
        }
    }

    fn push(&mut self, entry: Entry<D>) {
        match (self, entry) {
            (Entries::Points(points), Entry::Point(point)) => points.push(point),
            (Entries::Children(children), Entry::Child(child)) => children.push(child),
            (Entries::Points(_), Entry::Child(_)) => {
                panic!("corrupted tree: cannot move a child node into a leaf")
            }
            (Entries::Children(_), Entry::Point(_)) => {
                panic!("corrupted tree: cannot move a point into an internal node")
            }
        }
    }

    fn split(self, min_entries: usize) -> (Entries<D>, Entries<D>) {
        match self {
            Entries::Points(points) => {
                let (left, right) = split_entries::<_, D>(points, min_entries);
                (Entries::Points(left), Entries::Points(right))
            }
            Entries::Children(children) => {
                let (left, right) = split_entries::<_, D>(children, min_entries);
                (Entries::Children(left), Entries::Children(right))
            }
        }
    }
}

/// Sorts the entries along their axis of maximum variance and cuts them where
/// the two runs have the smallest summed variance.
fn split_entries<E: Bounded<D>, const D: usize>(
    mut entries: Vec<E>,
    min_entries: usize,
) -> (Vec<E>, Vec<E>) {
    let positions = entries.iter().map(|e| *e.center()).collect::<Vec<_>>();
    let axis = max_variance_axis(&positions);

    entries.sort_by_key(|e| OrderedFloat(e.center()[axis]));
    let values = entries.iter().map(|e| e.center()[axis]).collect::<Vec<_>>();
    let index = min_variance_split(&values, min_entries).min(entries.len());

    let right = entries.split_off(index);
    (entries, right)
}

/// A node of the tree together with its bounding sphere.
///
/// The sphere is recomputed by every mutation before the node is handed back
/// to its parent, so readers never see stale geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct Node<const D: usize> {
    sphere: Sphere<D>,
    entries: Entries<D>,
}

impl<const D: usize> Bounded<D> for Node<D> {
    fn center(&self) -> &[f64; D] {
        &self.sphere.center
    }

    fn radius(&self) -> f64 {
        self.sphere.radius
    }
}

impl<const D: usize> Node<D> {
    #[must_use]
    pub fn leaf(points: Vec<[f64; D]>) -> Node<D> {
        Self::from_entries(Entries::Points(points))
    }

    #[must_use]
    pub fn internal(children: Vec<Node<D>>) -> Node<D> {
        Self::from_entries(Entries::Children(children))
    }

    fn from_entries(entries: Entries<D>) -> Node<D> {
        let mut node = Node {
            sphere: Sphere::default(),
            entries,
        };
        node.reshape();
        node
    }

    #[must_use]
    pub fn sphere(&self) -> &Sphere<D> {
        &self.sphere
    }

    #[must_use]
    pub fn centroid(&self) -> &[f64; D] {
        &self.sphere.center
    }

    #[must_use]
    pub fn radius(&self) -> f64 {
        self.sphere.radius
    }

    #[must_use]
    pub fn entries(&self) -> &Entries<D> {
        &self.entries
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self.entries, Entries::Points(_))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Points stored directly in this node (empty for internal nodes).
    #[must_use]
    pub fn points(&self) -> &[[f64; D]] {
        match &self.entries {
            Entries::Points(points) => points,
            Entries::Children(_) => &[],
        }
    }

    /// Child nodes (empty for leaves).
    #[must_use]
    pub fn children(&self) -> &[Node<D>] {
        match &self.entries {
            Entries::Points(_) => &[],
            Entries::Children(children) => children,
        }
    }

    /// Number of levels from this node down to its leaves, leaves being 1.
    #[must_use]
    pub fn height(&self) -> usize {
        self.children()
            .iter()
            .fold(0, |max, child| max.max(child.height()))
            + 1
    }

    // Detach the single child of an internal node
    pub(crate) fn take_only_child(&mut self) -> Option<Node<D>> {
        match &mut self.entries {
            Entries::Children(children) if children.len() == 1 => children.pop(),
            _ => None,
        }
    }

    // Recompute the sphere from the current entries
    fn reshape(&mut self) {
        self.sphere = match &self.entries {
            Entries::Points(points) => Sphere::enclosing(points),
            Entries::Children(children) => Sphere::enclosing(children),
        };
    }

    /// Inserts `point` below this node. Returns the two replacement nodes when
    /// this node overflowed and had to be split.
    pub(crate) fn insert(
        &mut self,
        point: [f64; D],
        fanout: Fanout,
    ) -> Option<(Node<D>, Node<D>)> {
        match &mut self.entries {
            Entries::Points(points) => {
                if points.contains(&point) {
                    return None;
                }
                points.push(point);
            }
            Entries::Children(children) => {
                let closest = closest_child(children, &point);
                let Some((left, right)) = children[closest].insert(point, fanout) else {
                    self.reshape();
                    return None;
                };
                children.remove(closest);
                children.push(left);
                children.push(right);
            }
        }

        self.reshape();
        if self.len() > fanout.max_entries {
            return Some(self.split(fanout));
        }
        None
    }

    // Move all entries into two new nodes of the same kind, leaving this one empty
    fn split(&mut self, fanout: Fanout) -> (Node<D>, Node<D>) {
        let entries = std::mem::replace(&mut self.entries, Entries::Points(Vec::new()));
        let (left, right) = entries.split(fanout.min_entries);
        let left = Node::from_entries(left);
        let right = Node::from_entries(right);

        #[cfg(feature = "tracing")]
        event!(
            Level::TRACE,
            leaf = left.is_leaf(),
            left = left.len(),
            right = right.len(),
            "split node"
        );

        (left, right)
    }

    /// Leaf holding `target`. Only children whose sphere contains the target
    /// are explored, so a point sitting exactly on a boundary may be missed
    /// through rounding.
    #[must_use]
    pub fn search(&self, target: &[f64; D]) -> Option<&Node<D>> {
        match &self.entries {
            Entries::Points(points) => points.contains(target).then_some(self),
            Entries::Children(children) => children
                .iter()
                .filter(|child| child.sphere.contains(target))
                .find_map(|child| child.search(target)),
        }
    }

    /// Leaf an insertion of `target` would descend to.
    #[must_use]
    pub fn parent_leaf(&self, target: &[f64; D]) -> &Node<D> {
        match &self.entries {
            Entries::Points(_) => self,
            Entries::Children(children) => {
                children[closest_child(children, target)].parent_leaf(target)
            }
        }
    }

    /// Removes `target` from this subtree.
    /// Returns `(removed, underflowed)`, the latter meaning this node now holds
    /// fewer than the minimum number of entries.
    pub(crate) fn delete(&mut self, target: &[f64; D], fanout: Fanout) -> (bool, bool) {
        let children = match &mut self.entries {
            Entries::Points(points) => {
                let Some(index) = points.iter().position(|p| p == target) else {
                    return (false, false);
                };
                points.remove(index);
                self.reshape();
                return (true, self.len() < fanout.min_entries);
            }
            Entries::Children(children) => children,
        };

        let mut removed = false;
        let mut node_to_fix = None;
        for (i, child) in children.iter_mut().enumerate() {
            if !child.sphere.contains(target) {
                continue;
            }
            let (child_removed, underflowed) = child.delete(target, fanout);
            if child_removed {
                removed = true;
                if underflowed {
                    node_to_fix = Some(i);
                }
                break;
            }
        }

        let Some(index) = node_to_fix else {
            if removed {
                self.reshape();
            }
            return (removed, false);
        };

        if !borrow(children, index, fanout) && !merge(children, index, fanout) {
            #[cfg(feature = "tracing")]
            event!(
                Level::DEBUG,
                entries = children[index].len(),
                "underflow left unresolved"
            );
        }

        self.reshape();
        (true, self.len() < fanout.min_entries)
    }

    /// Pre-order walk collecting every node and every stored point.
    pub fn dfs<'a>(&'a self, nodes: &mut Vec<&'a Node<D>>, points: &mut Vec<[f64; D]>) {
        nodes.push(self);
        match &self.entries {
            Entries::Points(leaf_points) => points.extend_from_slice(leaf_points),
            Entries::Children(children) => {
                for child in children {
                    child.dfs(nodes, points);
                }
            }
        }
    }
}

impl<const D: usize> fmt::Display for Node<D> {
    /// One CSV row: kind, entry count, centroid coordinates, radius.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_leaf() { "leaf" } else { "internal" };
        write!(f, "{kind},{}", self.len())?;
        for x in &self.sphere.center {
            write!(f, ",{x}")?;
        }
        write!(f, ",{}", self.sphere.radius)
    }
}

// Index of the child whose centroid is nearest to `target`, first one on ties
fn closest_child<const D: usize>(children: &[Node<D>], target: &[f64; D]) -> usize {
    let mut best: Option<(f64, usize)> = None;
    for (i, child) in children.iter().enumerate() {
        let distance = distance(child.centroid(), target);
        if best.map_or(true, |(best_distance, _)| distance < best_distance) {
            best = Some((distance, i));
        }
    }
    match best {
        Some((_, index)) => index,
        None => panic!("corrupted tree: internal node without children"),
    }
}

// Move the entry closest to the underflowed child out of a sibling with surplus
fn borrow<const D: usize>(children: &mut [Node<D>], index: usize, fanout: Fanout) -> bool {
    let centroid = *children[index].centroid();
    let mut best: Option<(f64, usize, usize)> = None;
    for (s, sibling) in children.iter().enumerate() {
        if s == index || sibling.len() <= fanout.min_entries {
            continue;
        }
        for (e, position) in sibling.entries.positions().iter().enumerate() {
            let distance = distance(&centroid, position);
            if best.map_or(true, |(best_distance, _, _)| distance < best_distance) {
                best = Some((distance, s, e));
            }
        }
    }
    let Some((_, sibling, entry)) = best else {
        return false;
    };

    let entry = children[sibling].entries.remove(entry);
    children[sibling].reshape();
    children[index].entries.push(entry);
    children[index].reshape();

    #[cfg(feature = "tracing")]
    event!(Level::TRACE, from = sibling, to = index, "borrowed entry");

    true
}

// Fold the underflowed child into its nearest sibling that has room for it
fn merge<const D: usize>(children: &mut Vec<Node<D>>, index: usize, fanout: Fanout) -> bool {
    let len = children[index].len();
    let centroid = *children[index].centroid();
    let mut best: Option<(f64, usize)> = None;
    for (s, sibling) in children.iter().enumerate() {
        if s == index || sibling.len() + len > fanout.max_entries {
            continue;
        }
        let distance = distance(&centroid, sibling.centroid());
        if best.map_or(true, |(best_distance, _)| distance < best_distance) {
            best = Some((distance, s));
        }
    }
    let Some((_, sibling)) = best else {
        return false;
    };

    let merged = merge_nodes(&children[index], &children[sibling]);
    children.remove(index.max(sibling));
    children.remove(index.min(sibling));
    children.push(merged);

    #[cfg(feature = "tracing")]
    event!(Level::TRACE, entries = len, "merged underflowed node");

    true
}

fn merge_nodes<const D: usize>(a: &Node<D>, b: &Node<D>) -> Node<D> {
    match (&a.entries, &b.entries) {
        (Entries::Points(a), Entries::Points(b)) => {
            Node::leaf(a.iter().chain(b.iter()).copied().collect())
        }
        (Entries::Children(a), Entries::Children(b)) => {
            Node::internal(a.iter().chain(b.iter()).cloned().collect())
        }
        _ => panic!("corrupted tree: cannot merge a leaf with an internal node"),
    }
}
