#[cfg(feature = "tracing")]
use tracing::{event, Level};

use crate::{
    error::{Error, Result},
    node::Node,
};

/// Default minimum number of entries of a non-root node.
pub const MIN_ENTRIES: usize = 2;
/// Default maximum number of entries of a node.
pub const MAX_ENTRIES: usize = 3;

/// Bounds on the number of entries per non-root node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fanout {
    pub(crate) min_entries: usize,
    pub(crate) max_entries: usize,
}

impl Fanout {
    /// An overflowing node (`max_entries + 1` entries) must split into two
    /// nodes of at least `min_entries` each, and a parent must have room for
    /// the two nodes a split hands it.
    pub fn new(min_entries: usize, max_entries: usize) -> Result<Self> {
        if min_entries == 0 || max_entries < 2 || max_entries + 1 < 2 * min_entries {
            return Err(Error::InvalidFanout {
                min: min_entries,
                max: max_entries,
            });
        }
        Ok(Fanout {
            min_entries,
            max_entries,
        })
    }

    #[must_use]
    pub fn min_entries(&self) -> usize {
        self.min_entries
    }

    #[must_use]
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }
}

impl Default for Fanout {
    fn default() -> Self {
        Fanout {
            min_entries: MIN_ENTRIES,
            max_entries: MAX_ENTRIES,
        }
    }
}

/// Similarity search tree over `D`-dimensional points.
#[derive(Clone, Debug)]
pub struct SsTree<const D: usize> {
    fanout: Fanout,
    root: Node<D>,
}

impl<const D: usize> SsTree<D> {
    /// Creates a tree rooted at a leaf holding `seed`.
    pub fn new(seed: [f64; D]) -> Result<Self> {
        Self::with_fanout(seed, Fanout::default())
    }

    pub fn with_fanout(seed: [f64; D], fanout: Fanout) -> Result<Self> {
        if D == 0 {
            return Err(Error::ZeroDimension);
        }
        check_finite(&seed)?;
        Ok(SsTree {
            fanout,
            root: Node::leaf(vec![seed]),
        })
    }

    /// Like [`SsTree::new`] for a seed whose length is only known at runtime.
    pub fn try_new(seed: &[f64]) -> Result<Self> {
        Self::new(to_point(seed)?)
    }

    #[must_use]
    pub fn dimension(&self) -> usize {
        D
    }

    #[must_use]
    pub fn fanout(&self) -> Fanout {
        self.fanout
    }

    #[must_use]
    pub fn root(&self) -> &Node<D> {
        &self.root
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.root.height()
    }

    /// Number of stored points.
    #[must_use]
    pub fn len(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            count += node.points().len();
            stack.extend(node.children());
        }
        count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inserts `point`. Inserting a point that is already stored does nothing.
    pub fn insert(&mut self, point: [f64; D]) -> Result<()> {
        check_finite(&point)?;

        // A duplicate may sit in a leaf other than the one the descent picks
        if self.root.search(&point).is_some() {
            return Ok(());
        }

        if let Some((left, right)) = self.root.insert(point, self.fanout) {
            self.root = Node::internal(vec![left, right]);

            #[cfg(feature = "tracing")]
            event!(Level::DEBUG, height = self.root.height(), "root split");
        }
        Ok(())
    }

    pub fn insert_slice(&mut self, point: &[f64]) -> Result<()> {
        self.insert(to_point(point)?)
    }

    /// Removes `point`, returning whether it was stored.
    pub fn delete(&mut self, point: &[f64; D]) -> bool {
        let (removed, _) = self.root.delete(point, self.fanout);
        if let Some(child) = self.root.take_only_child() {
            self.root = child;

            #[cfg(feature = "tracing")]
            event!(Level::DEBUG, height = self.root.height(), "root collapsed");
        }
        removed
    }

    pub fn delete_slice(&mut self, point: &[f64]) -> Result<bool> {
        Ok(self.delete(&to_point(point)?))
    }

    /// Leaf holding `point`, if it can be reached through spheres that
    /// contain it.
    #[must_use]
    pub fn search(&self, point: &[f64; D]) -> Option<&Node<D>> {
        self.root.search(point)
    }

    pub fn search_slice(&self, point: &[f64]) -> Result<Option<&Node<D>>> {
        Ok(self.search(&to_point(point)?))
    }

    #[must_use]
    pub fn contains(&self, point: &[f64; D]) -> bool {
        self.search(point).is_some()
    }

    /// Leaf an insertion of `point` would land in.
    #[must_use]
    pub fn parent_leaf(&self, point: &[f64; D]) -> &Node<D> {
        self.root.parent_leaf(point)
    }

    /// Every node in pre-order, and every stored point in the same order.
    #[must_use]
    pub fn dfs(&self) -> (Vec<&Node<D>>, Vec<[f64; D]>) {
        let mut nodes = Vec::new();
        let mut points = Vec::new();
        self.root.dfs(&mut nodes, &mut points);
        (nodes, points)
    }

    #[must_use]
    pub fn points(&self) -> Vec<[f64; D]> {
        self.dfs().1
    }

    /// One CSV row per node, root first, each prefixed with the node's depth.
    #[must_use]
    pub fn nodes_to_string_rows(&self) -> Vec<String> {
        let mut rows = Vec::new();
        let mut stack = vec![(0, &self.root)];
        while let Some((depth, node)) = stack.pop() {
            rows.push(format!("{depth},{node}\n"));
            for child in node.children().iter().rev() {
                stack.push((depth + 1, child));
            }
        }
        rows
    }
}

fn to_point<const D: usize>(point: &[f64]) -> Result<[f64; D]> {
    <[f64; D]>::try_from(point).map_err(|_| Error::DimensionMismatch {
        expected: D,
        actual: point.len(),
    })
}

fn check_finite(point: &[f64]) -> Result<()> {
    match point.iter().position(|x| !x.is_finite()) {
        Some(axis) => Err(Error::NonFiniteCoordinate { axis }),
        None => Ok(()),
    }
}
