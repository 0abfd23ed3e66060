mod distance;
mod error;
mod node;
mod sphere;
#[allow(clippy::module_name_repetitions)]
mod sstree;
mod stats;

pub use distance::{distance, euclidean, minkowski, DEGREE};
pub use error::{Error, Result};
pub use node::{Entries, Node};
pub use sphere::{Bounded, Sphere};
pub use sstree::{Fanout, SsTree, MAX_ENTRIES, MIN_ENTRIES};
pub use stats::{max_variance_axis, mean, min_variance_split, variance, variance_along_axis};
