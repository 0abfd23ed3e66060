use thiserror::Error;

/// Errors raised at the boundary of the tree. Structural corruption is not
/// represented here: it panics.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("point has {actual} coordinates, the tree is {expected}-dimensional")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("points must have at least one coordinate")]
    ZeroDimension,

    #[error("coordinate at axis {axis} is not finite")]
    NonFiniteCoordinate { axis: usize },

    #[error("invalid fanout: min entries {min}, max entries {max}")]
    InvalidFanout { min: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
