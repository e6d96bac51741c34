//! Geometry construction errors

/// Errors raised when deriving or validating collision geometry
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum GeometryError {
    /// A bounding volume was requested for zero points
    #[error("cannot build a bounding volume from an empty point set")]
    EmptyPointSet,

    /// A plane normal was zero, NaN or infinite
    #[error("plane normal is degenerate (length {length})")]
    DegenerateNormal {
        /// Length of the rejected normal
        length: f32,
    },

    /// A radius or half-width was negative or not finite
    #[error("invalid extent {value}: must be finite and non-negative")]
    InvalidExtent {
        /// The rejected value
        value: f32,
    },
}
