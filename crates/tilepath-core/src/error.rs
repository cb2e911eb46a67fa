//! Error types for grid construction and tile mutation.

use thiserror::Error;

/// Errors arising from grid generation or tile updates.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    /// A grid axis exceeds [`MAX_GRID_DIMENSION`](crate::MAX_GRID_DIMENSION).
    #[error("grid dimension {width}x{height} exceeds the maximum of {max} per axis")]
    DimensionTooLarge {
        width: usize,
        height: usize,
        max: usize,
    },
    /// Scale components must be finite and positive.
    #[error("invalid tile scale {0:?}")]
    InvalidScale([f32; 3]),
    /// A tile index outside `[0, len)`.
    #[error("tile index {index} out of range (grid has {len} tiles)")]
    IndexOutOfRange { index: usize, len: usize },
    /// A tile property with a negative or non-finite cost.
    #[error("tile {index} has invalid cost {cost} (scale {cost_scale})")]
    InvalidCost {
        index: usize,
        cost: f32,
        cost_scale: f32,
    },
}
