//! Error types for iso_rs operations.

use iso_core::IsoCoreError;
use thiserror::Error;

/// Errors that can occur during extraction or gradient propagation.
///
/// A field with no sign change is not an error: extraction returns an empty
/// mesh and backward returns zero gradients.
#[derive(Error, Debug)]
pub enum IsoError {
    /// An input buffer does not have the shape implied by the grid.
    #[error("shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected shape.
        expected: Vec<usize>,
        /// Actual shape.
        got: Vec<usize>,
    },

    /// A grid axis holds fewer than two samples.
    #[error("grid axis {axis} has {size} samples, at least 2 are required")]
    GridTooSmall {
        /// The axis (0 = x, 1 = y, 2 = z).
        axis: u8,
        /// Number of samples along that axis.
        size: usize,
    },

    /// A sample read by an active cell is NaN or infinite.
    #[error("degenerate input at sample {index} of cell {cell:?}: {source}")]
    DegenerateInput {
        /// Flat index of the offending sample.
        index: usize,
        /// Grid coordinates of the lowest active cell that reads it.
        cell: [isize; 3],
        /// Which input was non-finite.
        source: IsoCoreError,
    },

    /// Backward was requested before any forward pass was cached.
    #[error("backward called without a cached forward record")]
    BackwardWithoutForward,

    /// Invalid configuration.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the configuration error.
        message: String,
    },

    /// The dedicated worker pool could not be created.
    #[error("failed to build thread pool: {0}")]
    ThreadPool(String),
}

/// Result type for iso_rs operations.
pub type Result<T> = core::result::Result<T, IsoError>;
