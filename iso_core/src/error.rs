//! Error types for iso_core operations.
//!
//! Provides a simple error enum with no external dependencies for no_std compatibility.

use core::fmt;

/// Error types that can occur during iso_core operations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IsoCoreError {
    /// A grid axis has fewer than two samples, so it holds no cells.
    GridTooSmall {
        /// The axis (0 = x, 1 = y, 2 = z).
        axis: u8,
        /// Number of samples found along that axis.
        size: usize,
    },
    /// A corner of an active cell carries a non-finite scalar value.
    NonFiniteScalar {
        /// The corner index (0-7).
        corner: u8,
    },
    /// A corner of an active cell carries a non-finite deformation offset.
    NonFiniteOffset {
        /// The corner index (0-7).
        corner: u8,
    },
}

impl fmt::Display for IsoCoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IsoCoreError::GridTooSmall { axis, size } => {
                write!(
                    f,
                    "grid axis {} has {} samples, at least 2 are required",
                    axis, size
                )
            }
            IsoCoreError::NonFiniteScalar { corner } => {
                write!(f, "non-finite scalar value at cell corner {}", corner)
            }
            IsoCoreError::NonFiniteOffset { corner } => {
                write!(f, "non-finite deformation offset at cell corner {}", corner)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for IsoCoreError {}
