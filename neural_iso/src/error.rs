//! Error types for neural_iso.

use iso_rs::IsoError;
use thiserror::Error;

/// Errors that can occur when extracting from or differentiating through tensors.
#[derive(Error, Debug)]
pub enum NeuralIsoError {
    /// Tensor shape mismatch.
    #[error("tensor shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected shape.
        expected: Vec<usize>,
        /// Actual shape.
        got: Vec<usize>,
    },

    /// Tensor data could not be read as the extraction precision.
    #[error("invalid tensor data: {0}")]
    InvalidData(String),

    /// Invalid configuration.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the configuration error.
        message: String,
    },

    /// Extraction or gradient propagation failed.
    #[error(transparent)]
    Extraction(#[from] IsoError),
}

/// Result type for neural_iso operations.
pub type Result<T> = std::result::Result<T, NeuralIsoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wraps_extraction_errors() {
        let err: NeuralIsoError = IsoError::BackwardWithoutForward.into();
        assert_eq!(err.to_string(), "backward called without a cached forward record");
        assert!(matches!(
            err,
            NeuralIsoError::Extraction(IsoError::BackwardWithoutForward)
        ));
    }

    #[test]
    fn test_shape_mismatch_display() {
        let err = NeuralIsoError::ShapeMismatch {
            expected: vec![8, 8, 8, 3],
            got: vec![8, 8, 8],
        };
        assert_eq!(
            err.to_string(),
            "tensor shape mismatch: expected [8, 8, 8, 3], got [8, 8, 8]"
        );
    }
}
