//! # neural_iso
//!
//! Differentiable isosurface extraction on Burn tensors.
//!
//! This crate adapts `iso_rs` to tensor pipelines: a scalar grid tensor (and
//! optionally a per-sample deformation tensor) goes in, vertex and face
//! tensors come out. Gradients are produced by an explicit backward call
//! rather than through the backend's autodiff graph, so any backend works,
//! and the resulting gradient tensors can be handed to an optimiser or
//! chained into an autodiff graph by the caller.
//!
//! ## Quick Start
//!
//! ```ignore
//! use burn::backend::NdArray;
//! use neural_iso::{TensorExtractConfig, TensorExtractor};
//!
//! let device = Default::default();
//! let config = TensorExtractConfig::new().with_deform_bound(Some(0.5));
//! let mut extractor = TensorExtractor::<NdArray>::new(config, &device)?;
//!
//! let mesh = extractor.forward(sdf, Some(raw_offsets))?;
//! let grads = extractor.backward(loss_grad_wrt_vertices)?;
//! sdf = sdf - grads.scalar * learning_rate;
//! ```
//!
//! ## Feature Flags
//!
//! - `ndarray` (default): CPU backend
//! - `wgpu`: GPU backend; extraction itself still runs on the host

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod convert;
pub mod error;
pub mod extractor;

pub use config::TensorExtractConfig;
pub use error::{NeuralIsoError, Result};
pub use extractor::{TensorExtractor, TensorGradients, TensorMesh};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::TensorExtractConfig;
    pub use crate::error::{NeuralIsoError, Result};
    pub use crate::extractor::{TensorExtractor, TensorGradients, TensorMesh};
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use burn::prelude::*;

    #[test]
    fn test_public_api() {
        let device = Default::default();
        let extractor = TensorExtractor::<NdArray>::new(TensorExtractConfig::new(), &device).unwrap();
        assert!(!extractor.has_record());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let device = Default::default();
        let config = TensorExtractConfig::new().with_deform_bound(Some(-1.0));
        assert!(matches!(
            TensorExtractor::<NdArray, f64>::new(config, &device),
            Err(NeuralIsoError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_backward_before_forward() {
        let device = Default::default();
        let extractor = TensorExtractor::<NdArray>::new(TensorExtractConfig::new(), &device).unwrap();
        let grad = Tensor::<NdArray, 2>::zeros([0, 3], &device);
        assert!(matches!(
            extractor.backward(grad),
            Err(NeuralIsoError::Extraction(iso_rs::IsoError::BackwardWithoutForward))
        ));
    }
}
