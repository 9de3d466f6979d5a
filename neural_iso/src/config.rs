//! Tensor extraction configuration.

use burn::config::Config;
use iso_rs::{ExtractConfig, VertexSpace};

/// Configuration for [`TensorExtractor`](crate::TensorExtractor).
#[derive(Config, Debug)]
pub struct TensorExtractConfig {
    /// Produce quads with dual marching cubes instead of triangles.
    #[config(default = false)]
    pub dual: bool,

    /// Pad the grid with `+1` samples so boundary-touching surfaces close.
    #[config(default = true)]
    pub pad_boundary: bool,

    /// Output vertices in unit-cube coordinates instead of grid-index units.
    #[config(default = true)]
    pub normalize: bool,

    /// Bound raw deformation tensors with `bound * tanh(raw)` before use.
    /// `None` uses the offsets as given.
    #[config(default = "None")]
    pub deform_bound: Option<f64>,

    /// Worker threads (0 = rayon's global pool).
    #[config(default = 0)]
    pub num_threads: usize,
}

impl TensorExtractConfig {
    /// Grid-level configuration for the extraction runtime.
    pub fn extract_config(&self) -> ExtractConfig {
        let space = if self.normalize {
            VertexSpace::Normalized
        } else {
            VertexSpace::Index
        };
        ExtractConfig::default()
            .with_padding(self.pad_boundary)
            .with_space(space)
            .with_num_threads(self.num_threads)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(bound) = self.deform_bound {
            if !(bound.is_finite() && bound > 0.0) {
                return Err(format!("deform_bound must be positive and finite, got {}", bound));
            }
        }
        Ok(())
    }
}
