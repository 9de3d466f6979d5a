//! Stateful forward/backward wrappers.
//!
//! [`DiffMc`] and [`DualMc`] hold a configuration and the record of their
//! last forward call, mirroring a layer in a training loop:
//!
//! ```ignore
//! let mut mc = DiffMc::<f32>::new(ExtractConfig::default());
//! let mesh = mc.forward(&field, Some(&deform))?;
//! let grads = mc.backward(&loss_grad(&mesh))?;
//! ```

use iso_core::Real;

use crate::backward::{backward, FieldGradients};
use crate::config::ExtractConfig;
use crate::dual::dual_marching_cubes;
use crate::error::{IsoError, Result};
use crate::field::{DeformField, ScalarField};
use crate::marching::marching_cubes;
use crate::mesh::{QuadMesh, TriMesh};
use crate::record::ForwardRecord;

/// Differentiable marching cubes layer producing triangles.
#[derive(Debug, Clone, Default)]
pub struct DiffMc<T> {
    config: ExtractConfig,
    record: Option<ForwardRecord<T>>,
}

impl<T: Real> DiffMc<T> {
    /// Create a layer with the given extraction settings.
    pub fn new(config: ExtractConfig) -> Self {
        Self { config, record: None }
    }

    /// Extraction settings.
    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Extract a mesh and keep its record for [`DiffMc::backward`].
    ///
    /// A failed forward call clears the previous record.
    pub fn forward(&mut self, field: &ScalarField<T>, deform: Option<&DeformField<T>>) -> Result<TriMesh<T>> {
        self.record = None;
        let out = marching_cubes(field, deform, &self.config)?;
        self.record = Some(out.record);
        Ok(out.mesh)
    }

    /// Gradients of the last forward call given `dL/dv` per vertex.
    ///
    /// # Errors
    /// `BackwardWithoutForward` if no forward call has succeeded since
    /// construction or the last [`DiffMc::clear`].
    pub fn backward(&self, upstream: &[[T; 3]]) -> Result<FieldGradients<T>> {
        let record = self.record.as_ref().ok_or(IsoError::BackwardWithoutForward)?;
        backward(record, upstream)
    }

    /// Record of the last successful forward call.
    pub fn record(&self) -> Option<&ForwardRecord<T>> {
        self.record.as_ref()
    }

    /// Drop the cached record.
    pub fn clear(&mut self) {
        self.record = None;
    }
}

/// Differentiable dual marching cubes layer producing quads.
#[derive(Debug, Clone, Default)]
pub struct DualMc<T> {
    config: ExtractConfig,
    record: Option<ForwardRecord<T>>,
}

impl<T: Real> DualMc<T> {
    /// Create a layer with the given extraction settings.
    pub fn new(config: ExtractConfig) -> Self {
        Self { config, record: None }
    }

    /// Extraction settings.
    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Extract a quad mesh and keep its record for [`DualMc::backward`].
    pub fn forward(&mut self, field: &ScalarField<T>, deform: Option<&DeformField<T>>) -> Result<QuadMesh<T>> {
        self.record = None;
        let out = dual_marching_cubes(field, deform, &self.config)?;
        self.record = Some(out.record);
        Ok(out.mesh)
    }

    /// Gradients of the last forward call given `dL/dv` per vertex.
    pub fn backward(&self, upstream: &[[T; 3]]) -> Result<FieldGradients<T>> {
        let record = self.record.as_ref().ok_or(IsoError::BackwardWithoutForward)?;
        backward(record, upstream)
    }

    /// Record of the last successful forward call.
    pub fn record(&self) -> Option<&ForwardRecord<T>> {
        self.record.as_ref()
    }

    /// Drop the cached record.
    pub fn clear(&mut self) {
        self.record = None;
    }
}
