//! Tensor-level forward and backward.
//!
//! [`TensorExtractor`] takes a `[nx, ny, nz]` scalar tensor and an optional
//! `[nx, ny, nz, 3]` deformation tensor, extracts on the host, and returns
//! vertex and face tensors on the extractor's device. Backward is explicit:
//! it maps a `[V, 3]` vertex-gradient tensor to gradient tensors shaped like
//! the inputs, which callers feed into their optimiser.

use burn::prelude::*;
use burn::tensor::Element;
use iso_rs::{
    backward, dual_marching_cubes, marching_cubes, DeformField, ForwardRecord, IsoError, Real,
    ScalarField,
};
use log::{debug, warn};

use crate::config::TensorExtractConfig;
use crate::convert::{faces_to_tensor, rows_to_tensor, tensor_to_rows, tensor_to_vec, vec_to_tensor};
use crate::error::{NeuralIsoError, Result};

/// Mesh produced by a tensor forward pass.
#[derive(Debug, Clone)]
pub struct TensorMesh<B: Backend> {
    /// Vertex positions, `[V, 3]`.
    pub vertices: Tensor<B, 2>,
    /// Face indices, `[F, 3]` (triangles) or `[F, 4]` (quads).
    pub faces: Tensor<B, 2, Int>,
}

impl<B: Backend> TensorMesh<B> {
    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.dims()[0]
    }

    /// Number of faces.
    pub fn num_faces(&self) -> usize {
        self.faces.dims()[0]
    }
}

/// Gradients produced by a tensor backward pass.
#[derive(Debug, Clone)]
pub struct TensorGradients<B: Backend> {
    /// `dL/d(field)`, `[nx, ny, nz]`.
    pub scalar: Tensor<B, 3>,
    /// `dL/d(deformation)`, `[nx, ny, nz, 3]`, when a deformation was given.
    /// With a `deform_bound` this is the gradient of the raw (pre-tanh) tensor.
    pub deformation: Option<Tensor<B, 4>>,
}

struct Cached<E> {
    record: ForwardRecord<E>,
    shape: [usize; 3],
    raw_deform: Option<Vec<[E; 3]>>,
}

/// Differentiable isosurface extraction on Burn tensors.
///
/// `E` is the precision the extraction runs in, independent of the backend's
/// float element type.
pub struct TensorExtractor<B: Backend, E: Real + Element = f32> {
    config: TensorExtractConfig,
    device: B::Device,
    cached: Option<Cached<E>>,
}

impl<B: Backend, E: Real + Element> TensorExtractor<B, E> {
    /// Create an extractor producing tensors on `device`.
    ///
    /// # Errors
    /// `InvalidConfig` if the configuration does not validate.
    pub fn new(config: TensorExtractConfig, device: &B::Device) -> Result<Self> {
        config
            .validate()
            .map_err(|message| NeuralIsoError::InvalidConfig { message })?;
        Ok(Self {
            config,
            device: device.clone(),
            cached: None,
        })
    }

    /// Configuration.
    pub fn config(&self) -> &TensorExtractConfig {
        &self.config
    }

    /// `true` once a forward pass has been cached.
    pub fn has_record(&self) -> bool {
        self.cached.is_some()
    }

    /// Extract the zero level set of `field`.
    pub fn forward(&mut self, field: Tensor<B, 3>, deform: Option<Tensor<B, 4>>) -> Result<TensorMesh<B>> {
        self.cached = None;

        let shape = field.dims();
        let field = ScalarField::new(shape, tensor_to_vec::<B, 3, E>(field)?)?;

        let (deform_field, raw_deform) = match deform {
            Some(tensor) => {
                let dims = tensor.dims();
                if dims != [shape[0], shape[1], shape[2], 3] {
                    return Err(NeuralIsoError::ShapeMismatch {
                        expected: vec![shape[0], shape[1], shape[2], 3],
                        got: dims.to_vec(),
                    });
                }
                let flat = tensor_to_vec::<B, 4, E>(tensor)?;
                let raw: Vec<[E; 3]> = flat.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect();
                match self.config.deform_bound {
                    Some(bound) => {
                        let deform = DeformField::saturated(shape, &raw, <E as Real>::from_f64(bound))?;
                        (Some(deform), Some(raw))
                    }
                    None => (Some(DeformField::new(shape, raw)?), None),
                }
            }
            None => (None, None),
        };

        let config = self.config.extract_config();
        let (vertices, faces, record) = if self.config.dual {
            let out = dual_marching_cubes(&field, deform_field.as_ref(), &config)?;
            let vertices = rows_to_tensor::<B, E>(&out.mesh.vertices, &self.device);
            (vertices, faces_to_tensor::<B, 4>(&out.mesh.faces, &self.device), out.record)
        } else {
            let out = marching_cubes(&field, deform_field.as_ref(), &config)?;
            let vertices = rows_to_tensor::<B, E>(&out.mesh.vertices, &self.device);
            (vertices, faces_to_tensor::<B, 3>(&out.mesh.faces, &self.device), out.record)
        };

        debug!(
            "tensor forward: grid {:?}, {} vertices, {} faces",
            shape,
            vertices.dims()[0],
            faces.dims()[0]
        );

        self.cached = Some(Cached {
            record,
            shape,
            raw_deform,
        });
        Ok(TensorMesh { vertices, faces })
    }

    /// Map `dL/dv` (`[V, 3]`) to gradients of the last forward inputs.
    ///
    /// # Errors
    /// - `Extraction(BackwardWithoutForward)` without a cached forward pass
    /// - `ShapeMismatch` if `vertex_grad` does not have one row per vertex
    pub fn backward(&self, vertex_grad: Tensor<B, 2>) -> Result<TensorGradients<B>> {
        let cached = self.cached.as_ref().ok_or(IsoError::BackwardWithoutForward)?;

        let expected = cached.record.num_vertices();
        let got = vertex_grad.dims();
        if got[0] != expected {
            warn!(
                "tensor backward: gradient has {} rows but the cached mesh has {} vertices",
                got[0], expected
            );
            return Err(NeuralIsoError::ShapeMismatch {
                expected: vec![expected, 3],
                got: got.to_vec(),
            });
        }

        let upstream = tensor_to_rows::<B, E>(vertex_grad)?;
        let grads = backward(&cached.record, &upstream)?;

        let scalar = vec_to_tensor::<B, 3, E>(grads.scalar, cached.shape, &self.device);
        let deformation = match grads.deformation {
            Some(offset_grads) => {
                let offset_grads = match (&cached.raw_deform, self.config.deform_bound) {
                    (Some(raw), Some(bound)) => {
                        DeformField::saturated_backward(raw, &offset_grads, <E as Real>::from_f64(bound))?
                    }
                    _ => offset_grads,
                };
                let [nx, ny, nz] = cached.shape;
                let flat: Vec<E> = offset_grads.iter().flat_map(|g| g.iter().copied()).collect();
                Some(vec_to_tensor::<B, 4, E>(flat, [nx, ny, nz, 3], &self.device))
            }
            None => None,
        };

        Ok(TensorGradients { scalar, deformation })
    }

    /// Drop the cached forward pass.
    pub fn clear(&mut self) {
        self.cached = None;
    }
}
