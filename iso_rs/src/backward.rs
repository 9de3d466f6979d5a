//! Gradient propagation from output vertices to the input fields.
//!
//! For each vertex the upstream gradient is scaled by the output map, split
//! evenly over the vertex's crossings, and pushed through the closed-form
//! edge derivatives. Contributions are computed in parallel per vertex and
//! reduced sequentially in record order, so the result does not depend on the
//! number of threads.

use iso_core::interpolation::{centroid_backward, edge_crossing_backward};
use iso_core::{EdgeGradient, GradientAccumulator, GridDims, Real, Vec3};
use log::trace;

use crate::error::{IsoError, Result};
use crate::exec::map_slice;
use crate::record::ForwardRecord;

/// Gradients of a loss with respect to the extraction inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldGradients<T> {
    /// Grid the gradients are defined on.
    pub dims: GridDims,
    /// `dL/ds`, one entry per sample in C order.
    pub scalar: Vec<T>,
    /// `dL/d(offset)` per sample, present iff the forward pass had a
    /// deformation field.
    pub deformation: Option<Vec<[T; 3]>>,
}

impl<T: Real> FieldGradients<T> {
    /// All-zero gradients shaped like the forward inputs.
    pub fn zeros(dims: GridDims, with_deformation: bool) -> Self {
        Self {
            dims,
            scalar: vec![T::ZERO; dims.len()],
            deformation: with_deformation.then(|| vec![[T::ZERO; 3]; dims.len()]),
        }
    }

    /// Deformation gradients flattened like an `[nx, ny, nz, 3]` array.
    pub fn deformation_flat(&self) -> Option<Vec<T>> {
        self.deformation
            .as_ref()
            .map(|d| d.iter().flat_map(|g| g.iter().copied()).collect())
    }
}

impl<T: Real> GradientAccumulator<T> for FieldGradients<T> {
    #[inline]
    fn accumulate_scalar(&mut self, index: usize, value: T) {
        self.scalar[index] += value;
    }

    #[inline]
    fn accumulate_offset(&mut self, index: usize, value: Vec3<T>) {
        if let Some(deformation) = self.deformation.as_mut() {
            let g = &mut deformation[index];
            g[0] += value.x;
            g[1] += value.y;
            g[2] += value.z;
        }
    }
}

/// Propagate `upstream` (`dL/dv`, one entry per output vertex) back to the
/// scalar field and, if present, the deformation field.
///
/// # Errors
/// `ShapeMismatch` if `upstream` does not have one row per recorded vertex.
pub fn backward<T: Real>(record: &ForwardRecord<T>, upstream: &[[T; 3]]) -> Result<FieldGradients<T>> {
    let mut grads = FieldGradients::zeros(record.dims(), record.has_deformation());
    accumulate(record, upstream, &mut grads)?;
    Ok(grads)
}

/// Like [`backward`], but adds into a caller-provided accumulator.
pub fn accumulate<T: Real, A: GradientAccumulator<T>>(
    record: &ForwardRecord<T>,
    upstream: &[[T; 3]],
    acc: &mut A,
) -> Result<()> {
    let vertices = record.num_vertices();
    if upstream.len() != vertices {
        return Err(IsoError::ShapeMismatch {
            expected: vec![vertices, 3],
            got: vec![upstream.len(), 3],
        });
    }
    if vertices == 0 {
        return Ok(());
    }

    let scale = record.scale();
    let ids: Vec<u32> = (0..vertices as u32).collect();
    let contributions = map_slice(&ids, |&v| {
        let members = record.vertex_crossings(v as usize);
        let grad = Vec3::from(upstream[v as usize]).mul_elem(scale);
        let share = centroid_backward(grad, members.len());
        members
            .iter()
            .map(|&c| {
                let crossing = &record.crossings()[c as usize];
                (c, edge_crossing_backward(share, crossing.span, &crossing.weight))
            })
            .collect::<Vec<(u32, EdgeGradient<T>)>>()
    });

    let mut scattered = 0usize;
    for per_vertex in contributions {
        for (c, g) in per_vertex {
            let [a, b] = record.crossings()[c as usize].samples;
            if let Some(a) = a {
                acc.accumulate_scalar(a, g.scalar_a);
                acc.accumulate_offset(a, g.offset_a);
            }
            if let Some(b) = b {
                acc.accumulate_scalar(b, g.scalar_b);
                acc.accumulate_offset(b, g.offset_b);
            }
            scattered += 1;
        }
    }
    trace!("backward: {} vertices, {} crossings", vertices, scattered);
    Ok(())
}
