//! Dense sample fields.
//!
//! [`ScalarField`] holds one value per grid sample and [`DeformField`] one
//! offset per sample, both in C order (`(i * ny + j) * nz + k`). Offsets are in
//! grid-index units and are added to the integer sample coordinate before
//! interpolation.

use iso_core::interpolation::{saturate, saturate_derivative};
use iso_core::{GridDims, IsoCoreError, Real, Vec3};

use crate::error::{IsoError, Result};

/// Validate a `[nx, ny, nz]` shape.
pub(crate) fn dims_from_shape(shape: [usize; 3]) -> Result<GridDims> {
    GridDims::new(shape[0], shape[1], shape[2]).map_err(|err| match err {
        IsoCoreError::GridTooSmall { axis, size } => IsoError::GridTooSmall { axis, size },
        other => IsoError::InvalidConfig {
            message: other.to_string(),
        },
    })
}

/// Reject a deformation whose grid differs from the field's.
pub(crate) fn check_deformation<T: Real>(
    field: &ScalarField<T>,
    deform: Option<&DeformField<T>>,
) -> Result<()> {
    if let Some(deform) = deform {
        if deform.dims() != field.dims() {
            let [nx, ny, nz] = field.dims().shape();
            let [dx, dy, dz] = deform.dims().shape();
            return Err(IsoError::ShapeMismatch {
                expected: vec![nx, ny, nz, 3],
                got: vec![dx, dy, dz, 3],
            });
        }
    }
    Ok(())
}

/// Scalar samples on a regular grid. Negative values are inside.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField<T> {
    dims: GridDims,
    values: Vec<T>,
}

impl<T: Real> ScalarField<T> {
    /// Wrap a flat C-order buffer of shape `[nx, ny, nz]`.
    ///
    /// # Errors
    /// `GridTooSmall` if an axis has fewer than 2 samples, `ShapeMismatch`
    /// if `values` does not hold `nx * ny * nz` samples.
    pub fn new(shape: [usize; 3], values: Vec<T>) -> Result<Self> {
        let dims = dims_from_shape(shape)?;
        if values.len() != dims.len() {
            return Err(IsoError::ShapeMismatch {
                expected: shape.to_vec(),
                got: vec![values.len()],
            });
        }
        Ok(Self { dims, values })
    }

    /// Sample `f(i, j, k)` at every grid point.
    pub fn from_fn<F>(shape: [usize; 3], mut f: F) -> Result<Self>
    where
        F: FnMut(usize, usize, usize) -> T,
    {
        let dims = dims_from_shape(shape)?;
        let mut values = Vec::with_capacity(dims.len());
        for i in 0..dims.nx {
            for j in 0..dims.ny {
                for k in 0..dims.nz {
                    values.push(f(i, j, k));
                }
            }
        }
        Ok(Self { dims, values })
    }

    /// Grid dimensions.
    #[inline]
    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// Flat sample buffer.
    #[inline]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Mutable flat sample buffer, e.g. for an optimisation step.
    #[inline]
    pub fn values_mut(&mut self) -> &mut [T] {
        &mut self.values
    }

    /// Sample at a flat index.
    #[inline]
    pub fn get(&self, index: usize) -> T {
        self.values[index]
    }

    /// Consume the field, returning the flat buffer.
    pub fn into_values(self) -> Vec<T> {
        self.values
    }
}

/// Per-sample positional offsets in grid-index units.
///
/// Callers are responsible for keeping offsets small enough that deformed
/// samples stay inside their neighbourhood; [`DeformField::saturated`] bounds
/// them with `bound * tanh(raw)`.
#[derive(Debug, Clone, PartialEq)]
pub struct DeformField<T> {
    dims: GridDims,
    offsets: Vec<Vec3<T>>,
}

impl<T: Real> DeformField<T> {
    /// Wrap one offset per sample.
    pub fn new(shape: [usize; 3], offsets: Vec<[T; 3]>) -> Result<Self> {
        let dims = dims_from_shape(shape)?;
        if offsets.len() != dims.len() {
            return Err(IsoError::ShapeMismatch {
                expected: vec![shape[0], shape[1], shape[2], 3],
                got: vec![offsets.len(), 3],
            });
        }
        Ok(Self {
            dims,
            offsets: offsets.into_iter().map(Vec3::from).collect(),
        })
    }

    /// Wrap a flat buffer laid out like an `[nx, ny, nz, 3]` array.
    pub fn from_flat(shape: [usize; 3], flat: &[T]) -> Result<Self> {
        let dims = dims_from_shape(shape)?;
        if flat.len() != dims.len() * 3 {
            return Err(IsoError::ShapeMismatch {
                expected: vec![shape[0], shape[1], shape[2], 3],
                got: vec![flat.len()],
            });
        }
        let offsets = flat
            .chunks_exact(3)
            .map(|c| Vec3::new(c[0], c[1], c[2]))
            .collect();
        Ok(Self { dims, offsets })
    }

    /// All-zero offsets (the identity deformation).
    pub fn zeros(shape: [usize; 3]) -> Result<Self> {
        let dims = dims_from_shape(shape)?;
        Ok(Self {
            dims,
            offsets: vec![Vec3::zero(); dims.len()],
        })
    }

    /// Offsets `bound * tanh(raw)`, bounded to `(-bound, bound)` per component.
    pub fn saturated(shape: [usize; 3], raw: &[[T; 3]], bound: T) -> Result<Self> {
        let bounded = raw
            .iter()
            .map(|r| [saturate(r[0], bound), saturate(r[1], bound), saturate(r[2], bound)])
            .collect();
        Self::new(shape, bounded)
    }

    /// Chain rule of [`DeformField::saturated`]: map `dL/d(offset)` to
    /// `dL/d(raw)`.
    pub fn saturated_backward(raw: &[[T; 3]], grad: &[[T; 3]], bound: T) -> Result<Vec<[T; 3]>> {
        if raw.len() != grad.len() {
            return Err(IsoError::ShapeMismatch {
                expected: vec![raw.len(), 3],
                got: vec![grad.len(), 3],
            });
        }
        Ok(raw
            .iter()
            .zip(grad)
            .map(|(r, g)| {
                [
                    g[0] * saturate_derivative(r[0], bound),
                    g[1] * saturate_derivative(r[1], bound),
                    g[2] * saturate_derivative(r[2], bound),
                ]
            })
            .collect())
    }

    /// Grid dimensions.
    #[inline]
    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// Offset at a flat index.
    #[inline]
    pub fn get(&self, index: usize) -> Vec3<T> {
        self.offsets[index]
    }

    /// All offsets.
    #[inline]
    pub fn offsets(&self) -> &[Vec3<T>] {
        &self.offsets
    }

    /// Largest absolute offset component.
    pub fn max_abs(&self) -> T {
        let mut max = T::ZERO;
        for o in &self.offsets {
            for c in o.to_array() {
                let a = c.abs();
                if a > max {
                    max = a;
                }
            }
        }
        max
    }
}
