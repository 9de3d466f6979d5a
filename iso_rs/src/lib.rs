//! # iso_rs
//!
//! Differentiable isosurface extraction over dense scalar grids.
//!
//! Two extractors share one pipeline and one gradient propagator:
//!
//! - [`marching_cubes`]: one vertex per active lattice edge, triangle faces
//! - [`dual_marching_cubes`]: one vertex per polygon loop of an active cell,
//!   quad faces
//!
//! Both accept an optional per-sample [`DeformField`] and return an
//! [`Extraction`] holding the mesh and a [`ForwardRecord`]. Feeding the record
//! and `dL/dv` to [`backward`] yields `dL/ds` and `dL/d(offset)` as dense
//! arrays shaped like the inputs.
//!
//! ## Quick Start
//!
//! ```ignore
//! use iso_rs::prelude::*;
//!
//! let field = ScalarField::from_fn([32, 32, 32], |i, j, k| {
//!     let p = [i as f32 / 31.0 - 0.5, j as f32 / 31.0 - 0.5, k as f32 / 31.0 - 0.5];
//!     (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt() - 0.3
//! })?;
//!
//! let Extraction { mesh, record } = marching_cubes(&field, None, &ExtractConfig::default())?;
//! assert!(mesh.is_watertight());
//!
//! // dL/dv for L = sum of vertex x coordinates
//! let upstream = vec![[1.0, 0.0, 0.0]; mesh.num_vertices()];
//! let grads = backward(&record, &upstream)?;
//! assert_eq!(grads.scalar.len(), 32 * 32 * 32);
//! ```
//!
//! ## Conventions
//!
//! - Samples are stored in C order: `(i * ny + j) * nz + k`
//! - A sample is inside iff its value is `< 0`; faces are wound so their
//!   normals point towards increasing values (outward for an SDF)
//! - Deformation offsets are in grid-index units
//! - Output coordinates are selected by [`VertexSpace`] (default: the grid
//!   spans the unit cube)
//! - With `pad_boundary` (default) the grid is virtually surrounded by `+1`
//!   samples, so surfaces touching the boundary are closed
//!
//! ## Feature Flags
//!
//! - `parallel` (default): classification, crossing evaluation and backward
//!   contributions run on rayon; results are identical to sequential runs

#![warn(missing_docs)]
#![warn(clippy::all)]

mod backward;
mod classify;
mod config;
mod dual;
mod error;
mod exec;
mod field;
mod lattice;
mod marching;
mod mesh;
mod module;
mod record;

pub use backward::{accumulate, backward, FieldGradients};
pub use config::{ExtractConfig, VertexSpace};
pub use dual::dual_marching_cubes;
pub use error::{IsoError, Result};
pub use field::{DeformField, ScalarField};
pub use marching::marching_cubes;
pub use mesh::{Extraction, Mesh, MeshStats, QuadMesh, TriMesh};
pub use module::{DiffMc, DualMc};
pub use record::{CrossingRecord, ForwardRecord};

// Re-export iso_core types for convenience
pub use iso_core::{EdgeWeight, GradientAccumulator, GridDims, IsoCoreError, Real, Vec3};

/// Prelude module for convenient imports.
///
/// ```ignore
/// use iso_rs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::backward::{backward, FieldGradients};
    pub use crate::config::{ExtractConfig, VertexSpace};
    pub use crate::dual::dual_marching_cubes;
    pub use crate::error::{IsoError, Result};
    pub use crate::field::{DeformField, ScalarField};
    pub use crate::marching::marching_cubes;
    pub use crate::mesh::{Extraction, Mesh, QuadMesh, TriMesh};
    pub use crate::module::{DiffMc, DualMc};

    pub use iso_core::{Real, Vec3};
}
