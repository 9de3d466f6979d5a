//! # iso_core
//!
//! Pure mathematical algorithms for differentiable isosurface extraction.
//!
//! This crate holds everything about extraction that does not touch a
//! particular storage: how a cell is classified, which polygon loops a case
//! produces, where a vertex lands on a cell edge, and how a gradient on that
//! vertex flows back to the corner values and corner offsets.
//!
//! ## Features
//!
//! - **no_std compatible**: only `core` and `libm` are required
//! - **Generic precision**: every algorithm is generic over [`Real`] (`f32`, `f64`)
//! - **Compile-time tables**: the 256-case loop table is a `const` evaluation
//! - **Analytical gradients**: closed-form derivatives of the vertex placement
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables `std::error::Error` for [`IsoCoreError`]
//!
//! ## Modules
//!
//! - [`real`]: Precision trait implemented for `f32` and `f64`
//! - [`types`]: Core data types (Vec3, GridDims, CellCoord)
//! - [`marching_cubes`]: Case classification and topology tables
//! - [`interpolation`]: Edge crossing and centroid placement with gradients
//! - [`traits`]: Gradient accumulation abstraction
//! - [`error`]: Error types
//!
//! ## Usage
//!
//! ```ignore
//! use iso_core::prelude::*;
//!
//! let case = CubeCase::classify(&corner_values);
//! for polygon in case.entry().loops() {
//!     for &edge in polygon {
//!         let (a, b) = EDGE_VERTICES[edge as usize];
//!         let w = edge_weight(corner_values[a], corner_values[b]);
//!         let v = edge_crossing(positions[a], positions[b], &w);
//!     }
//! }
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(clippy::all)]

#[cfg(feature = "std")]
extern crate std;

pub mod error;
pub mod interpolation;
pub mod marching_cubes;
pub mod real;
pub mod traits;
pub mod types;

/// Prelude module for convenient imports.
///
/// Provides the most commonly used types and functions.
pub mod prelude {
    pub use crate::error::IsoCoreError;
    pub use crate::interpolation::{
        centroid, centroid_backward, edge_crossing, edge_crossing_backward, edge_weight,
        saturate, saturate_derivative, EdgeGradient, EdgeWeight,
    };
    pub use crate::marching_cubes::{
        is_inside, ring_order, CaseEntry, CubeCase, CASE_TABLE, CORNER_OFFSETS,
        EDGE_AXIS, EDGE_RING_CELLS, EDGE_RING_LOCAL, EDGE_VERTICES, MIN_CORNER_EDGES,
    };
    pub use crate::real::Real;
    pub use crate::traits::GradientAccumulator;
    pub use crate::types::{CellCoord, GridDims, Vec3};
}

// Re-export everything at crate root for convenience
pub use error::IsoCoreError;
pub use interpolation::{
    centroid, centroid_backward, edge_crossing, edge_crossing_backward, edge_weight, saturate,
    saturate_derivative, EdgeGradient, EdgeWeight,
};
pub use marching_cubes::{CaseEntry, CubeCase, CASE_TABLE};
pub use real::Real;
pub use traits::GradientAccumulator;
pub use types::{CellCoord, GridDims, Vec3};
