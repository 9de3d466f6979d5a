//! Cached forward intermediates.
//!
//! A [`ForwardRecord`] keeps exactly what the backward pass needs: for every
//! output vertex the edge crossings it was built from, each with its source
//! samples, interpolation weight and edge span. Classification results are not
//! stored because no gradient flows through them.

use iso_core::{EdgeWeight, GridDims, Real, Vec3};

/// One edge crossing as seen by the backward pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossingRecord<T> {
    /// Flat field indices of the lower and upper endpoint, `None` for padding.
    pub samples: [Option<usize>; 2],
    /// Interpolation parameter and its derivatives.
    pub weight: EdgeWeight<T>,
    /// Deformed upper endpoint minus deformed lower endpoint.
    pub span: Vec3<T>,
}

/// Everything the backward pass needs from one forward call.
///
/// Vertex `v` depends on `crossings[members[offsets[v]..offsets[v + 1]]]`
/// and its position is the mean of those crossings, mapped by `origin + scale * p`.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardRecord<T> {
    pub(crate) dims: GridDims,
    pub(crate) has_deformation: bool,
    pub(crate) scale: Vec3<T>,
    pub(crate) crossings: Vec<CrossingRecord<T>>,
    pub(crate) offsets: Vec<u32>,
    pub(crate) members: Vec<u32>,
}

impl<T: Real> ForwardRecord<T> {
    /// Record for a mesh with no vertices.
    pub(crate) fn empty(dims: GridDims, has_deformation: bool, scale: Vec3<T>) -> Self {
        Self {
            dims,
            has_deformation,
            scale,
            crossings: Vec::new(),
            offsets: vec![0],
            members: Vec::new(),
        }
    }

    /// Grid dimensions of the forward input.
    #[inline]
    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// Whether a deformation field was supplied.
    #[inline]
    pub fn has_deformation(&self) -> bool {
        self.has_deformation
    }

    /// Per-axis scale of the output coordinate map.
    #[inline]
    pub fn scale(&self) -> Vec3<T> {
        self.scale
    }

    /// Number of output vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.offsets.len() - 1
    }

    /// `true` when the forward pass produced no geometry.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.num_vertices() == 0
    }

    /// All recorded crossings.
    #[inline]
    pub fn crossings(&self) -> &[CrossingRecord<T>] {
        &self.crossings
    }

    /// Crossing indices contributing to vertex `vertex`.
    #[inline]
    pub fn vertex_crossings(&self, vertex: usize) -> &[u32] {
        let start = self.offsets[vertex] as usize;
        let end = self.offsets[vertex + 1] as usize;
        &self.members[start..end]
    }
}
