//! Sample lattice seen by the extractors.
//!
//! The lattice is the input grid, optionally surrounded by one layer of
//! virtual samples with value `+1` and zero offset. Lattice coordinates are
//! unsigned; lattice point `l` is grid point `l - pad` on every axis, so
//! padding samples sit at grid index `-1` and `n`.

use iso_core::marching_cubes::{CORNER_OFFSETS, EDGE_AXIS, EDGE_VERTICES};
use iso_core::{Real, Vec3};

use iso_core::interpolation::{edge_crossing, edge_weight};

use crate::field::{DeformField, ScalarField};
use crate::record::CrossingRecord;

/// One sample as read by a cell corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample<T> {
    /// Scalar value.
    pub value: T,
    /// Deformed position in grid-index units.
    pub position: Vec3<T>,
    /// Flat index into the input field, `None` for padding.
    pub source: Option<usize>,
}

/// Read-only view combining a field, an optional deformation and padding.
pub(crate) struct Lattice<'a, T> {
    field: &'a ScalarField<T>,
    deform: Option<&'a DeformField<T>>,
    pad: usize,
    /// Lattice points per axis.
    points: [usize; 3],
}

impl<'a, T: Real> Lattice<'a, T> {
    pub(crate) fn new(
        field: &'a ScalarField<T>,
        deform: Option<&'a DeformField<T>>,
        pad_boundary: bool,
    ) -> Self {
        let pad = usize::from(pad_boundary);
        let shape = field.dims().shape();
        Self {
            field,
            deform,
            pad,
            points: [shape[0] + 2 * pad, shape[1] + 2 * pad, shape[2] + 2 * pad],
        }
    }

    /// Number of lattice points.
    #[inline]
    pub(crate) fn num_points(&self) -> usize {
        self.points[0] * self.points[1] * self.points[2]
    }

    /// Cells per axis.
    #[inline]
    pub(crate) fn cell_shape(&self) -> [usize; 3] {
        [self.points[0] - 1, self.points[1] - 1, self.points[2] - 1]
    }

    #[inline]
    pub(crate) fn num_cells(&self) -> usize {
        let c = self.cell_shape();
        c[0] * c[1] * c[2]
    }

    /// Lattice coordinates of the minimum corner of a flat cell index.
    #[inline]
    pub(crate) fn cell_coords(&self, cell: usize) -> [usize; 3] {
        let c = self.cell_shape();
        [cell / (c[1] * c[2]), (cell / c[2]) % c[1], cell % c[2]]
    }

    /// Flat cell index of lattice cell coordinates.
    #[inline]
    pub(crate) fn cell_index(&self, l: [usize; 3]) -> usize {
        let c = self.cell_shape();
        (l[0] * c[1] + l[1]) * c[2] + l[2]
    }

    /// Flat index of a lattice point.
    #[inline]
    pub(crate) fn point_index(&self, l: [usize; 3]) -> usize {
        (l[0] * self.points[1] + l[1]) * self.points[2] + l[2]
    }

    /// Grid coordinates of a lattice point (may be `-1` or `n` when padded).
    #[inline]
    pub(crate) fn to_grid(&self, l: [usize; 3]) -> [isize; 3] {
        let p = self.pad as isize;
        [l[0] as isize - p, l[1] as isize - p, l[2] as isize - p]
    }

    /// Read the sample at lattice point `l`.
    pub(crate) fn sample(&self, l: [usize; 3]) -> Sample<T> {
        let g = self.to_grid(l);
        let base = Vec3::from_grid(g[0], g[1], g[2]);
        match self.field.dims().checked_index(g[0], g[1], g[2]) {
            Some(index) => {
                let offset = self.deform.map_or(Vec3::zero(), |d| d.get(index));
                Sample {
                    value: self.field.get(index),
                    position: base + offset,
                    source: Some(index),
                }
            }
            None => Sample {
                value: T::ONE,
                position: base,
                source: None,
            },
        }
    }

    /// The 8 corner samples of a cell, in corner order.
    pub(crate) fn corners(&self, cell: usize) -> [Sample<T>; 8] {
        let base = self.cell_coords(cell);
        core::array::from_fn(|c| {
            let (dx, dy, dz) = CORNER_OFFSETS[c];
            self.sample([base[0] + dx, base[1] + dy, base[2] + dz])
        })
    }

    /// Canonical key of local edge `edge` of `cell`: `axis * points + lower`.
    #[inline]
    pub(crate) fn edge_key(&self, cell: usize, edge: usize) -> usize {
        let base = self.cell_coords(cell);
        let (dx, dy, dz) = CORNER_OFFSETS[EDGE_VERTICES[edge].0];
        let lower = self.point_index([base[0] + dx, base[1] + dy, base[2] + dz]);
        EDGE_AXIS[edge] * self.num_points() + lower
    }

    /// Lattice endpoints of local edge `edge` of `cell`, lower first.
    #[inline]
    pub(crate) fn edge_points(&self, cell: usize, edge: usize) -> ([usize; 3], [usize; 3]) {
        let base = self.cell_coords(cell);
        let (a, b) = EDGE_VERTICES[edge];
        let offset = |corner: usize| {
            let (dx, dy, dz) = CORNER_OFFSETS[corner];
            [base[0] + dx, base[1] + dy, base[2] + dz]
        };
        (offset(a), offset(b))
    }

    /// Surface crossing on the lattice edge `a -> b` in grid-index units,
    /// together with what the backward pass needs to differentiate it.
    pub(crate) fn crossing(&self, a: [usize; 3], b: [usize; 3]) -> (Vec3<T>, CrossingRecord<T>) {
        let sa = self.sample(a);
        let sb = self.sample(b);
        let weight = edge_weight(sa.value, sb.value);
        let position = edge_crossing(sa.position, sb.position, &weight);
        let record = CrossingRecord {
            samples: [sa.source, sb.source],
            weight,
            span: sb.position - sa.position,
        };
        (position, record)
    }

    /// Endpoints of the lattice edge behind a canonical key.
    pub(crate) fn edge_endpoints(&self, key: usize) -> ([usize; 3], [usize; 3]) {
        let n = self.num_points();
        let axis = key / n;
        let lower = key % n;
        let p = self.points;
        let a = [lower / (p[1] * p[2]), (lower / p[2]) % p[1], lower % p[2]];
        let mut b = a;
        b[axis] += 1;
        (a, b)
    }
}
