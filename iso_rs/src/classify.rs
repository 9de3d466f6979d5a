//! Parallel cell classification.
//!
//! Each cell is classified from its 8 corner values independently of every
//! other cell. Only cells with a non-trivial case are kept, in cell-scan
//! order. This is where gradients stop: the selected case is a constant for
//! the backward pass.

use iso_core::{CubeCase, IsoCoreError, Real};

use crate::error::{IsoError, Result};
use crate::exec::filter_map_range;
use crate::lattice::{Lattice, Sample};

/// A cell crossed by the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ActiveCell {
    /// Flat lattice cell index.
    pub index: usize,
    /// Corner-sign pattern.
    pub case: CubeCase,
}

/// Classify every lattice cell, returning the active ones sorted by index.
///
/// Fails with `DegenerateInput` for the lowest active cell that reads a
/// non-finite value or offset.
pub(crate) fn classify_cells<T: Real>(lattice: &Lattice<'_, T>) -> Result<Vec<ActiveCell>> {
    let results = filter_map_range(lattice.num_cells(), |index| {
        let corners = lattice.corners(index);
        let values: [T; 8] = core::array::from_fn(|c| corners[c].value);
        let case = CubeCase::classify(&values);
        if case.is_trivial() {
            return None;
        }
        Some(match check_finite(&corners) {
            Ok(()) => Ok(ActiveCell { index, case }),
            Err((corner, source)) => Err(IsoError::DegenerateInput {
                index: corners[corner].source.unwrap_or(usize::MAX),
                cell: lattice.to_grid(lattice.cell_coords(index)),
                source,
            }),
        })
    });

    // Sequential collect so the first error in scan order wins
    results.into_iter().collect()
}

fn check_finite<T: Real>(corners: &[Sample<T>; 8]) -> core::result::Result<(), (usize, IsoCoreError)> {
    for (c, s) in corners.iter().enumerate() {
        if !s.value.is_finite() {
            return Err((c, IsoCoreError::NonFiniteScalar { corner: c as u8 }));
        }
        if !s.position.is_finite() {
            return Err((c, IsoCoreError::NonFiniteOffset { corner: c as u8 }));
        }
    }
    Ok(())
}
