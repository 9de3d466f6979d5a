//! Marching cubes topology.
//!
//! This module provides everything about a single cell that does not depend on
//! the grid it belongs to:
//!
//! - Compile-time corner, edge, face and per-case loop and triangle tables
//! - The classifier mapping 8 corner values to a [`CubeCase`]
//! - Ring tables used by the dual variant to stitch quads across cells
//!
//! # Example
//!
//! ```ignore
//! use iso_core::marching_cubes::CubeCase;
//!
//! let case = CubeCase::classify(&corner_values);
//! for polygon in case.entry().loops() {
//!     // `polygon` lists the cell edges carrying the loop's vertices
//! }
//! for tri in case.entry().triangles() {
//!     // three cell edges, wound like their loop
//! }
//! ```

mod case;
mod tables;

pub use case::{is_inside, CubeCase};
pub use tables::{
    CaseEntry, CASE_TABLE, CORNER_OFFSETS, EDGE_AXIS, EDGE_RING_CELLS, EDGE_RING_LOCAL,
    EDGE_VERTICES, FACE_CORNERS, MAX_LOOPS, MAX_TRIANGLES, MIN_CORNER_EDGES, NO_LOOP,
};

/// Order the four ring cells of a lattice edge so the resulting quad faces
/// towards the outside end of the edge.
///
/// `lower_inside` is the classification of the edge's lower sample.
#[inline]
pub fn ring_order(lower_inside: bool) -> [usize; 4] {
    if lower_inside {
        [0, 1, 2, 3]
    } else {
        [0, 3, 2, 1]
    }
}
