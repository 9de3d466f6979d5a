//! Differentiable dual marching cubes.
//!
//! Every polygon loop of an active cell becomes one vertex, placed at the
//! centroid of the loop's edge crossings. Cells with a single loop (every
//! case without an ambiguous face) therefore contribute exactly one vertex.
//! Every active lattice edge whose four surrounding cells exist becomes one
//! quad through the vertices of the loops that cross it.
//!
//! ```text
//!        ring cell 3 ---- ring cell 2
//!             |     edge     |          looking down +axis,
//!             |      (x)     |          counter-clockwise
//!        ring cell 0 ---- ring cell 1
//! ```
//!
//! The quad is emitted by the cell holding the edge at its minimum corner
//! (ring cell 2), and is wound to face the outside end of the edge.
//!
//! # Limitations
//!
//! Vertices are per (cell, loop), not per face segment. When two cells share
//! an ambiguous face and a single loop of each touches both of its segments,
//! the dual edge between those two vertices is used by four quads. The mesh
//! still has no boundary when padded, but it is not 2-manifold there. Smooth
//! fields sampled finely enough have no ambiguous faces and give closed
//! 2-manifold meshes.

use iso_core::interpolation::centroid;
use iso_core::marching_cubes::{ring_order, EDGE_RING_CELLS, EDGE_RING_LOCAL, MIN_CORNER_EDGES};
use iso_core::{Real, Vec3};
use log::{debug, trace};

use crate::classify::{classify_cells, ActiveCell};
use crate::config::ExtractConfig;
use crate::error::Result;
use crate::exec::{install, map_slice};
use crate::field::{check_deformation, DeformField, ScalarField};
use crate::lattice::Lattice;
use crate::mesh::{Extraction, Mesh};
use crate::record::{CrossingRecord, ForwardRecord};

/// Extract a quad mesh of the zero level set of `field`.
///
/// Same inputs, errors and output space as
/// [`marching_cubes`](crate::marching_cubes).
pub fn dual_marching_cubes<T: Real>(
    field: &ScalarField<T>,
    deform: Option<&DeformField<T>>,
    config: &ExtractConfig,
) -> Result<Extraction<T, 4>> {
    config.validate()?;
    check_deformation(field, deform)?;

    install(config.num_threads, || {
        let lattice = Lattice::new(field, deform, config.pad_boundary);
        let (origin, scale) = config.space.affine::<T>(field.dims());

        let active = classify_cells(&lattice)?;
        trace!(
            "dual marching cubes: {} of {} cells active",
            active.len(),
            lattice.num_cells()
        );
        if active.is_empty() {
            debug!("dual marching cubes: empty isosurface");
            return Ok(Extraction {
                mesh: Mesh::default(),
                record: ForwardRecord::empty(field.dims(), deform.is_some(), scale),
            });
        }

        // Vertex ids: loops of active cells in scan order
        let mut first_vertex = Vec::with_capacity(active.len());
        let mut owners: Vec<(usize, usize)> = Vec::new();
        for (slot, cell) in active.iter().enumerate() {
            first_vertex.push(owners.len() as u32);
            for l in 0..cell.case.entry().loop_count as usize {
                owners.push((slot, l));
            }
        }

        let faces = assemble(&lattice, &active, &first_vertex);
        trace!("dual marching cubes: {} quads", faces.len());

        let placed = map_slice(&owners, |&(slot, l)| {
            let cell = active[slot];
            let edges = cell.case.entry().loop_at(l);
            let mut points = [Vec3::zero(); 12];
            let mut records = Vec::with_capacity(edges.len());
            for (n, &edge) in edges.iter().enumerate() {
                let (a, b) = lattice.edge_points(cell.index, edge as usize);
                let (p, record) = lattice.crossing(a, b);
                points[n] = p;
                records.push(record);
            }
            (centroid(&points[..edges.len()]), records)
        });

        let mut vertices = Vec::with_capacity(placed.len());
        let mut crossings: Vec<CrossingRecord<T>> = Vec::new();
        let mut offsets = Vec::with_capacity(placed.len() + 1);
        offsets.push(0u32);
        for (position, records) in placed {
            vertices.push((origin + scale.mul_elem(position)).to_array());
            crossings.extend(records);
            offsets.push(crossings.len() as u32);
        }
        let members = (0..crossings.len() as u32).collect();

        debug!(
            "dual marching cubes: {} active cells, {} vertices, {} quads",
            active.len(),
            vertices.len(),
            faces.len()
        );

        Ok(Extraction {
            mesh: Mesh::new(vertices, faces),
            record: ForwardRecord {
                dims: field.dims(),
                has_deformation: deform.is_some(),
                scale,
                crossings,
                offsets,
                members,
            },
        })
    })
}

/// Emit one quad per active lattice edge with a complete ring of cells.
fn assemble<T: Real>(
    lattice: &Lattice<'_, T>,
    active: &[ActiveCell],
    first_vertex: &[u32],
) -> Vec<[u32; 4]> {
    let cells = lattice.cell_shape();
    let mut faces = Vec::new();

    for cell in active {
        let base = lattice.cell_coords(cell.index);
        // All three minimum-corner edges start at corner 0
        let order = ring_order(cell.case.corner_inside(0));

        'axes: for axis in 0..3 {
            if !cell.case.edge_active(MIN_CORNER_EDGES[axis]) {
                continue;
            }

            let mut ring = [0u32; 4];
            for (r, slot) in ring.iter_mut().enumerate() {
                let (dx, dy, dz) = EDGE_RING_CELLS[axis][r];
                let coords = [
                    base[0] as isize + dx,
                    base[1] as isize + dy,
                    base[2] as isize + dz,
                ];
                if (0..3).any(|a| coords[a] < 0 || coords[a] as usize >= cells[a]) {
                    continue 'axes;
                }
                let flat = lattice.cell_index([
                    coords[0] as usize,
                    coords[1] as usize,
                    coords[2] as usize,
                ]);
                let Ok(pos) = active.binary_search_by_key(&flat, |c| c.index) else {
                    continue 'axes;
                };
                let loop_id = active[pos].case.entry().edge_loop[EDGE_RING_LOCAL[axis][r]];
                *slot = first_vertex[pos] + loop_id as u32;
            }

            faces.push([ring[order[0]], ring[order[1]], ring[order[2]], ring[order[3]]]);
        }
    }

    faces
}
