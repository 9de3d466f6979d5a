//! Differentiable marching cubes.
//!
//! Produces one vertex per active lattice edge and emits the case table's
//! triangles for every active cell.
//!
//! # Pipeline
//!
//! 1. Classify all cells in parallel
//! 2. Walk active cells in scan order, assigning vertex ids through an arena
//!    keyed by `(axis, lower lattice point)`; shared edges get one id
//! 3. Compute each crossing once, in parallel, by the single owner of its key
//! 4. Map crossings to the output coordinate space

use iso_core::Real;
use log::{debug, trace};

use crate::classify::{classify_cells, ActiveCell};
use crate::config::ExtractConfig;
use crate::error::Result;
use crate::exec::{install, map_slice};
use crate::field::{check_deformation, DeformField, ScalarField};
use crate::lattice::Lattice;
use crate::mesh::{Extraction, Mesh};
use crate::record::ForwardRecord;

const UNASSIGNED: u32 = u32::MAX;

/// Extract a triangle mesh of the zero level set of `field`.
///
/// `deform`, if given, displaces every sample by its offset (in grid-index
/// units) before edge crossings are interpolated. The returned record feeds
/// [`backward`](crate::backward).
///
/// # Errors
/// - `ShapeMismatch` if `deform` is defined on a different grid
/// - `DegenerateInput` if an active cell reads a non-finite value or offset
/// - `InvalidConfig` / `ThreadPool` for unusable configurations
///
/// # Example
///
/// ```ignore
/// let field = ScalarField::from_fn([32; 3], |i, j, k| sphere(i, j, k))?;
/// let Extraction { mesh, record } = marching_cubes(&field, None, &ExtractConfig::default())?;
/// ```
pub fn marching_cubes<T: Real>(
    field: &ScalarField<T>,
    deform: Option<&DeformField<T>>,
    config: &ExtractConfig,
) -> Result<Extraction<T, 3>> {
    config.validate()?;
    check_deformation(field, deform)?;

    install(config.num_threads, || {
        let lattice = Lattice::new(field, deform, config.pad_boundary);
        let (origin, scale) = config.space.affine::<T>(field.dims());

        let active = classify_cells(&lattice)?;
        trace!(
            "marching cubes: {} of {} cells active",
            active.len(),
            lattice.num_cells()
        );
        if active.is_empty() {
            debug!("marching cubes: empty isosurface");
            return Ok(Extraction {
                mesh: Mesh::default(),
                record: ForwardRecord::empty(field.dims(), deform.is_some(), scale),
            });
        }

        let (keys, faces) = assemble(&lattice, &active);
        trace!("marching cubes: {} shared edge vertices", keys.len());

        let crossings = map_slice(&keys, |&key| {
            let (a, b) = lattice.edge_endpoints(key);
            lattice.crossing(a, b)
        });

        let mut vertices = Vec::with_capacity(crossings.len());
        let mut records = Vec::with_capacity(crossings.len());
        for (position, record) in crossings {
            vertices.push((origin + scale.mul_elem(position)).to_array());
            records.push(record);
        }

        let count = records.len() as u32;
        debug!(
            "marching cubes: {} active cells, {} vertices, {} triangles",
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
                crossings: records,
                offsets: (0..=count).collect(),
                members: (0..count).collect(),
            },
        })
    })
}

/// Assign vertex ids in first-reference order and emit triangles.
///
/// Returns the edge key of every vertex and the triangle list.
fn assemble<T: Real>(lattice: &Lattice<'_, T>, active: &[ActiveCell]) -> (Vec<usize>, Vec<[u32; 3]>) {
    let mut slot = vec![UNASSIGNED; 3 * lattice.num_points()];
    let mut keys = Vec::new();
    let mut faces = Vec::new();

    for cell in active {
        let entry = cell.case.entry();
        let mut local = [UNASSIGNED; 12];
        for edges in entry.loops() {
            for &edge in edges {
                let key = lattice.edge_key(cell.index, edge as usize);
                if slot[key] == UNASSIGNED {
                    slot[key] = keys.len() as u32;
                    keys.push(key);
                }
                local[edge as usize] = slot[key];
            }
        }
        for tri in entry.triangles() {
            faces.push([local[tri[0] as usize], local[tri[1] as usize], local[tri[2] as usize]]);
        }
    }

    (keys, faces)
}
