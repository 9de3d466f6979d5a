//! Indexed polygon meshes and mesh checks.
//!
//! Both extraction variants return a [`Mesh`] with a fixed face arity:
//! triangles for marching cubes and quads for the dual variant.

use std::collections::HashMap;

use iso_core::{Real, Vec3};

use crate::record::ForwardRecord;

/// Indexed mesh whose faces all have `K` vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh<T, const K: usize> {
    /// Vertex positions.
    pub vertices: Vec<[T; 3]>,
    /// Faces as indices into `vertices`, wound so the normal points towards
    /// increasing scalar values.
    pub faces: Vec<[u32; K]>,
}

/// Triangle mesh.
pub type TriMesh<T> = Mesh<T, 3>;

/// Quad mesh.
pub type QuadMesh<T> = Mesh<T, 4>;

/// Result of a forward pass: the mesh and the record needed to differentiate it.
#[derive(Debug, Clone)]
pub struct Extraction<T, const K: usize> {
    /// Extracted surface.
    pub mesh: Mesh<T, K>,
    /// Cached intermediates for [`backward`](crate::backward).
    pub record: ForwardRecord<T>,
}

/// Mesh statistics after extraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshStats<T> {
    /// Number of faces.
    pub face_count: usize,
    /// Number of vertices.
    pub vertex_count: usize,
    /// Total area (faces fan-triangulated).
    pub surface_area: T,
    /// Bounding box minimum.
    pub bbox_min: Vec3<T>,
    /// Bounding box maximum.
    pub bbox_max: Vec3<T>,
}

impl<T: Real, const K: usize> Default for Mesh<T, K> {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }
}

impl<T: Real, const K: usize> Mesh<T, K> {
    /// Create a mesh from vertices and faces.
    pub fn new(vertices: Vec<[T; 3]>, faces: Vec<[u32; K]>) -> Self {
        Self { vertices, faces }
    }

    /// Number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// `true` if the mesh has no faces.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Vertex position as a vector.
    #[inline]
    pub fn vertex(&self, index: u32) -> Vec3<T> {
        Vec3::from(self.vertices[index as usize])
    }

    /// Split every face into a triangle fan `(f0, fi, fi+1)`.
    pub fn triangulate(&self) -> TriMesh<T> {
        let mut faces = Vec::with_capacity(self.faces.len() * K.saturating_sub(2));
        for face in &self.faces {
            for i in 1..K.saturating_sub(1) {
                faces.push([face[0], face[i], face[i + 1]]);
            }
        }
        Mesh {
            vertices: self.vertices.clone(),
            faces,
        }
    }

    /// Compute statistics of the mesh.
    pub fn stats(&self) -> MeshStats<T> {
        let mut bbox_min = Vec3::zero();
        let mut bbox_max = Vec3::zero();
        if let Some(&first) = self.vertices.first() {
            bbox_min = Vec3::from(first);
            bbox_max = bbox_min;
            for &v in &self.vertices {
                bbox_min = bbox_min.min(Vec3::from(v));
                bbox_max = bbox_max.max(Vec3::from(v));
            }
        }

        let mut surface_area = T::ZERO;
        self.for_each_triangle(|a, b, c| {
            surface_area += (b - a).cross(c - a).length() * T::HALF;
        });

        MeshStats {
            face_count: self.faces.len(),
            vertex_count: self.vertices.len(),
            surface_area,
            bbox_min,
            bbox_max,
        }
    }

    /// Signed enclosed volume. Positive when faces wind outward.
    pub fn signed_volume(&self) -> T {
        let mut volume = T::ZERO;
        self.for_each_triangle(|a, b, c| {
            volume += a.dot(b.cross(c));
        });
        volume / T::from_f64(6.0)
    }

    /// Undirected edges used by exactly one face, sorted.
    pub fn boundary_edges(&self) -> Vec<[u32; 2]> {
        let mut edges: Vec<[u32; 2]> = self
            .undirected_edge_counts()
            .into_iter()
            .filter(|&(_, count)| count == 1)
            .map(|(edge, _)| edge)
            .collect();
        edges.sort_unstable();
        edges
    }

    /// `true` if every edge is shared by exactly two faces.
    pub fn is_watertight(&self) -> bool {
        self.undirected_edge_counts().values().all(|&count| count == 2)
    }

    /// `true` if no directed edge is used twice, i.e. neighbouring faces
    /// traverse their shared edge in opposite directions.
    pub fn is_consistently_oriented(&self) -> bool {
        let mut directed: HashMap<(u32, u32), usize> = HashMap::new();
        for face in &self.faces {
            for i in 0..K {
                *directed.entry((face[i], face[(i + 1) % K])).or_insert(0) += 1;
            }
        }
        directed.values().all(|&count| count == 1)
    }

    /// Export to Wavefront OBJ text (1-based indices).
    pub fn to_obj(&self) -> String {
        use core::fmt::Write;

        let mut obj = String::new();
        let _ = writeln!(obj, "# iso_rs generated mesh");
        let _ = writeln!(
            obj,
            "# {} vertices, {} faces",
            self.vertices.len(),
            self.faces.len()
        );
        for v in &self.vertices {
            let _ = writeln!(obj, "v {} {} {}", v[0], v[1], v[2]);
        }
        for face in &self.faces {
            obj.push('f');
            for &i in face {
                let _ = write!(obj, " {}", i + 1);
            }
            obj.push('\n');
        }
        obj
    }

    fn for_each_triangle<F: FnMut(Vec3<T>, Vec3<T>, Vec3<T>)>(&self, mut f: F) {
        for face in &self.faces {
            let a = self.vertex(face[0]);
            for i in 1..K.saturating_sub(1) {
                f(a, self.vertex(face[i]), self.vertex(face[i + 1]));
            }
        }
    }

    fn undirected_edge_counts(&self) -> HashMap<[u32; 2], usize> {
        let mut counts = HashMap::new();
        for face in &self.faces {
            for i in 0..K {
                let a = face[i];
                let b = face[(i + 1) % K];
                *counts.entry([a.min(b), a.max(b)]).or_insert(0) += 1;
            }
        }
        counts
    }
}
