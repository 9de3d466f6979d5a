//! Cube topology tables.
//!
//! The per-case table is evaluated at compile time from the cube's corner,
//! edge and face definitions, so there is no hand-typed 256-row table to get
//! wrong and no runtime initialisation.
//!
//! ```text
//! Corner:  0      1      2      3      4      5      6      7
//! Offset: (0,0,0)(1,0,0)(1,1,0)(0,1,0)(0,0,1)(1,0,1)(1,1,1)(0,1,1)
//! ```

/// Offset of each cube corner from the cell's minimum corner.
pub const CORNER_OFFSETS: [(usize, usize, usize); 8] = [
    (0, 0, 0),
    (1, 0, 0),
    (1, 1, 0),
    (0, 1, 0),
    (0, 0, 1),
    (1, 0, 1),
    (1, 1, 1),
    (0, 1, 1),
];

/// Corner pairs of the 12 cube edges. The first corner is always the lower
/// end along the edge axis.
pub const EDGE_VERTICES: [(usize, usize); 12] = [
    (0, 1),
    (1, 2),
    (3, 2),
    (0, 3),
    (4, 5),
    (5, 6),
    (7, 6),
    (4, 7),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

/// Axis (0 = x, 1 = y, 2 = z) of each cube edge.
pub const EDGE_AXIS: [usize; 12] = [0, 1, 0, 1, 0, 1, 0, 1, 2, 2, 2, 2];

/// Corners of the six cube faces, counter-clockwise seen from outside the cube.
pub const FACE_CORNERS: [[usize; 4]; 6] = [
    [0, 3, 2, 1], // z = 0
    [4, 5, 6, 7], // z = 1
    [0, 1, 5, 4], // y = 0
    [3, 7, 6, 2], // y = 1
    [0, 4, 7, 3], // x = 0
    [1, 2, 6, 5], // x = 1
];

/// Maximum number of polygon loops in one cell.
pub const MAX_LOOPS: usize = 4;

/// Maximum number of triangles in one cell: a single loop through all 12 edges.
pub const MAX_TRIANGLES: usize = 10;

/// Marker for "edge belongs to no loop" in [`CaseEntry::edge_loop`].
pub const NO_LOOP: u8 = u8::MAX;

const NO_EDGE: u8 = u8::MAX;

/// Topology of one corner-sign pattern.
///
/// The isosurface patch inside a cell is a set of closed polygon loops whose
/// vertices are edge crossings. Loops are stored back to back in
/// `loop_edges`; loop `i` occupies `loop_lengths[i]` entries, wound so that
/// the patch faces towards increasing scalar values (outward for an SDF).
///
/// `triangles` splits every loop with the loop's winding. No triangle side
/// joins two non-consecutive crossings of the same cube face, so each face
/// segment is used once per cell and each diagonal stays inside the cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaseEntry {
    /// Bit `e` set if edge `e` has endpoints of opposite sign.
    pub edge_mask: u16,
    /// Number of polygon loops.
    pub loop_count: u8,
    /// Length of each loop (unused slots are zero).
    pub loop_lengths: [u8; MAX_LOOPS],
    /// Edge indices of all loops, concatenated.
    pub loop_edges: [u8; 12],
    /// Loop index of each edge, or [`NO_LOOP`] for inactive edges.
    pub edge_loop: [u8; 12],
    /// Triangles of all loops as cube-edge triples; the first
    /// [`CaseEntry::triangle_count`] are used.
    pub triangles: [[u8; 3]; MAX_TRIANGLES],
}

impl CaseEntry {
    const EMPTY: Self = Self {
        edge_mask: 0,
        loop_count: 0,
        loop_lengths: [0; MAX_LOOPS],
        loop_edges: [0; 12],
        edge_loop: [NO_LOOP; 12],
        triangles: [[0; 3]; MAX_TRIANGLES],
    };

    /// Number of active edges.
    #[inline]
    pub const fn active_edges(&self) -> u32 {
        self.edge_mask.count_ones()
    }

    /// Number of triangles covering every loop.
    #[inline]
    pub const fn triangle_count(&self) -> usize {
        self.active_edges() as usize - 2 * self.loop_count as usize
    }

    /// Edge indices of loop `index`.
    #[inline]
    pub fn loop_at(&self, index: usize) -> &[u8] {
        let mut start = 0;
        for len in &self.loop_lengths[..index] {
            start += *len as usize;
        }
        let len = self.loop_lengths[index] as usize;
        &self.loop_edges[start..start + len]
    }

    /// Iterate over all loops of this case.
    #[inline]
    pub fn loops(&self) -> impl Iterator<Item = &[u8]> + '_ {
        (0..self.loop_count as usize).map(move |i| self.loop_at(i))
    }

    /// Triangles of all loops, in loop order.
    #[inline]
    pub fn triangles(&self) -> &[[u8; 3]] {
        &self.triangles[..self.triangle_count()]
    }
}

/// Topology for every corner-sign pattern, indexed by the case bits.
pub static CASE_TABLE: [CaseEntry; 256] = build_case_table();

/// Local edge of each axis that starts at the cell's minimum corner.
pub const MIN_CORNER_EDGES: [usize; 3] = [0, 3, 8];

/// Cells around a lattice edge, as offsets from the edge's lower vertex.
///
/// Ordered counter-clockwise about the positive edge axis, so a quad through
/// the four cell vertices in this order faces `+axis`.
pub const EDGE_RING_CELLS: [[(isize, isize, isize); 4]; 3] = [
    [(0, -1, -1), (0, 0, -1), (0, 0, 0), (0, -1, 0)],
    [(-1, 0, -1), (-1, 0, 0), (0, 0, 0), (0, 0, -1)],
    [(-1, -1, 0), (0, -1, 0), (0, 0, 0), (-1, 0, 0)],
];

/// Local edge index of the shared lattice edge inside each ring cell of
/// [`EDGE_RING_CELLS`].
pub const EDGE_RING_LOCAL: [[usize; 4]; 3] = build_ring_local();

#[inline]
const fn is_inside(case: usize, corner: usize) -> bool {
    (case >> corner) & 1 == 1
}

const fn edge_between(a: usize, b: usize) -> usize {
    let mut e = 0;
    while e < 12 {
        let (lo, hi) = EDGE_VERTICES[e];
        if (lo == a && hi == b) || (lo == b && hi == a) {
            return e;
        }
        e += 1;
    }
    panic!("corners do not share an edge");
}

const fn edge_on_face(edge: usize, face: usize) -> bool {
    let (a, b) = EDGE_VERTICES[edge];
    let corners = FACE_CORNERS[face];
    let mut has_a = false;
    let mut has_b = false;
    let mut m = 0;
    while m < 4 {
        has_a = has_a || corners[m] == a;
        has_b = has_b || corners[m] == b;
        m += 1;
    }
    has_a && has_b
}

/// Bit `b` of entry `a` set if cube edges `a` and `b` lie on a common face.
const FACE_NEIGHBOURS: [u16; 12] = build_face_neighbours();

const fn build_face_neighbours() -> [u16; 12] {
    let mut table = [0u16; 12];
    let mut a = 0;
    while a < 12 {
        let mut b = 0;
        while b < 12 {
            let mut f = 0;
            while f < 6 {
                if a != b && edge_on_face(a, f) && edge_on_face(b, f) {
                    table[a] |= 1 << b;
                }
                f += 1;
            }
            b += 1;
        }
        a += 1;
    }
    table
}

#[inline]
const fn edges_share_face(a: u8, b: u8) -> bool {
    (FACE_NEIGHBOURS[a as usize] >> b) & 1 == 1
}

/// Triangulate a loop of `len` crossings without a diagonal between two
/// crossings of one cube face; the neighbouring cell would emit the same
/// diagonal. Prefers the fan from `polygon[0]`, and falls back to it when no
/// such triangulation exists.
const fn triangulate_loop(polygon: [u8; 12], len: usize) -> [[u8; 3]; MAX_TRIANGLES] {
    let mut tris = [[0u8; 3]; MAX_TRIANGLES];

    // apex[i][j]: third vertex of the triangle on side (i, j) of the
    // sub-polygon i..=j, valid when solved[i][j]
    let mut apex = [[0usize; 12]; 12];
    let mut solved = [[false; 12]; 12];
    let mut i = 0;
    while i + 1 < len {
        solved[i][i + 1] = true;
        i += 1;
    }

    let mut gap = 2;
    while gap < len {
        let mut i = 0;
        while i + gap < len {
            let j = i + gap;
            let mut k = j - 1;
            while k > i {
                let left = k == i + 1 || !edges_share_face(polygon[i], polygon[k]);
                let right = j == k + 1 || !edges_share_face(polygon[k], polygon[j]);
                if left && right && solved[i][k] && solved[k][j] {
                    apex[i][j] = k;
                    solved[i][j] = true;
                    break;
                }
                k -= 1;
            }
            i += 1;
        }
        gap += 1;
    }

    if !solved[0][len - 1] {
        let mut t = 0;
        while t + 2 < len {
            tris[t] = [polygon[0], polygon[t + 1], polygon[t + 2]];
            t += 1;
        }
        return tris;
    }

    let mut stack = [(0usize, 0usize); 12];
    stack[0] = (0, len - 1);
    let mut top = 1;
    let mut count = 0;
    while top > 0 {
        top -= 1;
        let (i, j) = stack[top];
        if j - i < 2 {
            continue;
        }
        let k = apex[i][j];
        tris[count] = [polygon[i], polygon[k], polygon[j]];
        count += 1;
        stack[top] = (i, k);
        stack[top + 1] = (k, j);
        top += 2;
    }

    // Emitted from the closing side inwards; reverse into fan order.
    let mut lo = 0;
    let mut hi = count - 1;
    while lo < hi {
        let tmp = tris[lo];
        tris[lo] = tris[hi];
        tris[hi] = tmp;
        lo += 1;
        hi -= 1;
    }
    tris
}

const fn build_case(case: usize) -> CaseEntry {
    // next[e]: the crossing that follows e when walking the patch boundary
    // over the cube faces
    let mut next = [NO_EDGE; 12];
    let mut edge_mask: u16 = 0;

    let mut f = 0;
    while f < 6 {
        let corners = FACE_CORNERS[f];
        let mut cross_edge = [0u8; 4];
        let mut cross_exit = [false; 4];
        let mut n = 0;

        let mut m = 0;
        while m < 4 {
            let a = corners[m];
            let b = corners[(m + 1) % 4];
            let a_in = is_inside(case, a);
            if a_in != is_inside(case, b) {
                let e = edge_between(a, b);
                cross_edge[n] = e as u8;
                cross_exit[n] = a_in;
                n += 1;
                edge_mask |= 1 << e;
            }
            m += 1;
        }

        // Each exit joins the entry just before it, which keeps the inside
        // corners of an ambiguous face apart.
        let mut q = 0;
        while q < n {
            if cross_exit[q] {
                let prev = (q + n - 1) % n;
                next[cross_edge[q] as usize] = cross_edge[prev];
            }
            q += 1;
        }
        f += 1;
    }

    let mut entry = CaseEntry::EMPTY;
    entry.edge_mask = edge_mask;

    let mut filled = 0;
    let mut tri_filled = 0;
    let mut start = 0;
    while start < 12 {
        if (edge_mask >> start) & 1 == 1 && entry.edge_loop[start] == NO_LOOP {
            let begin = filled;
            let mut e = start;
            loop {
                entry.edge_loop[e] = entry.loop_count;
                entry.loop_edges[filled] = e as u8;
                filled += 1;
                e = next[e] as usize;
                if e == start {
                    break;
                }
            }

            // The walk runs with the inside on its left; reverse it so the
            // patch faces away from the inside.
            let mut lo = begin;
            let mut hi = filled - 1;
            while lo < hi {
                let tmp = entry.loop_edges[lo];
                entry.loop_edges[lo] = entry.loop_edges[hi];
                entry.loop_edges[hi] = tmp;
                lo += 1;
                hi -= 1;
            }

            let len = filled - begin;
            let mut polygon = [0u8; 12];
            let mut p = 0;
            while p < len {
                polygon[p] = entry.loop_edges[begin + p];
                p += 1;
            }
            let tris = triangulate_loop(polygon, len);
            let mut t = 0;
            while t + 2 < len {
                entry.triangles[tri_filled] = tris[t];
                tri_filled += 1;
                t += 1;
            }

            entry.loop_lengths[entry.loop_count as usize] = len as u8;
            entry.loop_count += 1;
        }
        start += 1;
    }

    entry
}

const fn build_case_table() -> [CaseEntry; 256] {
    let mut table = [CaseEntry::EMPTY; 256];
    let mut case = 0;
    while case < 256 {
        table[case] = build_case(case);
        case += 1;
    }
    table
}

const fn local_edge(axis: usize, offset: (usize, usize, usize)) -> usize {
    let mut e = 0;
    while e < 12 {
        let lo = CORNER_OFFSETS[EDGE_VERTICES[e].0];
        if EDGE_AXIS[e] == axis && lo.0 == offset.0 && lo.1 == offset.1 && lo.2 == offset.2 {
            return e;
        }
        e += 1;
    }
    panic!("no edge with this axis and lower corner");
}

const fn build_ring_local() -> [[usize; 4]; 3] {
    let mut table = [[0; 4]; 3];
    let mut axis = 0;
    while axis < 3 {
        let mut r = 0;
        while r < 4 {
            let (dx, dy, dz) = EDGE_RING_CELLS[axis][r];
            // the lattice edge starts at -offset inside the ring cell
            table[axis][r] = local_edge(axis, ((-dx) as usize, (-dy) as usize, (-dz) as usize));
            r += 1;
        }
        axis += 1;
    }
    table
}
