//! Comprehensive Test Suite for iso_core
//!
//! Each test states one behaviour of the crate. Together they pin down the
//! classifier, the case table and the vertex placement rules closely enough
//! that any implementation passing them produces the same meshes.
//!
//! # Test Categories
//!
//! 1. **Grid Types** - Indexing and validation
//! 2. **Classification** - Tie-break rule and determinism
//! 3. **Table Invariants** - Loop structure for all 256 cases
//! 4. **Face Consistency** - Adjacent cells agree on shared faces
//! 5. **Interpolation** - Edge weights, crossings and their gradients
//! 6. **Error Types** - Display and equality
//! 7. **Property-Based Tests** - Randomised checks with proptest

use iso_core::marching_cubes::{FACE_CORNERS, MAX_LOOPS, NO_LOOP};
use iso_core::prelude::*;

// =============================================================================
// Test Helpers
// =============================================================================

/// Two distinct cube edges lying on a common face.
fn edges_share_face(a: usize, b: usize) -> bool {
    FACE_CORNERS.iter().any(|face| {
        let on_face = |e: usize| {
            let (p, q) = EDGE_VERTICES[e];
            face.contains(&p) && face.contains(&q)
        };
        on_face(a) && on_face(b)
    })
}

/// Corner of the neighbour cell along `axis` that coincides with `corner`,
/// which must lie on this cell's upper face.
fn neighbour_corner(corner: usize, axis: usize) -> usize {
    let mut offset = [
        CORNER_OFFSETS[corner].0,
        CORNER_OFFSETS[corner].1,
        CORNER_OFFSETS[corner].2,
    ];
    assert_eq!(offset[axis], 1);
    offset[axis] = 0;
    CORNER_OFFSETS
        .iter()
        .position(|&o| o == (offset[0], offset[1], offset[2]))
        .unwrap()
}

fn edge_of(a: usize, b: usize) -> usize {
    EDGE_VERTICES
        .iter()
        .position(|&(p, q)| (p == a && q == b) || (p == b && q == a))
        .unwrap()
}

/// Directed loop segments of `case` whose two edges both lie in `edges`.
fn segments_within(case: CubeCase, edges: &[usize]) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    for polygon in case.entry().loops() {
        let n = polygon.len();
        for i in 0..n {
            let a = polygon[i] as usize;
            let b = polygon[(i + 1) % n] as usize;
            if edges.contains(&a) && edges.contains(&b) {
                out.push((a, b));
            }
        }
    }
    out
}

fn face_has_four_crossings(case: CubeCase) -> bool {
    FACE_CORNERS.iter().any(|face| {
        (0..4)
            .filter(|&m| case.corner_inside(face[m]) != case.corner_inside(face[(m + 1) % 4]))
            .count()
            == 4
    })
}

// =============================================================================
// SECTION 1: Grid Type Tests
// =============================================================================

mod grid_tests {
    use super::*;

    #[test]
    fn should_index_in_c_order() {
        let dims = GridDims::new(3, 4, 5).unwrap();
        assert_eq!(dims.index(0, 0, 1), 1);
        assert_eq!(dims.index(0, 1, 0), 5);
        assert_eq!(dims.index(1, 0, 0), 20);
        assert_eq!(dims.len(), 60);
        assert_eq!(dims.num_cells(), 2 * 3 * 4);
    }

    #[test]
    fn should_roundtrip_index_and_coords() {
        let dims = GridDims::new(4, 3, 2).unwrap();
        for index in 0..dims.len() {
            let (i, j, k) = dims.coords(index);
            assert_eq!(dims.index(i, j, k), index);
        }
    }

    #[test]
    fn should_reject_axes_below_two_samples() {
        assert_eq!(
            GridDims::new(2, 1, 2),
            Err(IsoCoreError::GridTooSmall { axis: 1, size: 1 })
        );
        assert_eq!(
            GridDims::new(0, 5, 5),
            Err(IsoCoreError::GridTooSmall { axis: 0, size: 0 })
        );
        assert!(GridDims::new(2, 2, 2).is_ok());
    }

    #[test]
    fn should_reject_out_of_range_checked_index() {
        let dims = GridDims::new(2, 2, 2).unwrap();
        assert_eq!(dims.checked_index(-1, 0, 0), None);
        assert_eq!(dims.checked_index(0, 2, 0), None);
        assert_eq!(dims.checked_index(1, 1, 1), Some(7));
    }
}

// =============================================================================
// SECTION 2: Classification Tests
// =============================================================================

mod classification_tests {
    use super::*;

    #[test]
    fn should_treat_exact_zero_as_outside_for_every_pattern() {
        for bits in 0..=255u8 {
            let mut values = [0.0f64; 8];
            for (corner, v) in values.iter_mut().enumerate() {
                if (bits >> corner) & 1 == 1 {
                    *v = -1.0;
                } else if corner % 2 == 0 {
                    // alternate exact zero and negative zero on outside corners
                    *v = -0.0;
                }
            }
            assert_eq!(CubeCase::classify(&values).bits(), bits);
        }
    }

    #[test]
    fn should_classify_identically_on_repeated_calls() {
        for bits in 0..=255u8 {
            let values: [f32; 8] =
                core::array::from_fn(|c| if (bits >> c) & 1 == 1 { -0.25 } else { 0.0 });
            let first = CubeCase::classify(&values);
            for _ in 0..3 {
                let again = CubeCase::classify(&values);
                assert_eq!(first, again);
                assert_eq!(first.entry().edge_mask, again.entry().edge_mask);
            }
        }
    }

    #[test]
    fn should_agree_between_precisions() {
        for bits in 0..=255u8 {
            let v64: [f64; 8] =
                core::array::from_fn(|c| if (bits >> c) & 1 == 1 { -0.5 } else { 0.5 });
            let v32: [f32; 8] = core::array::from_fn(|c| v64[c] as f32);
            assert_eq!(CubeCase::classify(&v64), CubeCase::classify(&v32));
        }
    }
}

// =============================================================================
// SECTION 3: Table Invariant Tests
// =============================================================================

mod table_tests {
    use super::*;

    #[test]
    fn should_have_256_entries() {
        assert_eq!(CASE_TABLE.len(), 256);
    }

    #[test]
    fn should_put_every_active_edge_in_exactly_one_loop() {
        for bits in 0..=255u8 {
            let case = CubeCase::from_bits(bits);
            let entry = case.entry();
            let mut seen = [0u8; 12];
            for polygon in entry.loops() {
                for &e in polygon {
                    seen[e as usize] += 1;
                }
            }
            for e in 0..12 {
                let expected = u8::from(case.edge_active(e));
                assert_eq!(seen[e], expected, "case {} edge {}", bits, e);
            }
        }
    }

    #[test]
    fn should_have_consistent_edge_loop_map() {
        for entry in CASE_TABLE.iter() {
            for (index, polygon) in entry.loops().enumerate() {
                for &e in polygon {
                    assert_eq!(entry.edge_loop[e as usize] as usize, index);
                }
            }
            for e in 0..12 {
                if (entry.edge_mask >> e) & 1 == 0 {
                    assert_eq!(entry.edge_loop[e], NO_LOOP);
                }
            }
        }
    }

    #[test]
    fn should_have_loops_of_at_least_three_edges() {
        for entry in CASE_TABLE.iter() {
            assert!(entry.loop_count as usize <= MAX_LOOPS);
            let total: usize = entry.loop_lengths.iter().map(|&l| l as usize).sum();
            assert_eq!(total, entry.active_edges() as usize);
            for polygon in entry.loops() {
                assert!(polygon.len() >= 3);
            }
        }
    }

    #[test]
    fn should_connect_consecutive_loop_edges_through_a_face() {
        for (bits, entry) in CASE_TABLE.iter().enumerate() {
            for polygon in entry.loops() {
                let n = polygon.len();
                for i in 0..n {
                    let a = polygon[i] as usize;
                    let b = polygon[(i + 1) % n] as usize;
                    assert!(edges_share_face(a, b), "case {}: {} -> {}", bits, a, b);
                }
            }
        }
    }

    #[test]
    fn should_have_no_loops_for_trivial_cases() {
        assert_eq!(CASE_TABLE[0].loop_count, 0);
        assert_eq!(CASE_TABLE[255].loop_count, 0);
        for bits in 1..255usize {
            assert!(CASE_TABLE[bits].loop_count >= 1, "case {}", bits);
        }
    }

    #[test]
    fn should_share_edge_mask_with_complement() {
        for bits in 0..=255u8 {
            let case = CubeCase::from_bits(bits);
            assert_eq!(case.entry().edge_mask, case.complement().entry().edge_mask);
        }
    }

    #[test]
    fn should_reverse_loops_for_unambiguous_complements() {
        for bits in 0..=255u8 {
            let case = CubeCase::from_bits(bits);
            if face_has_four_crossings(case) {
                continue;
            }
            let mut forward = segments_within(case, &(0..12).collect::<Vec<_>>());
            let mut reversed: Vec<_> = segments_within(case.complement(), &(0..12).collect::<Vec<_>>())
                .into_iter()
                .map(|(a, b)| (b, a))
                .collect();
            forward.sort_unstable();
            reversed.sort_unstable();
            assert_eq!(forward, reversed, "case {}", bits);
        }
    }

    #[test]
    fn should_split_ambiguous_face_into_two_loops() {
        // Corners 0 and 2 inside: diagonal on the z = 0 face
        let entry = CubeCase::from_bits(0b0000_0101).entry();
        assert_eq!(entry.loop_count, 2);
        assert_eq!(entry.triangle_count(), 2);
    }

    #[test]
    fn should_count_triangles_from_loops() {
        for entry in CASE_TABLE.iter() {
            let expected: usize = entry.loops().map(|p| p.len() - 2).sum();
            assert_eq!(entry.triangle_count(), expected);
        }
    }

    #[test]
    fn should_keep_triangle_diagonals_off_cube_faces() {
        for bits in 0..=255u8 {
            let entry = CubeCase::from_bits(bits).entry();
            for tri in entry.triangles() {
                let loop_index = entry.edge_loop[tri[0] as usize];
                for s in 0..3 {
                    let (a, b) = (tri[s] as usize, tri[(s + 1) % 3] as usize);
                    assert_eq!(entry.edge_loop[b], loop_index, "case {}", bits);

                    let polygon = entry.loop_at(loop_index as usize);
                    let pa = polygon.iter().position(|&e| e as usize == a).unwrap();
                    let pb = polygon.iter().position(|&e| e as usize == b).unwrap();
                    let consecutive = (pa + 1) % polygon.len() == pb || (pb + 1) % polygon.len() == pa;
                    assert!(
                        consecutive || !edges_share_face(a, b),
                        "case {}: diagonal {}-{} lies on a cube face",
                        bits,
                        a,
                        b
                    );
                }
            }
        }
    }

    #[test]
    fn should_cover_loops_with_manifold_triangles() {
        use std::collections::HashMap;

        for bits in 0..=255u8 {
            let entry = CubeCase::from_bits(bits).entry();
            let mut directed: HashMap<(u8, u8), usize> = HashMap::new();
            for tri in entry.triangles() {
                for s in 0..3 {
                    *directed.entry((tri[s], tri[(s + 1) % 3])).or_default() += 1;
                }
            }

            let mut sides = 0;
            for polygon in entry.loops() {
                for (n, &a) in polygon.iter().enumerate() {
                    let b = polygon[(n + 1) % polygon.len()];
                    // each loop side is used once, with the loop's winding
                    assert_eq!(directed.get(&(a, b)), Some(&1), "case {}", bits);
                    assert_eq!(directed.get(&(b, a)), None, "case {}", bits);
                    sides += 1;
                }
            }

            // every other side is an interior diagonal, used once per direction
            for (&(a, b), &count) in &directed {
                assert_eq!(count, 1, "case {}", bits);
                let is_side = entry.loops().any(|p| {
                    (0..p.len()).any(|n| (p[n], p[(n + 1) % p.len()]) == (a, b))
                });
                if !is_side {
                    assert_eq!(directed.get(&(b, a)), Some(&1), "case {}", bits);
                }
            }
            assert!(sides <= directed.len(), "case {}", bits);
            assert_eq!(directed.len(), 3 * entry.triangle_count(), "case {}", bits);
        }
    }
}

// =============================================================================
// SECTION 4: Face Consistency Tests
// =============================================================================

mod face_consistency_tests {
    use super::*;

    /// For every axis, every pattern of the shared face and every pattern of
    /// the far corners, the two cells walk the shared face in opposite
    /// directions. This is what makes the extracted mesh closed and
    /// consistently oriented.
    #[test]
    fn should_traverse_shared_faces_in_opposite_directions() {
        for axis in 0..3 {
            let upper: Vec<usize> = (0..8)
                .filter(|&c| match axis {
                    0 => CORNER_OFFSETS[c].0 == 1,
                    1 => CORNER_OFFSETS[c].1 == 1,
                    _ => CORNER_OFFSETS[c].2 == 1,
                })
                .collect();
            let lower: Vec<usize> = (0..8).filter(|c| !upper.contains(c)).collect();

            let upper_edges: Vec<usize> = (0..12)
                .filter(|&e| {
                    let (p, q) = EDGE_VERTICES[e];
                    upper.contains(&p) && upper.contains(&q)
                })
                .collect();
            let edge_map: Vec<(usize, usize)> = upper_edges
                .iter()
                .map(|&e| {
                    let (p, q) = EDGE_VERTICES[e];
                    (e, edge_of(neighbour_corner(p, axis), neighbour_corner(q, axis)))
                })
                .collect();
            let lower_edges: Vec<usize> = edge_map.iter().map(|&(_, b)| b).collect();
            let map_edge = |e: usize| edge_map.iter().find(|&&(a, _)| a == e).unwrap().1;

            for a_bits in 0..=255u8 {
                let case_a = CubeCase::from_bits(a_bits);
                let mut a_segments: Vec<(usize, usize)> = segments_within(case_a, &upper_edges)
                    .into_iter()
                    .map(|(p, q)| (map_edge(p), map_edge(q)))
                    .collect();
                a_segments.sort_unstable();

                for far in 0..16u8 {
                    let mut b_bits = 0u8;
                    for &c in &upper {
                        if case_a.corner_inside(c) {
                            b_bits |= 1 << neighbour_corner(c, axis);
                        }
                    }
                    for (slot, &c) in upper.iter().enumerate() {
                        if (far >> slot) & 1 == 1 {
                            b_bits |= 1 << c;
                        }
                    }
                    let case_b = CubeCase::from_bits(b_bits);
                    for &c in &lower {
                        assert_eq!(case_b.corner_inside(c), {
                            let up = upper.iter().find(|&&u| neighbour_corner(u, axis) == c).unwrap();
                            case_a.corner_inside(*up)
                        });
                    }

                    let mut b_segments: Vec<(usize, usize)> = segments_within(case_b, &lower_edges)
                        .into_iter()
                        .map(|(p, q)| (q, p))
                        .collect();
                    b_segments.sort_unstable();

                    assert_eq!(
                        a_segments, b_segments,
                        "axis {} cases {} / {}",
                        axis, a_bits, b_bits
                    );
                }
            }
        }
    }
}

// =============================================================================
// SECTION 5: Interpolation Tests
// =============================================================================

mod interpolation_tests {
    use super::*;

    #[test]
    fn should_place_crossing_at_zero_of_linear_interpolant() {
        let cases = [(-1.0f64, 1.0), (-0.2, 0.6), (2.0, -6.0), (0.5, -0.0001)];
        for &(sa, sb) in &cases {
            let w = edge_weight(sa, sb);
            let value = sa + w.t * (sb - sa);
            assert!(value.abs() < 1e-12, "({}, {}) -> t = {}", sa, sb, w.t);
        }
    }

    #[test]
    fn should_move_crossing_towards_smaller_magnitude() {
        let near_a = edge_weight(-0.1f64, 0.9);
        let near_b = edge_weight(-0.9f64, 0.1);
        assert!(near_a.t < 0.5);
        assert!(near_b.t > 0.5);
    }

    #[test]
    fn should_follow_deformed_endpoints() {
        let w = edge_weight(-1.0f64, 1.0);
        let base = edge_crossing(Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), &w);
        let shift = Vec3::new(0.1, -0.2, 0.3);
        let moved = edge_crossing(shift, Vec3::new(1.0, 0.0, 0.0) + shift, &w);
        let diff = moved - base - shift;
        assert!(diff.length() < 1e-12);
    }

    #[test]
    fn should_spread_centroid_gradient_evenly() {
        let g = Vec3::new(3.0f64, -6.0, 9.0);
        let each = centroid_backward(g, 3);
        assert_eq!(each, Vec3::new(1.0, -2.0, 3.0));
        assert_eq!(centroid_backward(g, 0), Vec3::zero());
    }

    struct SumAccumulator {
        scalar: Vec<f64>,
        offset: Vec<Vec3<f64>>,
    }

    impl GradientAccumulator<f64> for SumAccumulator {
        fn accumulate_scalar(&mut self, index: usize, value: f64) {
            self.scalar[index] += value;
        }

        fn accumulate_offset(&mut self, index: usize, value: Vec3<f64>) {
            self.offset[index] += value;
        }
    }

    #[test]
    fn should_accumulate_shared_endpoint_from_two_edges() {
        // Samples 0 -- 1 -- 2 on a line, both edges active
        let s = [-1.0f64, 1.0, -3.0];
        let p = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
        ];
        let g = Vec3::new(1.0, 0.0, 0.0);

        let mut acc = SumAccumulator {
            scalar: vec![0.0; 3],
            offset: vec![Vec3::zero(); 3],
        };
        for &(a, b) in &[(0usize, 1usize), (1, 2)] {
            let w = edge_weight(s[a], s[b]);
            let grad = edge_crossing_backward(g, p[b] - p[a], &w);
            acc.accumulate_scalar(a, grad.scalar_a);
            acc.accumulate_scalar(b, grad.scalar_b);
            acc.accumulate_offset(a, grad.offset_a);
            acc.accumulate_offset(b, grad.offset_b);
        }

        // The middle sample feeds both crossings
        let w01 = edge_weight(s[0], s[1]);
        let w12 = edge_weight(s[1], s[2]);
        assert!((acc.scalar[1] - (w01.dt_db + w12.dt_da)).abs() < 1e-12);
        assert!((acc.offset[1].x - (w01.t + (1.0 - w12.t))).abs() < 1e-12);
    }
}

// =============================================================================
// SECTION 6: Error Type Tests
// =============================================================================

mod error_tests {
    use super::*;

    #[test]
    fn should_display_error_context() {
        let msg = format!("{}", IsoCoreError::GridTooSmall { axis: 0, size: 1 });
        assert!(msg.contains("axis 0"));
        let msg = format!("{}", IsoCoreError::NonFiniteScalar { corner: 6 });
        assert!(msg.contains('6'));
    }

    #[test]
    fn should_implement_std_error() {
        fn takes_error(_: &dyn std::error::Error) {}
        takes_error(&IsoCoreError::NonFiniteOffset { corner: 1 });
    }
}

// =============================================================================
// SECTION 7: Property-Based Tests
// =============================================================================

mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_edge_weight_in_unit_interval(
            sa in -10.0f64..-1e-6,
            sb in 1e-6f64..10.0,
        ) {
            let w = edge_weight(sa, sb);
            prop_assert!((0.0..=1.0).contains(&w.t));
            let r = edge_weight(sb, sa);
            prop_assert!((w.t + r.t - 1.0).abs() < 1e-12);
        }

        #[test]
        fn prop_edge_weight_monotonic(
            sa in -10.0f64..-1e-3,
            sb in 1e-3f64..10.0,
            delta in 1e-4f64..1e-2,
        ) {
            // Raising the inside value pulls the crossing towards it
            let w = edge_weight(sa, sb);
            let w2 = edge_weight(sa + delta.min(-sa / 2.0), sb);
            prop_assert!(w2.t <= w.t);
            prop_assert!(w.dt_da <= 0.0);
            prop_assert!(w.dt_db <= 0.0);
        }

        #[test]
        fn prop_derivatives_match_finite_difference(
            sa in -5.0f64..-0.1,
            sb in 0.1f64..5.0,
        ) {
            let h = 1e-6;
            let w = edge_weight(sa, sb);
            let fd_a = (edge_weight(sa + h, sb).t - edge_weight(sa - h, sb).t) / (2.0 * h);
            let fd_b = (edge_weight(sa, sb + h).t - edge_weight(sa, sb - h).t) / (2.0 * h);
            prop_assert!((w.dt_da - fd_a).abs() < 1e-5 * (1.0 + fd_a.abs()));
            prop_assert!((w.dt_db - fd_b).abs() < 1e-5 * (1.0 + fd_b.abs()));
        }
    }
}
