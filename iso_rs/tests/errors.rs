//! Every error the public API can report, and the inputs that are not errors.

use iso_rs::{
    backward, dual_marching_cubes, marching_cubes, DeformField, DiffMc, DualMc, ExtractConfig,
    IsoCoreError, IsoError, ScalarField,
};

fn plane(shape: [usize; 3]) -> ScalarField<f64> {
    // Surface at x = 1.5
    ScalarField::from_fn(shape, |i, _, _| i as f64 - 1.5).unwrap()
}

// =============================================================================
// Shape Errors
// =============================================================================

#[test]
fn should_reject_too_small_grids() {
    for shape in [[1, 4, 4], [4, 1, 4], [4, 4, 0]] {
        let len = shape.iter().product();
        match ScalarField::new(shape, vec![0.0f32; len]) {
            Err(IsoError::GridTooSmall { axis, size }) => {
                assert_eq!(size, shape[axis as usize]);
            }
            other => panic!("expected GridTooSmall for {:?}, got {:?}", shape, other),
        }
    }
    assert!(matches!(
        DeformField::<f64>::zeros([2, 2, 1]),
        Err(IsoError::GridTooSmall { axis: 2, size: 1 })
    ));
}

#[test]
fn should_reject_mismatched_buffers() {
    assert!(matches!(
        ScalarField::new([3, 3, 3], vec![0.0f64; 26]),
        Err(IsoError::ShapeMismatch { .. })
    ));
    assert!(matches!(
        DeformField::new([3, 3, 3], vec![[0.0f64; 3]; 28]),
        Err(IsoError::ShapeMismatch { .. })
    ));
}

#[test]
fn should_reject_deformation_on_another_grid_before_any_work() {
    // The scalar field holds a NaN in an active cell; the shape check wins
    let mut field = plane([4, 4, 4]);
    field.values_mut()[20] = f64::NAN;
    let deform = DeformField::zeros([4, 4, 5]).unwrap();

    for result in [
        marching_cubes(&field, Some(&deform), &ExtractConfig::default()).map(|_| ()),
        dual_marching_cubes(&field, Some(&deform), &ExtractConfig::default()).map(|_| ()),
    ] {
        match result {
            Err(IsoError::ShapeMismatch { expected, got }) => {
                assert_eq!(expected, vec![4, 4, 4, 3]);
                assert_eq!(got, vec![4, 4, 5, 3]);
            }
            other => panic!("expected ShapeMismatch, got {:?}", other),
        }
    }
}

#[test]
fn should_reject_upstream_of_wrong_length() {
    let out = marching_cubes(&plane([4, 4, 4]), None, &ExtractConfig::default()).unwrap();
    let n = out.mesh.num_vertices();
    match backward(&out.record, &vec![[0.0; 3]; n + 1]) {
        Err(IsoError::ShapeMismatch { expected, got }) => {
            assert_eq!(expected, vec![n, 3]);
            assert_eq!(got, vec![n + 1, 3]);
        }
        other => panic!("expected ShapeMismatch, got {:?}", other),
    }
}

// =============================================================================
// Degenerate Input
// =============================================================================

#[test]
fn should_report_non_finite_scalars_in_active_cells() {
    let mut field = plane([4, 4, 4]);
    let dims = field.dims();
    field.values_mut()[dims.index(1, 2, 2)] = f64::NAN;
    let config = ExtractConfig::default().with_padding(false);

    for result in [
        marching_cubes(&field, None, &config).map(|_| ()),
        dual_marching_cubes(&field, None, &config).map(|_| ()),
    ] {
        match result {
            Err(IsoError::DegenerateInput { index, cell, source }) => {
                assert_eq!(index, dims.index(1, 2, 2));
                // NaN counts as outside, so the all-inside cell (0, 1, 1)
                // becomes active and is the first to read it
                assert_eq!(cell, [0, 1, 1]);
                assert!(matches!(source, IsoCoreError::NonFiniteScalar { .. }));
            }
            other => panic!("expected DegenerateInput, got {:?}", other),
        }
    }
}

#[test]
fn should_report_non_finite_offsets_in_active_cells() {
    let field = plane([4, 4, 4]);
    let dims = field.dims();
    let mut offsets = vec![[0.0f64; 3]; 64];
    offsets[dims.index(2, 0, 0)] = [0.0, f64::INFINITY, 0.0];
    let deform = DeformField::new([4, 4, 4], offsets).unwrap();

    match marching_cubes(&field, Some(&deform), &ExtractConfig::default()) {
        Err(IsoError::DegenerateInput { index, cell, source }) => {
            assert_eq!(index, dims.index(2, 0, 0));
            // Padded cell at grid coordinates (1, -1, -1) is the first to read it
            assert_eq!(cell, [1, -1, -1]);
            assert!(matches!(source, IsoCoreError::NonFiniteOffset { .. }));
        }
        other => panic!("expected DegenerateInput, got {:?}", other),
    }
}

#[test]
fn should_ignore_non_finite_values_outside_the_surface() {
    let mut field = plane([4, 4, 4]);
    // Sample (3, 3, 3) only touches cells with x in 2..=3, all outside
    field.values_mut()[63] = f64::INFINITY;
    let config = ExtractConfig::default().with_padding(false);

    let out = marching_cubes(&field, None, &config).unwrap();
    assert!(!out.mesh.is_empty());
}

// =============================================================================
// Configuration and State
// =============================================================================

#[test]
fn should_reject_invalid_bounds() {
    let field = plane([4, 4, 4]);
    let config = ExtractConfig::default().with_bounds([0.0, 0.0, 0.0], [1.0, -1.0, 1.0]);
    assert!(matches!(
        marching_cubes(&field, None, &config),
        Err(IsoError::InvalidConfig { .. })
    ));
    assert!(matches!(
        dual_marching_cubes(&field, None, &config),
        Err(IsoError::InvalidConfig { .. })
    ));
}

#[test]
fn should_require_forward_before_backward() {
    let mc = DiffMc::<f64>::new(ExtractConfig::default());
    assert!(matches!(mc.backward(&[]), Err(IsoError::BackwardWithoutForward)));

    let dual = DualMc::<f64>::new(ExtractConfig::default());
    assert!(matches!(dual.backward(&[]), Err(IsoError::BackwardWithoutForward)));
}

#[test]
fn should_describe_thread_pool_failures() {
    let err = IsoError::ThreadPool("the global thread pool has already been initialized".into());
    assert!(err.to_string().starts_with("failed to build thread pool"));
}

// =============================================================================
// Non-Errors
// =============================================================================

#[test]
fn should_return_empty_results_for_fields_without_sign_change() {
    for value in [1.0f64, 0.0, -0.0] {
        let field = ScalarField::new([5, 5, 5], vec![value; 125]).unwrap();
        let deform = DeformField::zeros([5, 5, 5]).unwrap();

        let out = marching_cubes(&field, Some(&deform), &ExtractConfig::default()).unwrap();
        assert!(out.mesh.is_empty());
        assert_eq!(out.mesh.num_vertices(), 0);

        let grads = backward(&out.record, &[]).unwrap();
        assert!(grads.scalar.iter().all(|&g| g == 0.0));
        assert!(grads.deformation.unwrap().iter().all(|g| *g == [0.0; 3]));

        let out = dual_marching_cubes(&field, None, &ExtractConfig::default()).unwrap();
        assert!(out.mesh.is_empty());
    }
}
