//! Traits shared between the core math and the storage crates.

use crate::real::Real;
use crate::types::Vec3;

/// Sink for gradients produced during backpropagation.
///
/// The backward pass reduces per-crossing contributions into whatever storage
/// the caller owns: a flat `Vec` in `iso_rs`, or host buffers that are later
/// uploaded as tensors in `neural_iso`. Indices are flat grid indices in
/// C order.
pub trait GradientAccumulator<T: Real> {
    /// Add `value` to `dL/ds` of sample `index`.
    fn accumulate_scalar(&mut self, index: usize, value: T);

    /// Add `value` to `dL/d(offset)` of sample `index`.
    fn accumulate_offset(&mut self, index: usize, value: Vec3<T>);
}
