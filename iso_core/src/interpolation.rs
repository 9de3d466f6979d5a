//! Differentiable vertex placement with analytical gradients.
//!
//! Provides forward and backward passes for the two vertex rules used by the
//! extractors:
//!
//! - **Edge crossing**: a point on a cell edge where the linear interpolant of
//!   the endpoint values is zero. Both endpoints may be displaced by a
//!   deformation offset before interpolating.
//! - **Loop centroid**: the mean of the edge crossings of one polygon loop,
//!   used as the dual vertex of a cell.
//!
//! For an edge with endpoint values `sa`, `sb` and deformed endpoint positions
//! `pa`, `pb`:
//!
//! ```text
//! t      = sa / (sa - sb)            clamped to [0, 1]
//! v      = pa + t (pb - pa)
//! dt/dsa = -sb / (sa - sb)^2
//! dt/dsb =  sa / (sa - sb)^2
//! dv/dpa = (1 - t) I,  dv/dpb = t I
//! ```
//!
//! The classification that decided which edges are active carries no gradient.

use crate::real::Real;
use crate::types::Vec3;

/// Interpolation parameter of an edge crossing and its partial derivatives.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EdgeWeight<T> {
    /// Position along the edge, 0 at the lower endpoint and 1 at the upper.
    pub t: T,
    /// `dt / dsa`.
    pub dt_da: T,
    /// `dt / dsb`.
    pub dt_db: T,
}

/// Gradient of a loss with respect to the inputs of one edge crossing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EdgeGradient<T> {
    /// `dL / dsa`.
    pub scalar_a: T,
    /// `dL / dsb`.
    pub scalar_b: T,
    /// `dL / dpa`, i.e. the gradient on the lower endpoint's offset.
    pub offset_a: Vec3<T>,
    /// `dL / dpb`.
    pub offset_b: Vec3<T>,
}

/// Compute the crossing parameter of the edge between values `sa` and `sb`.
///
/// When `|sa - sb|` is below [`Real::TINY`] the crossing is placed at the edge
/// midpoint and both derivatives are zero. A parameter that has to be clamped
/// into `[0, 1]` also reports zero derivatives, since the clamp is flat there.
#[inline]
pub fn edge_weight<T: Real>(sa: T, sb: T) -> EdgeWeight<T> {
    let denom = sa - sb;
    if !(denom.abs() >= T::TINY) {
        return EdgeWeight {
            t: T::HALF,
            dt_da: T::ZERO,
            dt_db: T::ZERO,
        };
    }

    let t = sa / denom;
    if t < T::ZERO || t > T::ONE {
        return EdgeWeight {
            t: t.clamp_to(T::ZERO, T::ONE),
            dt_da: T::ZERO,
            dt_db: T::ZERO,
        };
    }

    // Divide twice instead of squaring so tiny denominators do not overflow.
    EdgeWeight {
        t,
        dt_da: -(sb / denom) / denom,
        dt_db: (sa / denom) / denom,
    }
}

/// Position of the crossing between deformed endpoints `pa` and `pb`.
#[inline]
pub fn edge_crossing<T: Real>(pa: Vec3<T>, pb: Vec3<T>, weight: &EdgeWeight<T>) -> Vec3<T> {
    pa.lerp(pb, weight.t)
}

/// Backward pass through [`edge_crossing`].
///
/// `span` is `pb - pa` from the forward pass and `grad` is `dL/dv`.
#[inline]
pub fn edge_crossing_backward<T: Real>(
    grad: Vec3<T>,
    span: Vec3<T>,
    weight: &EdgeWeight<T>,
) -> EdgeGradient<T> {
    let dl_dt = grad.dot(span);
    EdgeGradient {
        scalar_a: dl_dt * weight.dt_da,
        scalar_b: dl_dt * weight.dt_db,
        offset_a: grad * (T::ONE - weight.t),
        offset_b: grad * weight.t,
    }
}

/// Mean of a set of points. Returns the origin for an empty slice.
#[inline]
pub fn centroid<T: Real>(points: &[Vec3<T>]) -> Vec3<T> {
    if points.is_empty() {
        return Vec3::zero();
    }
    let mut sum = Vec3::zero();
    for &p in points {
        sum += p;
    }
    sum / T::from_usize(points.len())
}

/// Backward pass through [`centroid`]: every member receives `grad / count`.
#[inline]
pub fn centroid_backward<T: Real>(grad: Vec3<T>, count: usize) -> Vec3<T> {
    if count == 0 {
        return Vec3::zero();
    }
    grad / T::from_usize(count)
}

/// Bound a raw offset to `(-bound, bound)` with `bound * tanh(raw)`.
#[inline]
pub fn saturate<T: Real>(raw: T, bound: T) -> T {
    bound * raw.tanh()
}

/// Derivative of [`saturate`] with respect to `raw`.
#[inline]
pub fn saturate_derivative<T: Real>(raw: T, bound: T) -> T {
    let th = raw.tanh();
    bound * (T::ONE - th * th)
}
