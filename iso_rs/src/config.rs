//! Extraction configuration.

use iso_core::{GridDims, Real, Vec3};

use crate::error::{IsoError, Result};

/// Coordinate space of output vertices.
///
/// Vertices are computed in grid-index units (sample `(i, j, k)` sits at
/// `(i, j, k)` plus its offset) and then mapped per axis by an affine
/// transform. The backward pass applies the same per-axis scale.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum VertexSpace {
    /// Raw grid-index units.
    Index,
    /// Divide by `n - 1` per axis so the grid spans the unit cube.
    #[default]
    Normalized,
    /// Map the grid onto an axis-aligned box.
    Bounds {
        /// World position of sample `(0, 0, 0)`.
        min: [f64; 3],
        /// World position of sample `(nx - 1, ny - 1, nz - 1)`.
        max: [f64; 3],
    },
}

impl VertexSpace {
    /// Per-axis `(origin, scale)` of the index-to-output map for `dims`.
    pub fn affine<T: Real>(&self, dims: GridDims) -> (Vec3<T>, Vec3<T>) {
        let steps = |axis: usize| (dims.axis(axis) - 1) as f64;
        match *self {
            VertexSpace::Index => (Vec3::zero(), Vec3::splat(T::ONE)),
            VertexSpace::Normalized => (
                Vec3::zero(),
                Vec3::new(
                    T::from_f64(1.0 / steps(0)),
                    T::from_f64(1.0 / steps(1)),
                    T::from_f64(1.0 / steps(2)),
                ),
            ),
            VertexSpace::Bounds { min, max } => (
                Vec3::new(T::from_f64(min[0]), T::from_f64(min[1]), T::from_f64(min[2])),
                Vec3::new(
                    T::from_f64((max[0] - min[0]) / steps(0)),
                    T::from_f64((max[1] - min[1]) / steps(1)),
                    T::from_f64((max[2] - min[2]) / steps(2)),
                ),
            ),
        }
    }
}

/// Configuration shared by both extraction variants.
///
/// # Example
///
/// ```ignore
/// let config = ExtractConfig::default()
///     .with_bounds([-1.0; 3], [1.0; 3])
///     .with_num_threads(4);
/// config.validate()?;
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractConfig {
    /// Surround the grid with one layer of virtual `+1` samples so surfaces
    /// touching the boundary are closed.
    ///
    /// Crossings towards the padding lie between index `-1` and `0` (or `n - 1`
    /// and `n`), so with [`VertexSpace::Normalized`] such vertices fall outside
    /// `[0, 1]`.
    pub pad_boundary: bool,
    /// Output coordinate space.
    pub space: VertexSpace,
    /// Worker threads for the parallel stages (0 = rayon's global pool).
    pub num_threads: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            pad_boundary: true,
            space: VertexSpace::Normalized,
            num_threads: 0,
        }
    }
}

impl ExtractConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable boundary padding.
    pub fn with_padding(mut self, pad_boundary: bool) -> Self {
        self.pad_boundary = pad_boundary;
        self
    }

    /// Set the output coordinate space.
    pub fn with_space(mut self, space: VertexSpace) -> Self {
        self.space = space;
        self
    }

    /// Map the grid onto the box `[min, max]`.
    pub fn with_bounds(self, min: [f64; 3], max: [f64; 3]) -> Self {
        self.with_space(VertexSpace::Bounds { min, max })
    }

    /// Set the number of worker threads.
    pub fn with_num_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = num_threads;
        self
    }

    /// Check the configuration for values no extraction can use.
    pub fn validate(&self) -> Result<()> {
        if let VertexSpace::Bounds { min, max } = self.space {
            for axis in 0..3 {
                if !min[axis].is_finite() || !max[axis].is_finite() {
                    return Err(IsoError::InvalidConfig {
                        message: format!("bounds on axis {} must be finite", axis),
                    });
                }
                if max[axis] <= min[axis] {
                    return Err(IsoError::InvalidConfig {
                        message: format!(
                            "bounds on axis {} are empty: min {} >= max {}",
                            axis, min[axis], max[axis]
                        ),
                    });
                }
            }
        }
        #[cfg(not(feature = "parallel"))]
        if self.num_threads > 1 {
            log::warn!(
                "num_threads = {} ignored: iso_rs was built without the `parallel` feature",
                self.num_threads
            );
        }
        Ok(())
    }
}
