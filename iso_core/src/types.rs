//! Core types shared by every extraction stage.
//!
//! Provides the generic 3-vector, grid dimensions with C-order indexing, and
//! integer cell coordinates.

use core::ops::{Add, AddAssign, Div, Index, Mul, Neg, Sub};

use crate::error::IsoCoreError;
use crate::real::Real;

/// A 3D vector or point with named fields.
///
/// Used for grid-space positions, deformation offsets, output vertices and
/// their gradients.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3<T> {
    /// X component.
    pub x: T,
    /// Y component.
    pub y: T,
    /// Z component.
    pub z: T,
}

impl<T: Real> Vec3<T> {
    /// Create a new vector.
    #[inline]
    pub const fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }

    /// The zero vector.
    #[inline]
    pub const fn zero() -> Self {
        Self {
            x: T::ZERO,
            y: T::ZERO,
            z: T::ZERO,
        }
    }

    /// Create a vector with all components set to the same value.
    #[inline]
    pub fn splat(v: T) -> Self {
        Self { x: v, y: v, z: v }
    }

    /// Integer grid coordinates as a position.
    #[inline]
    pub fn from_grid(i: isize, j: isize, k: isize) -> Self {
        Self {
            x: signed_to_real(i),
            y: signed_to_real(j),
            z: signed_to_real(k),
        }
    }

    /// Convert to an array.
    #[inline]
    pub fn to_array(self) -> [T; 3] {
        [self.x, self.y, self.z]
    }

    /// Linear interpolation: `self + (other - self) * t`.
    #[inline]
    pub fn lerp(self, other: Self, t: T) -> Self {
        self + (other - self) * t
    }

    /// Dot product.
    #[inline]
    pub fn dot(self, other: Self) -> T {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product.
    #[inline]
    pub fn cross(self, other: Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Component-wise product.
    #[inline]
    pub fn mul_elem(self, other: Self) -> Self {
        Self {
            x: self.x * other.x,
            y: self.y * other.y,
            z: self.z * other.z,
        }
    }

    /// Squared length.
    #[inline]
    pub fn length_squared(self) -> T {
        self.dot(self)
    }

    /// Euclidean length.
    #[inline]
    pub fn length(self) -> T {
        self.length_squared().sqrt()
    }

    /// Component-wise minimum.
    #[inline]
    pub fn min(self, other: Self) -> Self {
        Self {
            x: if self.x < other.x { self.x } else { other.x },
            y: if self.y < other.y { self.y } else { other.y },
            z: if self.z < other.z { self.z } else { other.z },
        }
    }

    /// Component-wise maximum.
    #[inline]
    pub fn max(self, other: Self) -> Self {
        Self {
            x: if self.x > other.x { self.x } else { other.x },
            y: if self.y > other.y { self.y } else { other.y },
            z: if self.z > other.z { self.z } else { other.z },
        }
    }

    /// `true` if every component is finite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

#[inline]
fn signed_to_real<T: Real>(v: isize) -> T {
    if v < 0 {
        -T::from_usize(v.unsigned_abs())
    } else {
        T::from_usize(v as usize)
    }
}

impl<T: Real> From<[T; 3]> for Vec3<T> {
    #[inline]
    fn from(arr: [T; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }
}

impl<T: Real> From<Vec3<T>> for [T; 3] {
    #[inline]
    fn from(v: Vec3<T>) -> Self {
        v.to_array()
    }
}

impl<T: Real> Add for Vec3<T> {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl<T: Real> AddAssign for Vec3<T> {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
        self.z += other.z;
    }
}

impl<T: Real> Sub for Vec3<T> {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl<T: Real> Mul<T> for Vec3<T> {
    type Output = Self;

    #[inline]
    fn mul(self, scalar: T) -> Self {
        Self::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }
}

impl<T: Real> Div<T> for Vec3<T> {
    type Output = Self;

    #[inline]
    fn div(self, scalar: T) -> Self {
        Self::new(self.x / scalar, self.y / scalar, self.z / scalar)
    }
}

impl<T: Real> Neg for Vec3<T> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl<T> Index<usize> for Vec3<T> {
    type Output = T;

    #[inline]
    fn index(&self, axis: usize) -> &T {
        match axis {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Vec3 axis {} out of range", axis),
        }
    }
}

/// Shape `(nx, ny, nz)` of a regular sample grid.
///
/// Samples are stored in C order: the linear index of `(i, j, k)` is
/// `(i * ny + j) * nz + k`, matching a row-major `[nx, ny, nz]` array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridDims {
    /// Samples along x.
    pub nx: usize,
    /// Samples along y.
    pub ny: usize,
    /// Samples along z.
    pub nz: usize,
}

impl GridDims {
    /// Create grid dimensions, requiring at least two samples per axis.
    pub fn new(nx: usize, ny: usize, nz: usize) -> Result<Self, IsoCoreError> {
        let dims = Self { nx, ny, nz };
        for axis in 0..3 {
            let size = dims.axis(axis);
            if size < 2 {
                return Err(IsoCoreError::GridTooSmall {
                    axis: axis as u8,
                    size,
                });
            }
        }
        Ok(dims)
    }

    /// Create grid dimensions without validation.
    #[inline]
    pub const fn new_unchecked(nx: usize, ny: usize, nz: usize) -> Self {
        Self { nx, ny, nz }
    }

    /// Number of samples along the given axis (0 = x, 1 = y, 2 = z).
    #[inline]
    pub const fn axis(&self, axis: usize) -> usize {
        match axis {
            0 => self.nx,
            1 => self.ny,
            _ => self.nz,
        }
    }

    /// Total number of samples.
    #[inline]
    pub const fn len(&self) -> usize {
        self.nx * self.ny * self.nz
    }

    /// `true` if the grid holds no samples.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Shape as an array, for error reporting.
    #[inline]
    pub const fn shape(&self) -> [usize; 3] {
        [self.nx, self.ny, self.nz]
    }

    /// Number of cells (`(nx - 1) * (ny - 1) * (nz - 1)`).
    #[inline]
    pub const fn num_cells(&self) -> usize {
        self.nx.saturating_sub(1) * self.ny.saturating_sub(1) * self.nz.saturating_sub(1)
    }

    /// Linear index of sample `(i, j, k)`.
    #[inline]
    pub const fn index(&self, i: usize, j: usize, k: usize) -> usize {
        (i * self.ny + j) * self.nz + k
    }

    /// Inverse of [`GridDims::index`].
    #[inline]
    pub const fn coords(&self, index: usize) -> (usize, usize, usize) {
        let k = index % self.nz;
        let rest = index / self.nz;
        (rest / self.ny, rest % self.ny, k)
    }

    /// Linear index of sample `(i, j, k)` given signed coordinates, or `None`
    /// if the coordinates fall outside the grid.
    #[inline]
    pub fn checked_index(&self, i: isize, j: isize, k: isize) -> Option<usize> {
        if i < 0 || j < 0 || k < 0 {
            return None;
        }
        let (i, j, k) = (i as usize, j as usize, k as usize);
        if i >= self.nx || j >= self.ny || k >= self.nz {
            return None;
        }
        Some(self.index(i, j, k))
    }
}

/// Integer coordinates of a cell (the cell spans samples `x..=x+1` etc.).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct CellCoord {
    /// X index.
    pub x: usize,
    /// Y index.
    pub y: usize,
    /// Z index.
    pub z: usize,
}

impl CellCoord {
    /// Create a new cell coordinate.
    #[inline]
    pub const fn new(x: usize, y: usize, z: usize) -> Self {
        Self { x, y, z }
    }

    /// Flat index of this cell among the cells of a grid with `dims` samples.
    #[inline]
    pub const fn flat_index(&self, dims: GridDims) -> usize {
        (self.x * (dims.ny - 1) + self.y) * (dims.nz - 1) + self.z
    }

    /// Inverse of [`CellCoord::flat_index`].
    #[inline]
    pub const fn from_flat_index(index: usize, dims: GridDims) -> Self {
        let cz = dims.nz - 1;
        let cy = dims.ny - 1;
        let z = index % cz;
        let rest = index / cz;
        Self {
            x: rest / cy,
            y: rest % cy,
            z,
        }
    }
}
