//! Cell classification.
//!
//! A cell's case is the 8-bit pattern of which corners lie inside the
//! surface. Classification is the only discrete step of extraction: its result
//! selects topology and is treated as a constant by the backward pass.

use crate::real::Real;

use super::tables::{CaseEntry, CASE_TABLE, EDGE_VERTICES};

/// Inside/outside test used for every sample.
///
/// A value is inside iff it is strictly below zero. Zero (including `-0.0`)
/// and NaN are outside, i.e. an exact zero behaves like a vanishingly small
/// positive value. The same rule applies to every cell that shares the
/// sample, which keeps adjacent cells consistent.
#[inline]
pub fn is_inside<T: Real>(value: T) -> bool {
    value < T::ZERO
}

/// Corner-sign pattern of a cell: bit `i` is set iff corner `i` is inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct CubeCase(u8);

impl CubeCase {
    /// All corners outside.
    pub const EMPTY: Self = Self(0);
    /// All corners inside.
    pub const FULL: Self = Self(u8::MAX);

    /// Build a case from raw corner bits.
    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Classify a cell from its 8 corner values (corner order of
    /// [`CORNER_OFFSETS`](super::CORNER_OFFSETS)).
    #[inline]
    pub fn classify<T: Real>(corner_values: &[T; 8]) -> Self {
        let mut bits = 0u8;
        for (i, &value) in corner_values.iter().enumerate() {
            if is_inside(value) {
                bits |= 1 << i;
            }
        }
        Self(bits)
    }

    /// Raw corner bits.
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// `true` if every corner has the same sign, so the cell holds no surface.
    #[inline]
    pub const fn is_trivial(self) -> bool {
        self.0 == 0 || self.0 == u8::MAX
    }

    /// `true` if corner `corner` is inside.
    #[inline]
    pub const fn corner_inside(self, corner: usize) -> bool {
        (self.0 >> corner) & 1 == 1
    }

    /// `true` if edge `edge` has endpoints of opposite sign.
    #[inline]
    pub const fn edge_active(self, edge: usize) -> bool {
        let (a, b) = EDGE_VERTICES[edge];
        self.corner_inside(a) != self.corner_inside(b)
    }

    /// Topology table entry for this case.
    #[inline]
    pub fn entry(self) -> &'static CaseEntry {
        &CASE_TABLE[self.0 as usize]
    }

    /// The case with every corner flipped.
    #[inline]
    pub const fn complement(self) -> Self {
        Self(!self.0)
    }
}
