//! The odd-key cell scheme.

use crate::error::SpaceError;
use biocrowds_core::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ring offsets in key units: the home cell first, then N, S, W, E, NW, NE, SW, SE.
const RING_OFFSETS: [(i32, i32); 9] = [
    (0, 0),
    (-2, 0),
    (2, 0),
    (0, -2),
    (0, 2),
    (-2, -2),
    (-2, 2),
    (2, -2),
    (2, 2),
];

/// Name of one grid cell.
///
/// Both components are always odd: `floor(p / W) * 2 + 1`. Adjacent cells
/// differ by exactly 2 on an axis.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct CellKey {
    /// Key along x.
    pub x: i32,
    /// Key along z.
    pub z: i32,
}

impl CellKey {
    /// Construct a key from raw components.
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Whether `other` is this cell or one of its 8 neighbours.
    pub fn is_adjacent(&self, other: &CellKey) -> bool {
        (self.x - other.x).abs() <= 2 && (self.z - other.z).abs() <= 2
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Uniform square cells of side `width` covering the ground plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellGrid {
    width: f32,
}

impl CellGrid {
    /// Returns `Err(SpaceError::InvalidCellWidth)` unless `width` is finite
    /// and strictly positive.
    pub fn new(width: f32) -> Result<Self, SpaceError> {
        if !width.is_finite() || width <= 0.0 {
            return Err(SpaceError::InvalidCellWidth { width });
        }
        Ok(Self { width })
    }

    /// Side length of one cell.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Key of the cell containing `p`. Only `x` and `z` matter.
    pub fn key_for(&self, p: Vec3) -> CellKey {
        CellKey {
            x: (p.x / self.width).floor() as i32 * 2 + 1,
            z: (p.z / self.width).floor() as i32 * 2 + 1,
        }
    }

    /// The home cell followed by its 8 lateral neighbours.
    pub fn ring(&self, key: CellKey) -> [CellKey; 9] {
        RING_OFFSETS.map(|(dx, dz)| CellKey::new(key.x + dx, key.z + dz))
    }

    /// Centre of a cell on the ground plane.
    pub fn center(&self, key: CellKey) -> Vec3 {
        let half = self.width * 0.5;
        Vec3::new(key.x as f32 * half, 0.0, key.z as f32 * half)
    }
}
