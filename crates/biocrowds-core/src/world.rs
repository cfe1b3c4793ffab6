//! The rectangular world the crowd walks on.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Extent of the walkable ground plane, `[0, x] × [0, z]`.
///
/// The vertical axis is unbounded; only `x` and `z` are clamped.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldExtent {
    /// Size along the x axis.
    pub x: f32,
    /// Size along the z axis.
    pub z: f32,
}

impl WorldExtent {
    /// Create an extent of `x` by `z` units.
    pub fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    /// Whether both axes are finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        self.x.is_finite() && self.z.is_finite() && self.x > 0.0 && self.z > 0.0
    }

    /// Clamp each horizontal axis independently into the world.
    ///
    /// A coordinate beyond a boundary lands exactly on it. `y` is returned
    /// unchanged.
    pub fn clamp(&self, p: Vec3) -> Vec3 {
        Vec3::new(p.x.clamp(0.0, self.x), p.y, p.z.clamp(0.0, self.z))
    }

    /// Whether `p` lies inside the world rectangle (boundaries included).
    pub fn contains(&self, p: Vec3) -> bool {
        (0.0..=self.x).contains(&p.x) && (0.0..=self.z).contains(&p.z)
    }
}

impl Default for WorldExtent {
    fn default() -> Self {
        Self { x: 100.0, z: 50.0 }
    }
}
