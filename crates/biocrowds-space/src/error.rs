//! Error types for space construction.

use thiserror::Error;

/// Errors arising from grid or index construction.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum SpaceError {
    /// The cell width is zero, negative or not finite.
    #[error("cell width must be finite and positive, got {width}")]
    InvalidCellWidth {
        /// The rejected width.
        width: f32,
    },
    /// The world extent is zero, negative or not finite on some axis.
    #[error("world extent must be finite and positive, got {x} x {z}")]
    InvalidExtent {
        /// Extent along x.
        x: f32,
        /// Extent along z.
        z: f32,
    },
}
