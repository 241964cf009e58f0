//! Voxel grid and `.vox` codec error types.

/// Errors raised while building a [`VoxelGrid`](crate::VoxelGrid) or while
/// encoding/decoding it.
#[derive(Debug, thiserror::Error)]
pub enum VoxError {
    /// A grid dimension is zero or exceeds what a byte coordinate can address.
    #[error("invalid grid dimensions {x}x{y}x{z} (each must be in 1..={max})")]
    InvalidDimension {
        x: u32,
        y: u32,
        z: u32,
        max: u32,
    },

    /// A palette was assigned with the wrong number of entries.
    #[error("palette must have {expected} entries, got {actual}")]
    PaletteLengthMismatch { expected: usize, actual: usize },

    /// The data does not start with the `VOX ` magic.
    #[error("invalid magic bytes, expected \"VOX \"")]
    BadMagic,

    /// Structural violation: truncation, inconsistent lengths or a missing chunk.
    #[error("corrupt vox data: {0}")]
    CorruptData(String),

    /// A voxel position outside the grid, from a decoded record or a write.
    #[error("voxel ({x}, {y}, {z}) lies outside the grid")]
    OutOfBounds { x: u32, y: u32, z: u32 },

    /// A chunk tag longer than four bytes or containing non-ASCII characters.
    #[error("invalid chunk id {0:?}")]
    InvalidChunkId(String),

    /// File open/create/read/write failure.
    #[error("vox i/o error: {0}")]
    Io(#[from] std::io::Error),
}
