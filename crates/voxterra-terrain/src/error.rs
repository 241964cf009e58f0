//! Terrain generation error types.

use voxterra_voxel::VoxError;

use crate::generator::GeneratorKind;

/// Errors raised by height-field construction, generation and voxel export.
#[derive(Debug, thiserror::Error)]
pub enum TerrainError {
    /// Width or length is zero, or the height limit is not a positive finite number.
    #[error("invalid height field dimensions {width}x{length} with height limit {height_limit}")]
    InvalidDimension {
        width: usize,
        length: usize,
        height_limit: f64,
    },

    /// Every cell has the same height, so there is no range to rescale.
    #[error("height field is flat at {height}; it cannot be normalized")]
    DegenerateField { height: f64 },

    /// The active generator has no voxel export.
    #[error("{0} generator does not support voxel export")]
    ExportUnsupported(GeneratorKind),

    /// Building the voxel grid failed.
    #[error(transparent)]
    Voxel(#[from] VoxError),
}
