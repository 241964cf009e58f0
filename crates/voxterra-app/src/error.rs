use voxterra_config::ConfigError;
use voxterra_terrain::TerrainError;
use voxterra_voxel::VoxError;

/// Everything that can stop a run of the binary.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Terrain(#[from] TerrainError),

    #[error(transparent)]
    Vox(#[from] VoxError),

    #[error("preview of {width}x{height} pixels exceeds PNG dimensions")]
    PreviewTooLarge { width: usize, height: usize },

    #[error("failed to encode preview: {0}")]
    Preview(#[from] png::EncodingError),

    #[error("platform I/O error: {0}")]
    Io(#[from] std::io::Error),
}
