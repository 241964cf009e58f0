//! The two things the binary does: generate a model from the config, or
//! summarize an existing `.vox` file.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use voxterra_config::Config;
use voxterra_terrain::{GeneratorKind, Session};
use voxterra_voxel::VoxelGrid;

use crate::error::AppError;
use crate::png_export::write_png;

/// Outcome of a generation run.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationReport {
    pub generator: GeneratorKind,
    pub seed: u32,
    pub dimensions: (u32, u32, u32),
    pub voxel_count: usize,
    pub output: PathBuf,
    pub preview: Option<PathBuf>,
}

/// Summary of a decoded `.vox` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoxSummary {
    pub dimensions: (u32, u32, u32),
    pub voxel_count: usize,
    pub has_palette: bool,
    /// Distinct color indices referenced by voxels.
    pub colors_used: usize,
}

impl VoxSummary {
    pub fn of(grid: &VoxelGrid) -> Self {
        let colors: BTreeSet<u8> = grid
            .voxels()
            .iter()
            .filter(|v| !v.empty)
            .map(|v| v.color)
            .collect();
        Self {
            dimensions: grid.dimensions(),
            voxel_count: grid.count(),
            has_palette: grid.palette().is_some(),
            colors_used: colors.len(),
        }
    }
}

/// Generates terrain from `config`, writes the optional preview and saves the
/// voxel model.
///
/// The preview is written before export, so generators without voxel
/// export still leave a preview behind before the run fails.
pub fn generate(config: &Config) -> Result<GenerationReport, AppError> {
    config.validate()?;

    let mut session = Session::configure(config.session_params())?;
    session.generate()?;

    let gradient = &config.export.gradient;
    if let Some(path) = &config.export.preview {
        write_png(path, &session.preview(gradient).image)?;
    }

    let grid = session.export_voxels(gradient, &config.export.voxelize)?;
    grid.save(&config.export.output)?;
    tracing::info!(
        "saved {} voxels to {}",
        grid.count(),
        config.export.output.display()
    );

    Ok(GenerationReport {
        generator: session.kind(),
        seed: session.seed(),
        dimensions: grid.dimensions(),
        voxel_count: grid.count(),
        output: config.export.output.clone(),
        preview: config.export.preview.clone(),
    })
}

/// Loads and summarizes the model at `path`.
pub fn inspect(path: &Path) -> Result<VoxSummary, AppError> {
    let grid = VoxelGrid::load(path)?;
    let summary = VoxSummary::of(&grid);
    let (x, y, z) = summary.dimensions;
    tracing::info!(
        "{}: {x}x{y}x{z}, {} voxels, {} colors, palette: {}",
        path.display(),
        summary.voxel_count,
        summary.colors_used,
        if summary.has_palette { "custom" } else { "default" }
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxterra_terrain::TerrainError;

    fn config_in(dir: &Path, generator: GeneratorKind) -> Config {
        let mut config = Config::default();
        config.generation.width = 20;
        config.generation.length = 12;
        config.generation.height_limit = 16.0;
        config.generation.generator = generator;
        config.generation.seed = Some(42);
        config.export.output = dir.join("terrain.vox");
        config.export.preview = Some(dir.join("terrain.png"));
        config
    }

    #[test]
    fn test_generate_then_inspect() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), GeneratorKind::CoastalMountain);

        let report = generate(&config).unwrap();
        assert_eq!(report.seed, 42);
        assert_eq!(report.dimensions, (20, 12, 16));
        assert!(config.export.output.is_file());
        assert!(dir.path().join("terrain.png").is_file());

        let summary = inspect(&config.export.output).unwrap();
        assert_eq!(summary.dimensions, report.dimensions);
        assert_eq!(summary.voxel_count, report.voxel_count);
        assert!(summary.has_palette);
        assert!(summary.colors_used >= 2);
    }

    #[test]
    fn test_generate_is_reproducible() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path(), GeneratorKind::CoastalMountain);
        config.export.preview = None;

        generate(&config).unwrap();
        let first = std::fs::read(&config.export.output).unwrap();
        generate(&config).unwrap();
        let second = std::fs::read(&config.export.output).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_canyon_writes_preview_but_not_model() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), GeneratorKind::Canyon);

        let result = generate(&config);
        assert!(matches!(
            result,
            Err(AppError::Terrain(TerrainError::ExportUnsupported(
                GeneratorKind::Canyon
            )))
        ));
        assert!(dir.path().join("terrain.png").is_file());
        assert!(!config.export.output.exists());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path(), GeneratorKind::CoastalMountain);
        config.generation.width = 0;
        assert!(matches!(generate(&config), Err(AppError::Config(_))));
    }

    #[test]
    fn test_inspect_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = inspect(&dir.path().join("missing.vox"));
        assert!(matches!(result, Err(AppError::Vox(_))));
    }
}
