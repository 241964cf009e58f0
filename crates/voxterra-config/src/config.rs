//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use voxterra_terrain::{GeneratorKind, SessionParams, VoxelizeParams};
use voxterra_voxel::{Gradient, MAX_DIMENSION};

use crate::error::ConfigError;

/// File name of the persisted configuration inside the config directory.
pub const CONFIG_FILE: &str = "config.ron";

const APP_NAME: &str = "voxterra";

/// `<platform config dir>/voxterra`.
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_NAME))
        .ok_or(ConfigError::NoConfigDir)
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub generation: GenerationConfig,
    pub export: ExportConfig,
    pub debug: DebugConfig,
}

/// Height field size and generator choice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GenerationConfig {
    /// Cells along the x axis.
    pub width: usize,
    /// Cells along the y axis.
    pub length: usize,
    /// Maximum terrain height; also the voxel model's z size.
    pub height_limit: f64,
    pub generator: GeneratorKind,
    /// Fixed seed; `None` derives one from the clock on every run.
    pub seed: Option<u32>,
}

/// Voxel export and preview settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExportConfig {
    /// Destination of the `.vox` model.
    pub output: PathBuf,
    /// Optional destination of a PNG preview.
    pub preview: Option<PathBuf>,
    pub voxelize: VoxelizeParams,
    /// Surface colors from lowest to highest terrain.
    pub gradient: Gradient,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log filter (e.g., "debug", "info,voxterra_voxel=trace").
    pub log_level: String,
    /// Also write JSON logs to the log directory.
    pub log_to_file: bool,
}

// --- Default implementations ---

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            width: 64,
            length: 64,
            height_limit: 32.0,
            generator: GeneratorKind::CoastalMountain,
            seed: None,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("procedural.vox"),
            preview: None,
            voxelize: VoxelizeParams::default(),
            gradient: Gradient::default(),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_to_file: false,
        }
    }
}

// --- Validation ---

impl Config {
    /// Checks the settings the generator and exporter depend on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let generation = &self.generation;
        let max = MAX_DIMENSION as usize;
        for (field, value) in [("width", generation.width), ("length", generation.length)] {
            if value == 0 || value > max {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("{value} is outside 1..={max}"),
                });
            }
        }
        let limit = generation.height_limit;
        if !(limit.is_finite() && (1.0..=MAX_DIMENSION as f64).contains(&limit)) {
            return Err(ConfigError::Invalid {
                field: "height_limit",
                reason: format!("{limit} is outside 1..={max}"),
            });
        }
        let sea = self.export.voxelize.sea_level_ratio;
        if !(0.0..=1.0).contains(&sea) {
            return Err(ConfigError::Invalid {
                field: "sea_level_ratio",
                reason: format!("{sea} is outside 0..=1"),
            });
        }
        Ok(())
    }

    /// Session parameters for the configured generator.
    pub fn session_params(&self) -> SessionParams {
        SessionParams {
            width: self.generation.width,
            length: self.generation.length,
            height_limit: self.generation.height_limit,
            generator: self.generation.generator,
            seed: self.generation.seed.into(),
            sea_level_ratio: self.export.voxelize.sea_level_ratio,
        }
    }
}

// --- Load / Save ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let config = Self::read(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    fn read(config_path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(config_path).map_err(|source| ConfigError::ReadError {
                path: config_path.to_path_buf(),
                source,
            })?;
        ron::from_str(&contents).map_err(ConfigError::ParseError)
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        let write_error = |source| ConfigError::WriteError {
            path: config_dir.to_path_buf(),
            source,
        };
        std::fs::create_dir_all(config_dir).map_err(write_error)?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(write_error)?;
        Ok(())
    }
}
