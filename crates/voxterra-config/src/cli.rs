//! Command-line argument parsing for voxterra.

use std::path::PathBuf;

use clap::Parser;
use voxterra_terrain::GeneratorKind;

use crate::Config;

/// Procedural terrain to MagicaVoxel `.vox` generator.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "voxterra", about = "Procedural terrain to .vox generator")]
pub struct CliArgs {
    /// Map cells along the x axis.
    #[arg(long)]
    pub width: Option<usize>,

    /// Map cells along the y axis.
    #[arg(long)]
    pub length: Option<usize>,

    /// Maximum terrain height (voxel layers).
    #[arg(long)]
    pub height_limit: Option<f64>,

    /// Terrain pipeline (coastal_mountain, canyon).
    #[arg(long)]
    pub generator: Option<GeneratorKind>,

    /// Fixed seed; a clock-derived seed is used when omitted.
    #[arg(long)]
    pub seed: Option<u32>,

    /// Output `.vox` path.
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Also write a PNG preview of the height field.
    #[arg(long)]
    pub preview: Option<PathBuf>,

    /// Sea level as a fraction of the height limit; shapes the coastal shelf
    /// and sets the water line on export.
    #[arg(long)]
    pub sea_level: Option<f64>,

    /// Number of gradient samples in the palette.
    #[arg(long)]
    pub color_sampling: Option<u32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print a summary of an existing `.vox` file instead of generating.
    #[arg(long, value_name = "VOX")]
    pub inspect: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(width) = args.width {
            self.generation.width = width;
        }
        if let Some(length) = args.length {
            self.generation.length = length;
        }
        if let Some(limit) = args.height_limit {
            self.generation.height_limit = limit;
        }
        if let Some(kind) = args.generator {
            self.generation.generator = kind;
        }
        if args.seed.is_some() {
            self.generation.seed = args.seed;
        }
        if let Some(ref output) = args.output {
            self.export.output = output.clone();
        }
        if args.preview.is_some() {
            self.export.preview = args.preview.clone();
        }
        if let Some(ratio) = args.sea_level {
            self.export.voxelize.sea_level_ratio = ratio;
        }
        if let Some(sampling) = args.color_sampling {
            self.export.voxelize.color_sampling = sampling;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            width: Some(128),
            generator: Some(GeneratorKind::Canyon),
            seed: Some(42),
            output: Some(PathBuf::from("island.vox")),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.generation.width, 128);
        assert_eq!(config.generation.generator, GeneratorKind::Canyon);
        assert_eq!(config.generation.seed, Some(42));
        assert_eq!(config.export.output, PathBuf::from("island.vox"));
        // Non-overridden fields retain defaults
        assert_eq!(config.generation.length, 64);
        assert_eq!(config.export.voxelize.color_sampling, 128);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_parse_args() {
        let args = CliArgs::try_parse_from([
            "voxterra",
            "--width",
            "32",
            "--generator",
            "canyon",
            "--sea-level",
            "0.4",
            "-o",
            "out.vox",
        ])
        .unwrap();
        assert_eq!(args.width, Some(32));
        assert_eq!(args.generator, Some(GeneratorKind::Canyon));
        assert_eq!(args.sea_level, Some(0.4));
        assert_eq!(args.output, Some(PathBuf::from("out.vox")));
        assert!(args.inspect.is_none());
    }

    #[test]
    fn test_sea_level_reaches_generator_and_export() {
        let mut config = Config::default();
        let args = CliArgs {
            sea_level: Some(0.4),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.export.voxelize.sea_level_ratio, 0.4);
        assert_eq!(config.session_params().sea_level_ratio, 0.4);
    }

    #[test]
    fn test_parse_rejects_unknown_generator() {
        let result = CliArgs::try_parse_from(["voxterra", "--generator", "volcano"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_inspect() {
        let args = CliArgs::try_parse_from(["voxterra", "--inspect", "model.vox"]).unwrap();
        assert_eq!(args.inspect, Some(PathBuf::from("model.vox")));
    }
}
