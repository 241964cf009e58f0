//! The binary entry point for voxterra.

use clap::Parser;
use voxterra_app::{AppError, PlatformDirs};
use voxterra_config::{CliArgs, Config};

fn main() {
    let args = CliArgs::parse();
    if let Err(e) = run(&args) {
        tracing::error!("{e}");
        eprintln!("voxterra: {e}");
        std::process::exit(1);
    }
}

fn run(args: &CliArgs) -> Result<(), AppError> {
    let dirs = PlatformDirs::for_override(args.config.as_deref())?;
    dirs.create_dirs()?;

    let mut config = Config::load_or_create(&dirs.config_dir)?;
    config.apply_cli_overrides(args);

    voxterra_log::init_logging(
        Some(&dirs.log_dir),
        cfg!(debug_assertions),
        Some(&config),
    );
    tracing::debug!("config dir: {}", dirs.config_dir.display());

    if let Some(path) = &args.inspect {
        let summary = voxterra_app::inspect(path)?;
        let (x, y, z) = summary.dimensions;
        println!("{}", path.display());
        println!("  size:    {x} x {y} x {z}");
        println!("  voxels:  {}", summary.voxel_count);
        println!("  colors:  {}", summary.colors_used);
        println!("  palette: {}", if summary.has_palette { "custom" } else { "default" });
        return Ok(());
    }

    let report = voxterra_app::generate(&config)?;
    let (x, y, z) = report.dimensions;
    println!(
        "{} (seed {}): {x} x {y} x {z}, {} voxels -> {}",
        report.generator,
        report.seed,
        report.voxel_count,
        report.output.display()
    );
    if let Some(preview) = &report.preview {
        println!("  preview -> {}", preview.display());
    }
    Ok(())
}
