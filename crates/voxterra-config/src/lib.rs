//! Configuration for voxterra.
//!
//! Generation and export settings persist to disk as a RON file and can be
//! overridden from the command line via clap.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CONFIG_FILE, Config, DebugConfig, ExportConfig, GenerationConfig, default_config_dir,
};
pub use error::ConfigError;
