//! voxterra application: directory resolution, the generate and inspect
//! workflows, and PNG preview output.

pub mod error;
pub mod platform;
pub mod png_export;
pub mod run;

pub use error::AppError;
pub use platform::PlatformDirs;
pub use run::{GenerationReport, VoxSummary, generate, inspect};
