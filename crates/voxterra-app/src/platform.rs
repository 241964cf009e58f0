//! Platform directory resolution.
//!
//! The config directory follows OS conventions (XDG on Linux, Known Folders
//! on Windows, Library on macOS) unless overridden on the command line. Logs
//! live next to it.

use std::path::{Path, PathBuf};

use voxterra_config::default_config_dir;

use crate::error::AppError;

/// Directories the binary reads from and writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformDirs {
    /// Holds `config.ron`.
    pub config_dir: PathBuf,
    /// JSON log files.
    pub log_dir: PathBuf,
}

impl PlatformDirs {
    /// Resolve platform-specific directories without creating them on disk.
    ///
    /// # Errors
    ///
    /// Fails with [`ConfigError::NoConfigDir`](voxterra_config::ConfigError)
    /// if the OS does not expose a configuration directory.
    pub fn resolve() -> Result<Self, AppError> {
        Ok(Self::from_config_dir(default_config_dir()?))
    }

    /// Uses `config_dir` as given, with logs in a `logs` subdirectory.
    pub fn from_config_dir(config_dir: PathBuf) -> Self {
        Self {
            log_dir: config_dir.join("logs"),
            config_dir,
        }
    }

    /// `--config` wins over the platform default.
    pub fn for_override(config_override: Option<&Path>) -> Result<Self, AppError> {
        match config_override {
            Some(dir) => Ok(Self::from_config_dir(dir.to_path_buf())),
            None => Self::resolve(),
        }
    }

    /// Create all directories on disk.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Io`] if any directory cannot be created.
    pub fn create_dirs(&self) -> Result<(), AppError> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_uses_app_config_dir() {
        if let Ok(dirs) = PlatformDirs::resolve() {
            assert_eq!(dirs.config_dir.file_name().unwrap(), "voxterra");
            assert_eq!(dirs.log_dir, dirs.config_dir.join("logs"));
        }
    }

    #[test]
    fn test_override_takes_precedence() {
        let dir = Path::new("custom");
        let dirs = PlatformDirs::for_override(Some(dir)).unwrap();
        assert_eq!(dirs.config_dir, dir);
        assert_eq!(dirs.log_dir, dir.join("logs"));
    }

    #[test]
    fn test_directory_creation() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = PlatformDirs::from_config_dir(tmp.path().join("voxterra"));
        dirs.create_dirs().unwrap();
        assert!(dirs.config_dir.is_dir());
        assert!(dirs.log_dir.is_dir());
    }
}
