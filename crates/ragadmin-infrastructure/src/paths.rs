//! Unified path management for ragadmin files.
//!
//! ```text
//! ~/.config/ragadmin/            # Config directory
//! └── config.toml                # Client configuration
//!
//! ~/.local/share/ragadmin/       # Data directory
//! ├── chat_sessions.json         # Persisted session slot
//! └── logs/                      # Application logs
//!     └── ragadmin.log.YYYY-MM-DD
//! ```

use std::path::PathBuf;

const APP_DIR: &str = "ragadmin";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform directory could not be determined.
    DirNotFound(&'static str),
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::DirNotFound(kind) => write!(f, "Cannot find {} directory", kind),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for ragadmin.
pub struct RagAdminPaths;

impl RagAdminPaths {
    /// Returns the configuration directory (e.g. `~/.config/ragadmin/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::DirNotFound("config"))
    }

    /// Returns the data directory (e.g. `~/.local/share/ragadmin/`).
    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::DirNotFound("data"))
    }

    /// Returns the path to the configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the log directory below `data_dir`.
    pub fn logs_dir(data_dir: &std::path::Path) -> PathBuf {
        data_dir.join("logs")
    }
}
