//! Configuration loading.
//!
//! Reads `ClientConfig` from `~/.config/ragadmin/config.toml` and applies
//! environment overrides on top.

use crate::paths::RagAdminPaths;
use ragadmin_core::config::ClientConfig;
use ragadmin_core::error::{RagAdminError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding `backend_url`.
pub const BACKEND_URL_ENV: &str = "RAGADMIN_BACKEND_URL";
/// Environment variable overriding `default_model`.
pub const MODEL_ENV: &str = "RAGADMIN_MODEL";

pub struct ConfigService;

impl ConfigService {
    /// Loads the configuration from the default location, then applies
    /// environment overrides.
    pub fn load() -> Result<ClientConfig> {
        let path = RagAdminPaths::config_file()
            .map_err(|e| RagAdminError::config(e.to_string()))?;
        Self::load_with_env(&path)
    }

    /// Loads the configuration from `path`, then applies environment
    /// overrides.
    pub fn load_with_env(path: &Path) -> Result<ClientConfig> {
        let mut config = Self::load_from(path)?;
        Self::apply_overrides(&mut config, |key| std::env::var(key).ok());
        Ok(config)
    }

    /// Loads the configuration file at `path`.
    ///
    /// # Returns
    ///
    /// - `Ok(ClientConfig::default())`: The file does not exist
    /// - `Ok(config)`: Parsed configuration, missing keys filled with defaults
    /// - `Err(RagAdminError::Config)`: The file is not valid TOML for `ClientConfig`
    pub fn load_from(path: &Path) -> Result<ClientConfig> {
        if !path.exists() {
            tracing::debug!(
                "[ConfigService] No config at {}, using defaults",
                path.display()
            );
            return Ok(ClientConfig::default());
        }

        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            RagAdminError::config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Applies overrides looked up by environment variable name.
    pub fn apply_overrides<F>(config: &mut ClientConfig, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(BACKEND_URL_ENV).filter(|v| !v.trim().is_empty()) {
            config.backend_url = url;
        }
        if let Some(model) = lookup(MODEL_ENV).filter(|v| !v.trim().is_empty()) {
            config.default_model = model;
        }
    }

    /// Returns the directory holding the session slot and logs.
    pub fn data_dir(config: &ClientConfig) -> Result<PathBuf> {
        match &config.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => RagAdminPaths::data_dir().map_err(|e| RagAdminError::config(e.to_string())),
        }
    }

    /// Returns the directory for log files.
    pub fn logs_dir(config: &ClientConfig) -> Result<PathBuf> {
        match &config.logging.dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(RagAdminPaths::logs_dir(&Self::data_dir(config)?)),
        }
    }
}
