use crate::backend::DEFAULT_MODEL;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Client configuration, read from `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the backend, without the `/api/...` suffix
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    /// Model used until the backend offers a list
    #[serde(default = "default_model")]
    pub default_model: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Overrides the platform data directory holding the session slot
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Default log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Directory for log files; defaults to `<data_dir>/logs`
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl ClientConfig {
    /// Returns the backend base URL without a trailing slash.
    pub fn backend_base(&self) -> &str {
        self.backend_url.trim_end_matches('/')
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            default_model: default_model(),
            request_timeout_secs: default_request_timeout_secs(),
            data_dir: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: None,
        }
    }
}

fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_log_level() -> String {
    "info".to_string()
}
