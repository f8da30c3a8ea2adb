//! Logging setup for the CLI.
//!
//! Everything passing the filter goes to a daily-rolling file under the logs
//! directory; warnings and errors are echoed to stderr.

use anyhow::{Context, Result};
use ragadmin_core::config::ClientConfig;
use ragadmin_infrastructure::ConfigService;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE_PREFIX: &str = "ragadmin.log";

/// Installs the global subscriber. Keep the guard alive until exit so the
/// file writer flushes.
pub fn init_logging(config: &ClientConfig) -> Result<WorkerGuard> {
    let dir = ConfigService::logs_dir(config)?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    let file_appender = tracing_appender::rolling::daily(&dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_filter(filter);

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .with_filter(LevelFilter::WARN);

    Registry::default()
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::debug!("[Logging] Writing logs to {}", dir.display());
    Ok(guard)
}
