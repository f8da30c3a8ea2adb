//! Wiring of the CLI: configuration, repository, backend and controller.

use anyhow::{Context, Result};
use ragadmin_application::{ChatController, InMemoryNavigator, LogNotifier};
use ragadmin_core::config::ClientConfig;
use ragadmin_core::notify::{Notification, NotificationLevel, Notifier};
use ragadmin_infrastructure::{ConfigService, JsonFileSessionRepository};
use ragadmin_interaction::HttpChatBackend;
use std::path::PathBuf;
use std::sync::Arc;

/// Command-line values that take precedence over the configuration file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub backend_url: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

/// Loads the configuration: file, then environment, then flags.
pub fn load_config(overrides: &Overrides) -> Result<ClientConfig> {
    let mut config = match &overrides.config {
        Some(path) => ConfigService::load_with_env(path),
        None => ConfigService::load(),
    }
    .context("Failed to load configuration")?;

    if let Some(url) = &overrides.backend_url {
        config.backend_url = url.clone();
    }
    if let Some(dir) = &overrides.data_dir {
        config.data_dir = Some(dir.clone());
    }
    Ok(config)
}

/// Prints notifications to stderr and records them in the log.
#[derive(Default)]
pub struct ConsoleNotifier {
    log: LogNotifier,
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        self.log.notify(notification.clone());
        match notification.level {
            NotificationLevel::Success => eprintln!("✅ {}", notification.message),
            NotificationLevel::Error => eprintln!("❌ {}", notification.message),
        }
    }
}

pub struct AppContext {
    pub controller: ChatController,
    pub config: ClientConfig,
}

impl AppContext {
    /// Opens the session file and connects the controller to the backend.
    ///
    /// `chat` is the initial route, like the id in a `/chat/<id>` URL.
    pub async fn build(config: &ClientConfig, chat: Option<String>) -> Result<Self> {
        let data_dir = ConfigService::data_dir(config)?;
        let repository = Arc::new(JsonFileSessionRepository::new(&data_dir));
        let backend = Arc::new(HttpChatBackend::from_config(config)?);
        let navigator = Arc::new(InMemoryNavigator::new(chat));

        tracing::info!(
            "[Bootstrap] Sessions at {}, backend {}",
            repository.path().display(),
            backend.base_url()
        );

        let controller = ChatController::open(
            repository,
            navigator,
            backend,
            Arc::new(ConsoleNotifier::default()),
            config.default_model.clone(),
        )
        .await;

        Ok(Self {
            controller,
            config: config.clone(),
        })
    }
}
