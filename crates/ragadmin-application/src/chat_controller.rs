//! Chat use case.
//!
//! `ChatController` is what a chat front end talks to. It owns the routing
//! pass, builds outbound chat requests from the displayed transcript, feeds
//! finished exchanges back through the sync bridge and turns backend failures
//! into notifications.

use crate::model_selection::ModelSelection;
use ragadmin_core::backend::{ChatBackend, ChatRequest, ChatResponse};
use ragadmin_core::error::{RagAdminError, Result};
use ragadmin_core::notify::{Notification, Notifier};
use ragadmin_core::session::{
    Message, MessageMap, Navigator, RouteOutcome, SessionRepository, SessionRouter, SessionStore,
    SessionSummary, SharedDisplay, SyncBridge, shared_display, translate,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Greeting shown while a conversation has no messages.
pub const WELCOME_MESSAGE: &str = "Welcome to RAGAdmin, your open-source RAG application!";

pub const MODELS_FETCH_FAILED_MESSAGE: &str =
    "Failed to fetch available models. Using default model.";

pub const SEND_FAILED_MESSAGE: &str = "Failed to send message. Please try again.";

/// Routing passes `settle_route` runs before giving up on a display.
const MAX_SETTLE_PASSES: usize = 3;

/// A chat request in flight.
pub struct Exchange {
    /// Session that was active when the request was built. The finished
    /// transcript must be applied to this id.
    pub session_id: Option<String>,
    pub response: ChatResponse,
}

/// Result of uploading one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    pub file_name: String,
    /// Message shown to the user when the upload failed
    pub error: Option<String>,
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

pub struct ChatController {
    store: Arc<SessionStore>,
    router: Arc<SessionRouter>,
    bridge: SyncBridge,
    backend: Arc<dyn ChatBackend>,
    models: ModelSelection,
    notifier: Arc<dyn Notifier>,
}

impl ChatController {
    pub fn new(
        store: Arc<SessionStore>,
        navigator: Arc<dyn Navigator>,
        backend: Arc<dyn ChatBackend>,
        notifier: Arc<dyn Notifier>,
        default_model: impl Into<String>,
    ) -> Self {
        let display = shared_display();
        let router = Arc::new(SessionRouter::new(
            store.clone(),
            navigator,
            display.clone(),
        ));
        let bridge = SyncBridge::new(store.clone(), display);

        Self {
            store,
            router,
            bridge,
            backend,
            models: ModelSelection::new(default_model),
            notifier,
        }
    }

    /// Loads the persisted sessions from `repository` and builds a controller
    /// on top of them. An unreadable slot starts an empty store.
    pub async fn open(
        repository: Arc<dyn SessionRepository>,
        navigator: Arc<dyn Navigator>,
        backend: Arc<dyn ChatBackend>,
        notifier: Arc<dyn Notifier>,
        default_model: impl Into<String>,
    ) -> Self {
        let store = Arc::new(SessionStore::open(repository).await);
        Self::new(store, navigator, backend, notifier, default_model)
    }

    pub fn store(&self) -> Arc<SessionStore> {
        self.store.clone()
    }

    pub fn display(&self) -> SharedDisplay {
        self.router.display()
    }

    /// Re-routes after the navigation id changed.
    pub async fn on_navigation(&self) -> Result<RouteOutcome> {
        self.router.sync().await
    }

    /// Routes until a session is on display.
    ///
    /// Only useful with a navigator that applies requests immediately; with
    /// an asynchronous route the outcome stays `Pending` until the route
    /// catches up and `on_navigation` is called.
    pub async fn settle_route(&self) -> Result<RouteOutcome> {
        let mut outcome = self.router.sync().await?;
        for _ in 1..MAX_SETTLE_PASSES {
            if matches!(outcome, RouteOutcome::Displayed { .. }) {
                break;
            }
            outcome = self.router.sync().await?;
        }
        Ok(outcome)
    }

    /// Keeps routing in step with store changes until the store is dropped.
    pub fn watch_store(&self) -> JoinHandle<()> {
        self.router.clone().spawn_store_watch()
    }

    /// Starts an empty "New Chat" session and navigates to it.
    pub async fn new_chat(&self) -> Result<String> {
        self.router.new_chat().await
    }

    pub async fn active_session_id(&self) -> Option<String> {
        self.display().read().await.session_id.clone()
    }

    /// Returns the transcript on display, empty before the first routing pass.
    pub async fn transcript(&self) -> MessageMap {
        self.display()
            .read()
            .await
            .messages
            .clone()
            .unwrap_or_default()
    }

    /// Returns the greeting to show, if the displayed conversation is empty.
    pub async fn welcome(&self) -> Option<&'static str> {
        self.transcript().await.is_empty().then_some(WELCOME_MESSAGE)
    }

    /// Sidebar entries in display order, the active session flagged.
    pub async fn summaries(&self) -> Vec<SessionSummary> {
        let current = self.active_session_id().await;
        self.store.summaries(current.as_deref()).await
    }

    /// Sends the newest of `messages` with the rest as history.
    ///
    /// Never fails: a transport error, a non-success status or a missing
    /// active session notifies the user and yields the synthetic failure
    /// response instead.
    pub async fn send(&self, messages: &[Message]) -> Exchange {
        let session_id = self.active_session_id().await;

        let result = match session_id.as_deref() {
            Some(id) => self.dispatch(id, messages).await,
            None => Err(RagAdminError::internal("No active session to send from")),
        };

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("[ChatController] Send failed: {}", e);
                self.notifier.notify(Notification::error(SEND_FAILED_MESSAGE));
                ChatResponse::synthetic_failure()
            }
        };

        Exchange {
            session_id,
            response,
        }
    }

    /// Applies the finished transcript of an exchange to `session_id`.
    pub async fn on_exchange_complete(
        &self,
        session_id: &str,
        messages: MessageMap,
    ) -> Result<String> {
        self.bridge.on_exchange_complete(session_id, messages).await
    }

    /// Fetches the backend's model list, selecting its first entry.
    ///
    /// On failure the user is notified and the current model is kept.
    pub async fn refresh_models(&self) -> Vec<String> {
        match self.backend.list_models().await {
            Ok(models) => {
                if models.is_empty() {
                    tracing::debug!("[ChatController] Backend offers no models");
                }
                self.models.apply_fetched(models).await;
            }
            Err(e) => {
                tracing::warn!("[ChatController] Fetching models failed: {}", e);
                self.notifier
                    .notify(Notification::error(MODELS_FETCH_FAILED_MESSAGE));
            }
        }
        self.models.available().await
    }

    pub async fn select_model(&self, model: impl Into<String>) {
        self.models.select(model).await;
    }

    pub async fn selected_model(&self) -> String {
        self.models.selected().await
    }

    /// Uploads each file independently, notifying once per file.
    pub async fn upload(&self, paths: &[PathBuf]) -> Vec<UploadOutcome> {
        let mut outcomes = Vec::with_capacity(paths.len());
        for path in paths {
            let outcome = self.upload_one(path).await;
            match &outcome.error {
                None => self.notifier.notify(Notification::success(format!(
                    "{} file uploaded successfully.",
                    outcome.file_name
                ))),
                Some(message) => self.notifier.notify(Notification::error(message.clone())),
            }
            outcomes.push(outcome);
        }
        outcomes
    }

    async fn dispatch(&self, session_id: &str, messages: &[Message]) -> Result<ChatResponse> {
        let translated = translate(messages);
        let request = ChatRequest {
            message: translated.prompt,
            chat_id: session_id.to_string(),
            history: translated.history,
            model: self.models.selected().await,
        };

        let response = self.backend.send_chat(&request).await?;
        if !response.is_success() {
            return Err(RagAdminError::http(response.status(), ""));
        }
        Ok(response)
    }

    async fn upload_one(&self, path: &Path) -> UploadOutcome {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let failed = || format!("{} file upload failed.", file_name);

        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("[ChatController] Cannot read {}: {}", path.display(), e);
                return UploadOutcome {
                    error: Some(failed()),
                    file_name,
                };
            }
        };

        let error = match self.backend.upload_document(&file_name, bytes).await {
            Ok(()) => None,
            Err(RagAdminError::Http { message, .. }) if !message.is_empty() => Some(message),
            Err(e) => {
                tracing::warn!("[ChatController] Upload of {} failed: {}", file_name, e);
                Some(failed())
            }
        };

        UploadOutcome { file_name, error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigator::InMemoryNavigator;
    use crate::test_support::{ChatMode, MockBackend, RecordingNotifier};
    use ragadmin_core::backend::{SEND_FAILURE_BODY, SEND_FAILURE_STATUS};
    use ragadmin_core::notify::NotificationLevel;
    use ragadmin_core::session::{ChatSession, HistoryRole, MessageRole};
    use ragadmin_infrastructure::InMemorySessionRepository;
    use tempfile::TempDir;

    struct Fixture {
        controller: ChatController,
        navigator: Arc<InMemoryNavigator>,
        backend: Arc<MockBackend>,
        notifier: Arc<RecordingNotifier>,
    }

    async fn fixture(sessions: &[ChatSession], route: Option<&str>) -> Fixture {
        let repository = Arc::new(InMemorySessionRepository::new());
        repository.replace_all(sessions).await.unwrap();
        let navigator = Arc::new(InMemoryNavigator::new(route.map(str::to_string)));
        let backend = Arc::new(MockBackend::new());
        let notifier = Arc::new(RecordingNotifier::default());

        let controller = ChatController::open(
            repository,
            navigator.clone(),
            backend.clone(),
            notifier.clone(),
            "llama2",
        )
        .await;

        Fixture {
            controller,
            navigator,
            backend,
            notifier,
        }
    }

    fn transcript(pairs: &[(&str, MessageRole, &str)]) -> MessageMap {
        pairs
            .iter()
            .map(|(id, role, content)| Message::new(*id, role.clone(), *content))
            .collect()
    }

    #[tokio::test]
    async fn test_settle_route_bootstraps_first_session() {
        let f = fixture(&[], None).await;

        let outcome = f.controller.settle_route().await.unwrap();

        let sessions = f.controller.store().sessions().await;
        assert_eq!(sessions.len(), 1);
        assert!(matches!(
            outcome,
            RouteOutcome::Displayed { ref session_id, found: true, .. } if *session_id == sessions[0].id
        ));
        assert_eq!(f.controller.welcome().await, Some(WELCOME_MESSAGE));
    }

    #[tokio::test]
    async fn test_summaries_flag_active_session() {
        let f = fixture(&[ChatSession::with_id("a"), ChatSession::with_id("b")], Some("b")).await;
        f.controller.settle_route().await.unwrap();

        let summaries = f.controller.summaries().await;

        assert_eq!(summaries.len(), 2);
        assert!(!summaries[0].is_current);
        assert!(summaries[1].is_current);
    }

    #[tokio::test]
    async fn test_new_chat_becomes_active() {
        let f = fixture(&[ChatSession::with_id("a")], Some("a")).await;
        f.controller.settle_route().await.unwrap();

        let id = f.controller.new_chat().await.unwrap();
        f.controller.on_navigation().await.unwrap();

        assert_eq!(f.navigator.current().as_deref(), Some(id.as_str()));
        assert_eq!(f.controller.active_session_id().await.as_deref(), Some(id.as_str()));
        assert_eq!(f.controller.store().len().await, 2);
    }

    #[tokio::test]
    async fn test_send_builds_request_from_transcript() {
        let f = fixture(&[ChatSession::with_id("a")], Some("a")).await;
        f.controller.settle_route().await.unwrap();
        f.controller.select_model("mistral").await;

        let messages = transcript(&[
            ("1", MessageRole::User, "a"),
            ("2", MessageRole::Assistant, "b"),
            ("3", MessageRole::User, "c"),
        ])
        .to_ordered_vec();
        let exchange = f.controller.send(&messages).await;

        assert_eq!(exchange.session_id.as_deref(), Some("a"));
        assert_eq!(exchange.response.text().await.unwrap(), "reply");

        let requests = f.backend.chat_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].message, "c");
        assert_eq!(requests[0].chat_id, "a");
        assert_eq!(requests[0].model, "mistral");
        assert_eq!(requests[0].history.len(), 2);
        assert_eq!(requests[0].history[1].role, HistoryRole::Ai);
        assert!(f.notifier.notifications().is_empty());
    }

    #[tokio::test]
    async fn test_send_failure_yields_synthetic_response() {
        for mode in [
            ChatMode::HttpError(502),
            ChatMode::Unreachable,
            ChatMode::Status(503),
        ] {
            let f = fixture(&[ChatSession::with_id("a")], Some("a")).await;
            f.controller.settle_route().await.unwrap();
            f.backend.set_chat_mode(mode);

            let messages = vec![Message::new("1", MessageRole::User, "hello")];
            let exchange = f.controller.send(&messages).await;

            assert_eq!(exchange.session_id.as_deref(), Some("a"), "{:?}", mode);
            assert!(exchange.response.is_synthetic(), "{:?}", mode);
            assert_eq!(exchange.response.status(), SEND_FAILURE_STATUS);
            assert_eq!(exchange.response.content_type(), "text/plain");
            assert_eq!(exchange.response.text().await.unwrap(), SEND_FAILURE_BODY);
            assert_eq!(
                f.notifier.notifications(),
                vec![Notification::error(SEND_FAILED_MESSAGE)],
                "{:?}",
                mode
            );
        }
    }

    #[tokio::test]
    async fn test_send_without_active_session_fails_softly() {
        let f = fixture(&[], None).await;

        let exchange = f
            .controller
            .send(&[Message::new("1", MessageRole::User, "hi")])
            .await;

        assert!(exchange.session_id.is_none());
        assert!(exchange.response.is_synthetic());
        assert!(f.backend.chat_requests().is_empty());
        assert_eq!(f.notifier.notifications().len(), 1);
    }

    #[tokio::test]
    async fn test_exchange_applies_to_originating_session() {
        let f = fixture(&[ChatSession::with_id("a"), ChatSession::with_id("b")], Some("a")).await;
        f.controller.settle_route().await.unwrap();

        let sent = transcript(&[("1", MessageRole::User, "question for a")]);
        let exchange = f.controller.send(&sent.to_ordered_vec()).await;
        let origin = exchange.session_id.clone().unwrap();

        // User switches to b before the reply completes.
        f.navigator.navigate("b");
        f.controller.on_navigation().await.unwrap();

        let mut finished = sent.clone();
        finished.push(Message::new("2", MessageRole::Assistant, "answer"));
        let title = f
            .controller
            .on_exchange_complete(&origin, finished.clone())
            .await
            .unwrap();

        assert_eq!(title, "question for a");
        let store = f.controller.store();
        assert_eq!(store.get("a").await.unwrap().messages, finished);
        assert!(store.get("b").await.unwrap().messages.is_empty());
        assert_eq!(f.controller.active_session_id().await.as_deref(), Some("b"));
        assert!(f.controller.transcript().await.is_empty());
    }

    #[tokio::test]
    async fn test_refresh_models_selects_first() {
        let f = fixture(&[], None).await;
        f.backend
            .set_models(Some(vec!["mistral".to_string(), "llama2".to_string()]));

        let models = f.controller.refresh_models().await;

        assert_eq!(models, vec!["mistral", "llama2"]);
        assert_eq!(f.controller.selected_model().await, "mistral");
        assert!(f.notifier.notifications().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_models_failure_keeps_default() {
        let f = fixture(&[], None).await;
        f.backend.set_models(None);

        let models = f.controller.refresh_models().await;

        assert!(models.is_empty());
        assert_eq!(f.controller.selected_model().await, "llama2");
        assert_eq!(
            f.notifier.notifications(),
            vec![Notification::error(MODELS_FETCH_FAILED_MESSAGE)]
        );
    }

    #[tokio::test]
    async fn test_upload_notifies_per_file() {
        let temp_dir = TempDir::new().unwrap();
        let good = temp_dir.path().join("notes.md");
        let rejected = temp_dir.path().join("scan.pdf");
        let plain = temp_dir.path().join("broken.txt");
        let missing = temp_dir.path().join("missing.txt");
        std::fs::write(&good, "# Notes").unwrap();
        std::fs::write(&rejected, "%PDF").unwrap();
        std::fs::write(&plain, "text").unwrap();

        let f = fixture(&[], None).await;
        f.backend.reject_upload("scan.pdf", 400, "Unsupported file type");
        f.backend.reject_upload("broken.txt", 500, "");

        let outcomes = f
            .controller
            .upload(&[good, rejected, plain, missing])
            .await;

        assert_eq!(outcomes.len(), 4);
        assert!(outcomes[0].is_success());
        assert!(!outcomes[1].is_success());

        let notifications = f.notifier.notifications();
        assert_eq!(
            notifications,
            vec![
                Notification::success("notes.md file uploaded successfully."),
                Notification::error("Unsupported file type"),
                Notification::error("broken.txt file upload failed."),
                Notification::error("missing.txt file upload failed."),
            ]
        );
        assert_eq!(notifications[0].level, NotificationLevel::Success);
        assert_eq!(f.backend.uploaded_names(), vec!["notes.md", "scan.pdf", "broken.txt"]);
    }
}
