use super::message::MessageMap;
use super::model::{ChatSession, SessionSummary};
use super::repository::SessionRepository;
use crate::error::{RagAdminError, Result};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock, broadcast};

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Change notification published by the `SessionStore`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// The whole collection was replaced (load or `replace_all`).
    Replaced,
    /// A new session was added at the end of the list.
    Appended { session_id: String },
    /// A session's transcript and title were replaced.
    MessagesUpdated { session_id: String },
}

/// The single authoritative collection of chat sessions.
///
/// `SessionStore` is responsible for:
/// - Keeping the ordered session list in memory (insertion order is display order)
/// - Writing the complete list through the `SessionRepository` after every mutation
/// - Publishing a `StoreEvent` to subscribers after every mutation
///
/// Mutations are serialized by a write lock held from the in-memory change
/// through persistence, so the sequence of persisted blobs always follows the
/// sequence of in-memory states. The session list itself is only locked while
/// it changes and a snapshot is taken; readers never wait on file I/O. A
/// failed write is reported as `RagAdminError::Persistence` but never rolls
/// back memory: the in-memory list stays authoritative for the rest of the
/// process.
pub struct SessionStore {
    sessions: RwLock<Vec<ChatSession>>,
    /// Held by a mutation until its snapshot is written
    write_lock: Mutex<()>,
    repository: Arc<dyn SessionRepository>,
    events: broadcast::Sender<StoreEvent>,
}

impl SessionStore {
    /// Creates an empty store backed by `repository`. Nothing is read until
    /// `load` or `initialize` is called.
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            sessions: RwLock::new(Vec::new()),
            write_lock: Mutex::new(()),
            repository,
            events,
        }
    }

    /// Creates a store and loads the persisted collection, treating a
    /// missing or malformed blob as empty.
    pub async fn open(repository: Arc<dyn SessionRepository>) -> Self {
        let store = Self::new(repository);
        store.initialize().await;
        store
    }

    /// Reads the persisted collection into memory.
    ///
    /// Duplicate ids in the blob are dropped (first occurrence wins).
    ///
    /// # Returns
    ///
    /// - `Ok(count)`: Number of sessions loaded (0 if the slot was never written)
    /// - `Err(RagAdminError::Deserialization)`: The blob is malformed; memory is untouched
    pub async fn load(&self) -> Result<usize> {
        let _writing = self.write_lock.lock().await;
        let loaded = self.repository.load().await?;

        let mut seen = HashSet::new();
        let total = loaded.len();
        let unique: Vec<ChatSession> = loaded
            .into_iter()
            .filter(|session| seen.insert(session.id.clone()))
            .collect();
        if unique.len() != total {
            tracing::warn!(
                "[SessionStore] Dropped {} duplicate session(s) from persisted state",
                total - unique.len()
            );
        }

        let count = unique.len();
        *self.sessions.write().await = unique;
        self.publish(StoreEvent::Replaced);

        tracing::debug!("[SessionStore] Loaded {} session(s)", count);
        Ok(count)
    }

    /// Loads the persisted collection, recovering from any read failure by
    /// starting empty.
    pub async fn initialize(&self) -> usize {
        match self.load().await {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!(
                    "[SessionStore] Ignoring unreadable persisted sessions, starting empty: {}",
                    e
                );
                0
            }
        }
    }

    /// Replaces the full collection and persists it.
    ///
    /// # Errors
    ///
    /// - `RagAdminError::Internal` if `sessions` contains duplicate ids (nothing changes)
    /// - `RagAdminError::Persistence` if the write failed (memory was still replaced)
    pub async fn replace_all(&self, sessions: Vec<ChatSession>) -> Result<()> {
        let mut seen = HashSet::new();
        if let Some(duplicate) = sessions.iter().find(|s| !seen.insert(s.id.as_str())) {
            return Err(RagAdminError::internal(format!(
                "Duplicate session id in replacement: {}",
                duplicate.id
            )));
        }

        let _writing = self.write_lock.lock().await;
        let snapshot = {
            let mut guard = self.sessions.write().await;
            *guard = sessions;
            guard.clone()
        };
        let persisted = self.persist(&snapshot).await;

        self.publish(StoreEvent::Replaced);
        persisted
    }

    /// Replaces the transcript and title of one session and persists.
    ///
    /// An empty `derived_title` keeps the session's previous title.
    ///
    /// # Errors
    ///
    /// - `RagAdminError::NotFound` if no session has `session_id` (nothing changes)
    /// - `RagAdminError::Persistence` if the write failed (memory was still updated)
    pub async fn upsert_messages(
        &self,
        session_id: &str,
        messages: MessageMap,
        derived_title: &str,
    ) -> Result<()> {
        let _writing = self.write_lock.lock().await;
        let snapshot = {
            let mut guard = self.sessions.write().await;

            let Some(session) = guard.iter_mut().find(|s| s.id == session_id) else {
                tracing::debug!(
                    "[SessionStore] Ignoring message update for unknown session: {}",
                    session_id
                );
                return Err(RagAdminError::not_found("ChatSession", session_id));
            };

            session.messages = messages;
            if !derived_title.is_empty() {
                session.title = derived_title.to_string();
            }
            guard.clone()
        };

        let persisted = self.persist(&snapshot).await;

        self.publish(StoreEvent::MessagesUpdated {
            session_id: session_id.to_string(),
        });
        persisted
    }

    /// Adds a session at the end of the list and persists.
    ///
    /// # Errors
    ///
    /// - `RagAdminError::Internal` if a session with the same id already exists (nothing changes)
    /// - `RagAdminError::Persistence` if the write failed (memory was still updated)
    pub async fn append(&self, session: ChatSession) -> Result<()> {
        let _writing = self.write_lock.lock().await;
        let session_id = session.id.clone();
        let snapshot = {
            let mut guard = self.sessions.write().await;

            if guard.iter().any(|s| s.id == session.id) {
                return Err(RagAdminError::internal(format!(
                    "Session already exists: {}",
                    session.id
                )));
            }

            guard.push(session);
            guard.clone()
        };

        let persisted = self.persist(&snapshot).await;

        tracing::info!("[SessionStore] Appended session {}", session_id);
        self.publish(StoreEvent::Appended { session_id });
        persisted
    }

    /// Returns a snapshot of all sessions in insertion order.
    pub async fn sessions(&self) -> Vec<ChatSession> {
        self.sessions.read().await.clone()
    }

    pub async fn get(&self, session_id: &str) -> Option<ChatSession> {
        self.sessions
            .read()
            .await
            .iter()
            .find(|s| s.id == session_id)
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Session list entries in display order, flagging `current_id`.
    pub async fn summaries(&self, current_id: Option<&str>) -> Vec<SessionSummary> {
        self.sessions
            .read()
            .await
            .iter()
            .map(|s| SessionSummary {
                id: s.id.clone(),
                title: s.title.clone(),
                is_current: Some(s.id.as_str()) == current_id,
                message_count: s.messages.len(),
            })
            .collect()
    }

    /// Subscribes to change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    async fn persist(&self, sessions: &[ChatSession]) -> Result<()> {
        match self.repository.replace_all(sessions).await {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::warn!(
                    "[SessionStore] Failed to persist sessions, keeping in-memory state: {}",
                    e
                );
                Err(match e {
                    RagAdminError::Persistence(_) => e,
                    other => RagAdminError::persistence(other.to_string()),
                })
            }
        }
    }

    fn publish(&self, event: StoreEvent) {
        // No receivers is fine: nobody is watching yet.
        let _ = self.events.send(event);
    }
}
