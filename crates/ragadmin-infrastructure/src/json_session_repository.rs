//! JSON file-based SessionRepository implementation.

use crate::storage::AtomicJsonFile;
use async_trait::async_trait;
use ragadmin_core::error::{RagAdminError, Result};
use ragadmin_core::session::{ChatSession, SESSIONS_SLOT, SessionRepository};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A repository that keeps the session slot in one JSON file.
///
/// The file holds exactly the serialized session array:
/// ```text
/// data_dir/
/// └── chat_sessions.json   # [{"id": ..., "title": ..., "messages": {...}}, ...]
/// ```
///
/// Every write replaces the file atomically. File I/O runs on the blocking
/// pool so the async runtime is never stalled.
pub struct JsonFileSessionRepository {
    file: Arc<AtomicJsonFile<Vec<ChatSession>>>,
}

impl JsonFileSessionRepository {
    /// Creates a repository whose slot lives in `base_dir`.
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        let path = base_dir.as_ref().join(format!("{}.json", SESSIONS_SLOT));
        Self::at_path(path)
    }

    /// Creates a repository backed by an explicit file path.
    pub fn at_path(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicJsonFile::new(path)),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

#[async_trait]
impl SessionRepository for JsonFileSessionRepository {
    async fn load(&self) -> Result<Vec<ChatSession>> {
        let file = self.file.clone();
        let loaded = tokio::task::spawn_blocking(move || file.load())
            .await
            .map_err(|e| RagAdminError::internal(format!("Failed to join task: {}", e)))??;

        Ok(loaded.unwrap_or_default())
    }

    async fn replace_all(&self, sessions: &[ChatSession]) -> Result<()> {
        let file = self.file.clone();
        let snapshot = sessions.to_vec();
        tokio::task::spawn_blocking(move || file.save(&snapshot))
            .await
            .map_err(|e| RagAdminError::persistence(format!("Failed to join task: {}", e)))??;

        tracing::debug!(
            "[JsonFileSessionRepository] Wrote {} session(s) to {}",
            sessions.len(),
            self.file.path().display()
        );
        Ok(())
    }
}
