//! In-memory SessionRepository implementation.

use async_trait::async_trait;
use ragadmin_core::error::{RagAdminError, Result};
use ragadmin_core::session::{ChatSession, SessionRepository};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// A repository holding the session slot as a JSON string in memory.
///
/// Behaves like a browser key-value slot: the stored value is the serialized
/// session array, so a malformed value can be planted to exercise recovery,
/// and writes can be made to fail on demand.
#[derive(Default)]
pub struct InMemorySessionRepository {
    slot: Mutex<Option<String>>,
    fail_writes: AtomicBool,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository whose slot already holds `raw`.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(raw.into())),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Returns the raw slot content, `None` if never written.
    pub fn raw(&self) -> Option<String> {
        self.slot.lock().map(|slot| slot.clone()).unwrap_or(None)
    }

    /// Makes subsequent writes fail with a persistence error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn load(&self) -> Result<Vec<ChatSession>> {
        let raw = self
            .slot
            .lock()
            .map_err(|e| RagAdminError::internal(format!("Slot lock poisoned: {}", e)))?
            .clone();

        match raw {
            None => Ok(Vec::new()),
            Some(raw) if raw.trim().is_empty() => Ok(Vec::new()),
            Some(raw) => Ok(serde_json::from_str(&raw)?),
        }
    }

    async fn replace_all(&self, sessions: &[ChatSession]) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RagAdminError::persistence("Storage quota exceeded"));
        }

        let raw = serde_json::to_string(sessions)
            .map_err(|e| RagAdminError::persistence(e.to_string()))?;
        let mut slot = self
            .slot
            .lock()
            .map_err(|e| RagAdminError::persistence(format!("Slot lock poisoned: {}", e)))?;
        *slot = Some(raw);
        Ok(())
    }
}
