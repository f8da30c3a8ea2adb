//! Mocks shared by the session tests.

use crate::error::{RagAdminError, Result};
use crate::session::model::ChatSession;
use crate::session::navigation::Navigator;
use crate::session::repository::SessionRepository;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tokio::sync::Notify;

// Mock SessionRepository that behaves like a single string slot
pub struct MockSlotRepository {
    blob: Mutex<Option<String>>,
    pub fail_writes: AtomicBool,
}

impl MockSlotRepository {
    pub fn new() -> Self {
        Self {
            blob: Mutex::new(None),
            fail_writes: AtomicBool::new(false),
        }
    }

    pub fn with_blob(blob: &str) -> Self {
        let repo = Self::new();
        *repo.blob.lock().unwrap() = Some(blob.to_string());
        repo
    }

    pub fn blob(&self) -> Option<String> {
        self.blob.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl SessionRepository for MockSlotRepository {
    async fn load(&self) -> Result<Vec<ChatSession>> {
        match self.blob.lock().unwrap().as_deref() {
            None => Ok(Vec::new()),
            Some(raw) => Ok(serde_json::from_str(raw)?),
        }
    }

    async fn replace_all(&self, sessions: &[ChatSession]) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RagAdminError::persistence("quota exceeded"));
        }
        let raw = serde_json::to_string(sessions).unwrap();
        *self.blob.lock().unwrap() = Some(raw);
        Ok(())
    }
}

// Mock SessionRepository whose writes stall until released
#[derive(Default)]
pub struct GatedRepository {
    pub entered: Notify,
    pub release: Notify,
    writes: Mutex<Vec<Vec<String>>>,
}

impl GatedRepository {
    /// Session ids of every completed write, in order.
    pub fn writes(&self) -> Vec<Vec<String>> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl SessionRepository for GatedRepository {
    async fn load(&self) -> Result<Vec<ChatSession>> {
        Ok(Vec::new())
    }

    async fn replace_all(&self, sessions: &[ChatSession]) -> Result<()> {
        self.entered.notify_one();
        self.release.notified().await;
        let ids = sessions.iter().map(|s| s.id.clone()).collect();
        self.writes.lock().unwrap().push(ids);
        Ok(())
    }
}

// Mock Navigator that records requests and applies them only when told to
pub struct MockNavigator {
    current: Mutex<Option<String>>,
    issued: Mutex<Vec<String>>,
}

impl MockNavigator {
    pub fn new(current: Option<&str>) -> Self {
        Self {
            current: Mutex::new(current.map(str::to_string)),
            issued: Mutex::new(Vec::new()),
        }
    }

    /// Makes the most recent navigation request visible in the route.
    pub fn settle(&self) {
        let last = self.issued.lock().unwrap().last().cloned();
        if let Some(id) = last {
            *self.current.lock().unwrap() = Some(id);
        }
    }

    pub fn set_route(&self, session_id: Option<&str>) {
        *self.current.lock().unwrap() = session_id.map(str::to_string);
    }

    pub fn issued(&self) -> Vec<String> {
        self.issued.lock().unwrap().clone()
    }
}

impl Navigator for MockNavigator {
    fn current(&self) -> Option<String> {
        self.current.lock().unwrap().clone()
    }

    fn navigate(&self, session_id: &str) {
        self.issued.lock().unwrap().push(session_id.to_string());
    }
}
