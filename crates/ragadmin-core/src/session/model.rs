//! Chat session domain model.

use super::message::MessageMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Title given to a session before any user message has been sent.
pub const DEFAULT_SESSION_TITLE: &str = "New Chat";

/// One independent conversation thread.
///
/// The persisted shape is exactly `{id, title, messages}`; there is no
/// version field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    /// Unique session identifier (UUID format), assigned once at creation
    pub id: String,
    /// Display name shown in the session list
    pub title: String,
    /// Full transcript keyed by message id
    #[serde(default)]
    pub messages: MessageMap,
}

impl ChatSession {
    /// Creates an empty session with a fresh UUID and the default title.
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4().to_string())
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: DEFAULT_SESSION_TITLE.to_string(),
            messages: MessageMap::new(),
        }
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Entry of the session list shown next to the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub id: String,
    pub title: String,
    pub is_current: bool,
    pub message_count: usize,
}
