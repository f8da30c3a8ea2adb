//! Projection of displayed messages into backend request history.

use super::message::{Message, MessageRole};
use serde::{Deserialize, Serialize};

/// Two-valued role used by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryRole {
    Human,
    Ai,
}

impl From<&MessageRole> for HistoryRole {
    fn from(role: &MessageRole) -> Self {
        match role {
            MessageRole::Assistant => HistoryRole::Ai,
            _ => HistoryRole::Human,
        }
    }
}

/// Backend-facing projection of a message. Ids and display metadata are
/// dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub content: String,
    pub role: HistoryRole,
}

impl From<&Message> for HistoryEntry {
    fn from(message: &Message) -> Self {
        Self {
            content: message.content.clone(),
            role: HistoryRole::from(&message.role),
        }
    }
}

/// The newest message split off as the prompt, with everything before it as
/// history.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TranslatedHistory {
    pub prompt: String,
    pub history: Vec<HistoryEntry>,
}

/// Splits `messages` (oldest first) into the prompt and the projected history.
///
/// The prompt is the content of the last message, or an empty string when
/// there are no messages.
pub fn translate(messages: &[Message]) -> TranslatedHistory {
    match messages.split_last() {
        Some((last, earlier)) => TranslatedHistory {
            prompt: last.content.clone(),
            history: earlier.iter().map(HistoryEntry::from).collect(),
        },
        None => TranslatedHistory::default(),
    }
}
