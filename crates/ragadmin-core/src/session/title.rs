//! Session title derivation.

use super::message::{MessageMap, MessageRole};
use super::model::DEFAULT_SESSION_TITLE;

/// Number of characters kept from the first user message.
pub const TITLE_MAX_CHARS: usize = 30;

const ELLIPSIS: &str = "...";

/// Derives a session title from the first user message in `messages`.
///
/// The content is cut at `TITLE_MAX_CHARS` characters (Unicode scalar
/// values) with `...` appended when it was longer. Later messages are never
/// consulted. Falls back to `"New Chat"` when there is no user message or its
/// content is empty.
pub fn derive_title(messages: &MessageMap) -> String {
    let first_user = messages.values().find(|m| m.role == MessageRole::User);

    match first_user {
        Some(message) if !message.content.is_empty() => {
            let mut chars = message.content.chars();
            let head: String = chars.by_ref().take(TITLE_MAX_CHARS).collect();
            if chars.next().is_some() {
                format!("{}{}", head, ELLIPSIS)
            } else {
                head
            }
        }
        _ => DEFAULT_SESSION_TITLE.to_string(),
    }
}
