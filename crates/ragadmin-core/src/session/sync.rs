//! Sync bridge between the chat widget and the session store.

use super::display::SharedDisplay;
use super::message::MessageMap;
use super::store::SessionStore;
use super::title::derive_title;
use crate::error::Result;
use std::sync::Arc;

/// Reconciles transcripts produced by the chat widget into durable session
/// state.
pub struct SyncBridge {
    store: Arc<SessionStore>,
    display: SharedDisplay,
}

impl SyncBridge {
    pub fn new(store: Arc<SessionStore>, display: SharedDisplay) -> Self {
        Self { store, display }
    }

    /// Applies the finalized transcript of `session_id` after an exchange.
    ///
    /// `session_id` must be the id captured when the request was sent, not
    /// whatever session is active now. The displayed transcript is replaced
    /// only if that session is still the one on display.
    ///
    /// # Returns
    ///
    /// - `Ok(title)`: The title derived and stored for the session
    /// - `Err(RagAdminError::NotFound)`: No stored session has this id; the store is unchanged
    /// - `Err(RagAdminError::Persistence)`: Stored in memory, but the write failed
    pub async fn on_exchange_complete(
        &self,
        session_id: &str,
        messages: MessageMap,
    ) -> Result<String> {
        let title = derive_title(&messages);

        let stored = self
            .store
            .upsert_messages(session_id, messages.clone(), &title)
            .await;

        {
            let mut display = self.display.write().await;
            if display.is_showing(session_id) {
                display.messages = Some(messages);
            } else {
                tracing::debug!(
                    "[SyncBridge] Session {} is no longer displayed, store only",
                    session_id
                );
            }
        }

        match stored {
            Ok(()) => {
                tracing::debug!("[SyncBridge] Synced session {} as '{}'", session_id, title);
                Ok(title)
            }
            Err(e) => {
                tracing::warn!("[SyncBridge] Sync of session {} incomplete: {}", session_id, e);
                Err(e)
            }
        }
    }
}
