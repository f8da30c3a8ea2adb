//! State handed to the rendering collaborator.

use super::message::MessageMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// What the chat widget is currently showing.
///
/// `epoch` is bumped every time a different session becomes active. A widget
/// that sees a new epoch must discard its internal draft state and re-seed
/// from `messages`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayState {
    /// Session bound to the route, if routing has settled
    pub session_id: Option<String>,
    /// Transcript to render; `None` until a session is displayed
    pub messages: Option<MessageMap>,
    pub epoch: u64,
}

impl DisplayState {
    /// Returns true when `session_id` is the session being shown.
    pub fn is_showing(&self, session_id: &str) -> bool {
        self.session_id.as_deref() == Some(session_id)
    }
}

/// Display state shared between the router and the sync bridge.
pub type SharedDisplay = Arc<RwLock<DisplayState>>;

pub fn shared_display() -> SharedDisplay {
    Arc::new(RwLock::new(DisplayState::default()))
}
