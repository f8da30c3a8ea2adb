//! Contract toward the document-chat backend.
//!
//! The backend itself is an external collaborator; this module only defines
//! what the client sends and what it expects back.

use crate::error::Result;
use crate::session::HistoryEntry;
use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Model used when the backend does not offer any.
pub const DEFAULT_MODEL: &str = "llama2";

/// Body of the synthetic response returned when a chat request fails.
pub const SEND_FAILURE_BODY: &str = "An error occurred while processing your message.";

/// Status of the synthetic failure response.
pub const SEND_FAILURE_STATUS: u16 = 500;

/// Body of `POST /api/chat/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// Content of the newest message
    pub message: String,
    /// Session the request belongs to, captured when the request was built
    pub chat_id: String,
    /// Every earlier message of the session
    pub history: Vec<HistoryEntry>,
    pub model: String,
}

/// Body of `GET /api/models/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelsResponse {
    #[serde(default)]
    pub models: Vec<String>,
}

/// Streamed body chunks of a chat reply.
pub type BodyStream = BoxStream<'static, Result<String>>;

/// Response handed to the chat widget.
///
/// Either the backend's streamed reply or a synthetic failure. The widget
/// always receives one of these, never a transport error.
pub struct ChatResponse {
    status: u16,
    content_type: String,
    synthetic: bool,
    body: BodyStream,
}

impl ChatResponse {
    /// Wraps a streamed backend reply.
    pub fn streaming(status: u16, content_type: impl Into<String>, body: BodyStream) -> Self {
        Self {
            status,
            content_type: content_type.into(),
            synthetic: false,
            body,
        }
    }

    /// Builds the plain-text 500 response used in place of a failed request.
    pub fn synthetic_failure() -> Self {
        Self {
            status: SEND_FAILURE_STATUS,
            content_type: "text/plain".to_string(),
            synthetic: true,
            body: stream::once(async { Ok(SEND_FAILURE_BODY.to_string()) }).boxed(),
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// True when this response was produced locally after a failure.
    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    pub fn into_body(self) -> BodyStream {
        self.body
    }

    /// Drains the body into one string.
    pub async fn text(self) -> Result<String> {
        let mut body = self.body;
        let mut text = String::new();
        while let Some(chunk) = body.next().await {
            text.push_str(&chunk?);
        }
        Ok(text)
    }
}

impl fmt::Debug for ChatResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatResponse")
            .field("status", &self.status)
            .field("content_type", &self.content_type)
            .field("synthetic", &self.synthetic)
            .finish_non_exhaustive()
    }
}

/// Outbound HTTP surface of the backend.
///
/// Implementations return `RagAdminError::Network` when the backend cannot
/// be reached and `RagAdminError::Http` for non-success statuses. Turning
/// those into notifications or synthetic responses is the caller's job.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// `GET /api/models/`
    async fn list_models(&self) -> Result<Vec<String>>;

    /// `POST /api/chat/`; a success response carries the streamed reply.
    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatResponse>;

    /// `POST /api/upload/` with one multipart `file` field.
    ///
    /// A non-success status yields `RagAdminError::Http` whose message is the
    /// server's `error` field, or empty when the server gave none.
    async fn upload_document(&self, file_name: &str, bytes: Vec<u8>) -> Result<()>;
}
