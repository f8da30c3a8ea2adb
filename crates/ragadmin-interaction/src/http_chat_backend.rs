//! HttpChatBackend - REST implementation of the document-chat backend.
//!
//! Talks to `{backend_url}/api/models/`, `/api/chat/` and `/api/upload/`.

use crate::utf8_stream::decode_utf8;
use async_trait::async_trait;
use futures::StreamExt;
use ragadmin_core::backend::{ChatBackend, ChatRequest, ChatResponse, ModelsResponse};
use ragadmin_core::config::ClientConfig;
use ragadmin_core::error::{RagAdminError, Result};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, header::CONTENT_TYPE};
use serde::Deserialize;
use std::time::Duration;

/// Backend client speaking HTTP.
#[derive(Clone)]
pub struct HttpChatBackend {
    client: Client,
    base_url: String,
}

impl HttpChatBackend {
    /// Creates a client for `base_url` (e.g. `http://localhost:8000`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Creates a client from the loaded configuration.
    ///
    /// The timeout bounds connection setup only, so long streamed replies
    /// are not cut off.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| RagAdminError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.backend_base().to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/api/{}/", self.base_url, name)
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn list_models(&self) -> Result<Vec<String>> {
        let response = self
            .client
            .get(self.endpoint("models"))
            .send()
            .await
            .map_err(map_transport_error)?;

        let response = ensure_success(response).await?;
        let parsed: ModelsResponse = response.json().await.map_err(|e| {
            RagAdminError::deserialization(format!("Invalid models response: {}", e))
        })?;

        tracing::debug!("[HttpChatBackend] {} models offered", parsed.models.len());
        Ok(parsed.models)
    }

    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        tracing::debug!(
            "[HttpChatBackend] Sending chat for session {} ({} history entries, model {})",
            request.chat_id,
            request.history.len(),
            request.model
        );

        let response = self
            .client
            .post(self.endpoint("chat"))
            .json(request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let response = ensure_success(response).await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("text/plain")
            .to_string();

        let body = decode_utf8(response.bytes_stream())
            .map(|chunk| chunk.map_err(map_transport_error))
            .boxed();

        Ok(ChatResponse::streaming(status, content_type, body))
    }

    async fn upload_document(&self, file_name: &str, bytes: Vec<u8>) -> Result<()> {
        let mime = mime_guess::from_path(file_name).first_or_octet_stream();
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime.essence_str())
            .map_err(|e| RagAdminError::internal(format!("Invalid MIME type: {}", e)))?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status.is_success() {
            tracing::info!("[HttpChatBackend] Uploaded {}", file_name);
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<UploadErrorBody>(&body)
            .ok()
            .and_then(|parsed| parsed.error)
            .unwrap_or_default();
        tracing::warn!(
            "[HttpChatBackend] Upload of {} rejected with {}: {}",
            file_name,
            status,
            message
        );
        Err(RagAdminError::http(status.as_u16(), message))
    }
}

#[derive(Debug, Deserialize)]
struct UploadErrorBody {
    #[serde(default)]
    error: Option<String>,
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(RagAdminError::http(status.as_u16(), body))
}

fn map_transport_error(err: reqwest::Error) -> RagAdminError {
    if err.is_timeout() {
        RagAdminError::network(format!("Request timed out: {}", err))
    } else {
        RagAdminError::network(err.to_string())
    }
}
