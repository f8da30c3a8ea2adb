//! Mocks shared by the application tests.

use async_trait::async_trait;
use futures::StreamExt;
use ragadmin_core::backend::{ChatBackend, ChatRequest, ChatResponse};
use ragadmin_core::error::{RagAdminError, Result};
use ragadmin_core::notify::{Notification, Notifier};
use std::collections::HashMap;
use std::sync::Mutex;

/// How `MockBackend::send_chat` answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatMode {
    /// 200 with body "reply"
    Reply,
    /// `Err(Http)` as the HTTP client reports a rejected request
    HttpError(u16),
    /// `Err(Network)`, the backend is unreachable
    Unreachable,
    /// `Ok` response carrying a non-success status
    Status(u16),
}

// Mock ChatBackend that answers every chat with "reply" unless told otherwise
pub struct MockBackend {
    models: Mutex<Option<Vec<String>>>,
    chat_mode: Mutex<ChatMode>,
    chat_requests: Mutex<Vec<ChatRequest>>,
    rejections: Mutex<HashMap<String, (u16, String)>>,
    uploaded: Mutex<Vec<String>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            models: Mutex::new(Some(Vec::new())),
            chat_mode: Mutex::new(ChatMode::Reply),
            chat_requests: Mutex::new(Vec::new()),
            rejections: Mutex::new(HashMap::new()),
            uploaded: Mutex::new(Vec::new()),
        }
    }

    /// `None` makes `list_models` fail.
    pub fn set_models(&self, models: Option<Vec<String>>) {
        *self.models.lock().unwrap() = models;
    }

    pub fn set_chat_mode(&self, mode: ChatMode) {
        *self.chat_mode.lock().unwrap() = mode;
    }

    pub fn reject_upload(&self, file_name: &str, status: u16, error: &str) {
        self.rejections
            .lock()
            .unwrap()
            .insert(file_name.to_string(), (status, error.to_string()));
    }

    pub fn chat_requests(&self) -> Vec<ChatRequest> {
        self.chat_requests.lock().unwrap().clone()
    }

    pub fn uploaded_names(&self) -> Vec<String> {
        self.uploaded.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for MockBackend {
    async fn list_models(&self) -> Result<Vec<String>> {
        self.models
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| RagAdminError::network("connection refused"))
    }

    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        self.chat_requests.lock().unwrap().push(request.clone());
        let mode = *self.chat_mode.lock().unwrap();
        let status = match mode {
            ChatMode::Reply => 200,
            ChatMode::Status(status) => status,
            ChatMode::HttpError(status) => return Err(RagAdminError::http(status, "bad gateway")),
            ChatMode::Unreachable => return Err(RagAdminError::network("connection refused")),
        };
        let body = futures::stream::once(async { Ok("reply".to_string()) }).boxed();
        Ok(ChatResponse::streaming(status, "text/plain", body))
    }

    async fn upload_document(&self, file_name: &str, _bytes: Vec<u8>) -> Result<()> {
        self.uploaded.lock().unwrap().push(file_name.to_string());
        match self.rejections.lock().unwrap().get(file_name) {
            Some((status, error)) => Err(RagAdminError::http(*status, error.clone())),
            None => Ok(()),
        }
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    received: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn notifications(&self) -> Vec<Notification> {
        self.received.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.received.lock().unwrap().push(notification);
    }
}
