//! Domain layer of the RAGAdmin chat client.
//!
//! Holds the chat session model and lifecycle (store, router, history
//! translation, sync bridge) plus the contracts the outer layers implement:
//! session persistence, navigation, the backend, and user notifications.

pub mod backend;
pub mod config;
pub mod error;
pub mod notify;
pub mod session;

// Re-export common error type
pub use error::{RagAdminError, Result};
