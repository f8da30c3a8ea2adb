//! Error types for the RAGAdmin client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the RAGAdmin client crates.
///
/// None of these variants is fatal to the process. Each one describes a
/// failure that the caller recovers from locally: a corrupt persisted blob is
/// treated as empty, a failed write leaves the in-memory state authoritative,
/// an unknown session id is a no-op, and a backend failure becomes a user
/// notification.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RagAdminError {
    /// Persisted state could not be parsed
    #[error("Deserialization error: {format} - {message}")]
    Deserialization {
        format: String, // "JSON", "TOML", etc.
        message: String,
    },

    /// Persisted state could not be written
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Backend unreachable (connect, timeout, body read)
    #[error("Network error: {0}")]
    Network(String),

    /// Backend answered with a non-success status
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RagAdminError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a Persistence error
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence(message.into())
    }

    /// Creates a Deserialization error for a JSON payload
    pub fn deserialization(message: impl Into<String>) -> Self {
        Self::Deserialization {
            format: "JSON".to_string(),
            message: message.into(),
        }
    }

    /// Creates a Network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates an Http error
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a deserialization error
    pub fn is_deserialization(&self) -> bool {
        matches!(self, Self::Deserialization { .. })
    }

    /// Check if this is a persistence error
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }

    /// Check if this error came from talking to the backend.
    ///
    /// Returns true for both `Network` and `Http` errors.
    pub fn is_backend(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Http { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for RagAdminError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for RagAdminError {
    fn from(err: serde_json::Error) -> Self {
        Self::Deserialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for RagAdminError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("TOML: {}", err))
    }
}

/// A type alias for `Result<T, RagAdminError>`.
pub type Result<T> = std::result::Result<T, RagAdminError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_predicate() {
        assert!(RagAdminError::network("refused").is_backend());
        assert!(RagAdminError::http(502, "bad gateway").is_backend());
        assert!(!RagAdminError::persistence("quota").is_backend());
    }

    #[test]
    fn test_json_error_maps_to_deserialization() {
        let err: RagAdminError = serde_json::from_str::<Vec<String>>("{not json")
            .unwrap_err()
            .into();
        assert!(err.is_deserialization());
    }

    #[test]
    fn test_not_found_display() {
        let err = RagAdminError::not_found("ChatSession", "abc");
        assert_eq!(err.to_string(), "Entity not found: ChatSession 'abc'");
        assert!(err.is_not_found());
    }
}
