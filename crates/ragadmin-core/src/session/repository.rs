//! Session repository trait.
//!
//! Defines the interface for the persistent slot that holds every chat
//! session.

use super::model::ChatSession;
use crate::error::Result;
use async_trait::async_trait;

/// Name of the persisted slot holding the serialized session list.
pub const SESSIONS_SLOT: &str = "chat_sessions";

/// An abstract repository for the persisted session collection.
///
/// The collection is stored as one blob: a serialized, ordered array of
/// `ChatSession`. Writes always replace the whole blob, so the persisted state
/// is never a partial update.
///
/// # Implementation Notes
///
/// Implementations should:
/// - Return an empty collection when nothing was ever written
/// - Return `RagAdminError::Deserialization` for a malformed blob
/// - Return `RagAdminError::Persistence` when a write cannot be completed
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Reads the persisted collection.
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<ChatSession>)`: Stored sessions in insertion order (empty if absent)
    /// - `Err(RagAdminError::Deserialization)`: The stored blob is malformed
    async fn load(&self) -> Result<Vec<ChatSession>>;

    /// Replaces the persisted collection with `sessions`.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The complete collection was written
    /// - `Err(RagAdminError::Persistence)`: The write failed; the previous blob stands
    async fn replace_all(&self, sessions: &[ChatSession]) -> Result<()>;
}
