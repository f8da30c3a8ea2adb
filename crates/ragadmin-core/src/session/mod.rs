//! Session domain module.
//!
//! This module contains the chat session model, the persistent store, the
//! router that binds navigation to a session, the history translator, and
//! the sync bridge that writes finished exchanges back to the store.
//!
//! # Module Structure
//!
//! - `model`: Core session domain model (`ChatSession`)
//! - `message`: Displayed message types (`Message`, `MessageRole`, `MessageMap`)
//! - `repository`: Repository trait for the persisted session slot
//! - `store`: Authoritative session collection (`SessionStore`)
//! - `navigation`: Route abstraction (`Navigator`)
//! - `display`: State handed to the chat widget (`DisplayState`)
//! - `router`: Session routing state machine (`SessionRouter`)
//! - `history`: Backend history projection (`translate`)
//! - `title`: Title derivation from the first user message
//! - `sync`: Exchange reconciliation (`SyncBridge`)
//!
//! # Usage
//!
//! ```ignore
//! use ragadmin_core::session::{SessionStore, SessionRouter, SyncBridge};
//! use ragadmin_core::session::{ChatSession, Message, MessageMap, MessageRole};
//! ```

mod display;
mod history;
mod message;
mod model;
mod navigation;
mod repository;
mod router;
mod store;
mod sync;
mod title;

#[cfg(test)]
mod test_support;

// Re-export public API
pub use display::{DisplayState, SharedDisplay, shared_display};
pub use history::{HistoryEntry, HistoryRole, TranslatedHistory, translate};
pub use message::{Message, MessageMap, MessageRole};
pub use model::{ChatSession, DEFAULT_SESSION_TITLE, SessionSummary};
pub use navigation::Navigator;
pub use repository::{SESSIONS_SLOT, SessionRepository};
pub use router::{RouteOutcome, RouteState, SessionRouter};
pub use store::{SessionStore, StoreEvent};
pub use sync::SyncBridge;
pub use title::{TITLE_MAX_CHARS, derive_title};
