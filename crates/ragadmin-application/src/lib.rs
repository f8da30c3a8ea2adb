//! Application layer for RAGAdmin.
//!
//! Wires the session store, router and sync bridge to the chat backend and
//! exposes the operations a chat front end drives.

pub mod chat_controller;
pub mod model_selection;
pub mod navigator;
pub mod notifier;

#[cfg(test)]
mod test_support;

pub use chat_controller::{ChatController, Exchange, UploadOutcome, WELCOME_MESSAGE};
pub use model_selection::ModelSelection;
pub use navigator::InMemoryNavigator;
pub use notifier::LogNotifier;
