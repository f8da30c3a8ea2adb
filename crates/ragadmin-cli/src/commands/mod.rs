pub mod chat;
pub mod models;
pub mod sessions;
pub mod upload;
