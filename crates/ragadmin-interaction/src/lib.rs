pub mod http_chat_backend;
pub mod utf8_stream;

pub use crate::http_chat_backend::HttpChatBackend;
