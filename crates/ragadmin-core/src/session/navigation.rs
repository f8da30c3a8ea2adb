//! Navigation surface abstraction.
//!
//! The active session id lives in an externally owned route parameter. The
//! core only reads it and issues navigation requests; it never assigns it
//! directly.

/// Externally owned route holding the active session id.
pub trait Navigator: Send + Sync {
    /// Returns the session id currently in the route, if any.
    fn current(&self) -> Option<String>;

    /// Requests navigation to `session_id`.
    ///
    /// The request may take effect later; callers observe the result through
    /// `current`.
    fn navigate(&self, session_id: &str);
}
