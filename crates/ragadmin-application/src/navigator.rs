use ragadmin_core::session::Navigator;
use std::sync::Mutex;

/// Navigator whose route lives in process memory.
///
/// Navigation requests take effect immediately. Used by the CLI, where the
/// route is the `--chat` argument rather than a browser location.
#[derive(Debug, Default)]
pub struct InMemoryNavigator {
    route: Mutex<Option<String>>,
}

impl InMemoryNavigator {
    pub fn new(initial: Option<String>) -> Self {
        Self {
            route: Mutex::new(initial),
        }
    }
}

impl Navigator for InMemoryNavigator {
    fn current(&self) -> Option<String> {
        self.route
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn navigate(&self, session_id: &str) {
        tracing::debug!("[Navigator] Navigating to {}", session_id);
        *self
            .route
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(session_id.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigate_replaces_route() {
        let navigator = InMemoryNavigator::new(None);
        assert_eq!(navigator.current(), None);

        navigator.navigate("abc");
        assert_eq!(navigator.current().as_deref(), Some("abc"));
    }
}
