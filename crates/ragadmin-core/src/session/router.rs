//! Session routing.
//!
//! Binds the externally owned navigation id to a session in the store,
//! creating a first session when there is none and redirecting an empty
//! route to the first session in display order.

use super::display::SharedDisplay;
use super::model::ChatSession;
use super::navigation::Navigator;
use super::store::SessionStore;
use crate::error::Result;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

/// Routing state derived from the navigation id and the session count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteState {
    NoSessionsNoNav,
    SessionsExistNoNav,
    Navigated,
}

impl RouteState {
    pub fn classify(navigation_id: Option<&str>, session_count: usize) -> Self {
        match (navigation_id, session_count) {
            (Some(_), _) => RouteState::Navigated,
            (None, 0) => RouteState::NoSessionsNoNav,
            (None, _) => RouteState::SessionsExistNoNav,
        }
    }
}

/// Result of one routing pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    /// A session was synthesized and navigation to it was requested.
    Bootstrapped { session_id: String },
    /// Navigation to the first existing session was requested.
    Redirected { session_id: String },
    /// A navigation issued earlier has not reached the route yet.
    Pending { session_id: String },
    /// The routed session is on display.
    Displayed {
        session_id: String,
        epoch: u64,
        /// False when the id matches no stored session (shown as empty)
        found: bool,
        /// True when this pass started a new display identity (epoch bumped)
        switched: bool,
    },
}

/// Decides which session is active and keeps the shared display in step.
///
/// `sync` must be re-run whenever the navigation id or the store's session
/// list changes; `spawn_store_watch` does the latter automatically. Running
/// it again with unchanged inputs mutates nothing and issues no navigation.
pub struct SessionRouter {
    store: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
    display: SharedDisplay,
    /// Also serializes routing passes.
    memo: Mutex<RouteMemo>,
}

#[derive(Debug, Default)]
struct RouteMemo {
    /// Navigation requested but not yet visible in the route
    pending: Option<String>,
    /// Session shown by the last pass, if that pass ended in `Displayed`
    settled: Option<String>,
}

impl SessionRouter {
    pub fn new(
        store: Arc<SessionStore>,
        navigator: Arc<dyn Navigator>,
        display: SharedDisplay,
    ) -> Self {
        Self {
            store,
            navigator,
            display,
            memo: Mutex::new(RouteMemo::default()),
        }
    }

    pub fn display(&self) -> SharedDisplay {
        self.display.clone()
    }

    /// Runs one routing pass against the current route and store.
    ///
    /// # Errors
    ///
    /// Returns an error only if a bootstrap session could not be added to the
    /// store for a reason other than a failed write.
    pub async fn sync(&self) -> Result<RouteOutcome> {
        let mut memo = self.memo.lock().await;
        let navigation_id = self.navigator.current();

        if let Some(session_id) = navigation_id {
            memo.pending = None;
            let fresh = memo.settled.as_deref() != Some(session_id.as_str());
            memo.settled = Some(session_id.clone());
            return Ok(self.show(session_id, fresh).await);
        }

        memo.settled = None;
        let sessions = self.store.sessions().await;

        if let Some(target) = memo.pending.clone() {
            // The store may not have published the new session yet, or the
            // route has not caught up with the request.
            if sessions.is_empty() || sessions.iter().any(|s| s.id == target) {
                return Ok(RouteOutcome::Pending { session_id: target });
            }
            tracing::debug!(
                "[Router] Pending navigation target {} vanished, re-routing",
                target
            );
            memo.pending = None;
        }

        match RouteState::classify(None, sessions.len()) {
            RouteState::NoSessionsNoNav => {
                let session_id = self.append_new_session().await?;
                tracing::info!("[Router] Bootstrapped first session {}", session_id);
                memo.pending = Some(session_id.clone());
                self.navigator.navigate(&session_id);
                Ok(RouteOutcome::Bootstrapped { session_id })
            }
            _ => {
                let session_id = sessions[0].id.clone();
                tracing::debug!("[Router] Redirecting to first session {}", session_id);
                memo.pending = Some(session_id.clone());
                self.navigator.navigate(&session_id);
                Ok(RouteOutcome::Redirected { session_id })
            }
        }
    }

    /// Creates a new empty session, appends it and navigates to it.
    ///
    /// # Returns
    ///
    /// The id of the new session.
    pub async fn new_chat(&self) -> Result<String> {
        let mut memo = self.memo.lock().await;
        let session_id = self.append_new_session().await?;
        tracing::info!("[Router] Created new chat {}", session_id);
        memo.pending = Some(session_id.clone());
        memo.settled = None;
        self.navigator.navigate(&session_id);
        Ok(session_id)
    }

    /// Spawns a task that re-runs `sync` after every store change.
    pub fn spawn_store_watch(self: Arc<Self>) -> JoinHandle<()> {
        let mut events = self.store.subscribe();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(_) | Err(RecvError::Lagged(_)) => {
                        if let Err(e) = self.sync().await {
                            tracing::warn!("[Router] Routing after store change failed: {}", e);
                        }
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }

    /// Puts `session_id` on display. A `fresh` pass, one that follows
    /// anything other than displaying this same session, bumps the epoch.
    async fn show(&self, session_id: String, fresh: bool) -> RouteOutcome {
        let session = self.store.get(&session_id).await;
        let found = session.is_some();
        if !found {
            tracing::debug!(
                "[Router] No stored session {}, displaying empty transcript",
                session_id
            );
        }
        let messages = session.map(|s| s.messages).unwrap_or_default();

        let mut display = self.display.write().await;
        let switched = fresh || !display.is_showing(&session_id);
        if switched {
            display.epoch += 1;
            display.session_id = Some(session_id.clone());
            let epoch = display.epoch;
            tracing::info!(
                "[Router] Active session is now {} (epoch {})",
                session_id,
                epoch
            );
        }
        display.messages = Some(messages);

        RouteOutcome::Displayed {
            session_id,
            epoch: display.epoch,
            found,
            switched,
        }
    }

    async fn append_new_session(&self) -> Result<String> {
        let session = ChatSession::new();
        let session_id = session.id.clone();
        if let Err(e) = self.store.append(session).await {
            // A failed write still leaves the session in memory.
            if !e.is_persistence() {
                return Err(e);
            }
        }
        Ok(session_id)
    }
}
