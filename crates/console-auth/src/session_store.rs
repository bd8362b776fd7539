//! Reactive session state for a console page
//!
//! Holds `{data, error, isPending, isAdmin}` behind a `watch` channel so
//! anything rendering the page can subscribe to changes. A store starts
//! pending and is normally hydrated once with the session the server
//! already verified.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use tokio::sync::watch;

use crate::session::Session;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub data: Option<Session>,
    pub error: Option<String>,
    pub is_pending: bool,
    /// Derived from `data`
    pub is_admin: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            is_pending: true,
            is_admin: false,
        }
    }
}

#[derive(Debug)]
pub struct SessionStore {
    tx: watch::Sender<SessionState>,
    hydrated: AtomicBool,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SessionState::default());
        Self {
            tx,
            hydrated: AtomicBool::new(false),
        }
    }

    /// Seed the store with a server-side session. Only the first call
    /// takes effect; returns whether this one did.
    pub fn hydrate(&self, session: Option<Session>) -> bool {
        if self.hydrated.swap(true, Ordering::SeqCst) {
            return false;
        }
        self.set_session(session);
        true
    }

    pub fn set_session(&self, session: Option<Session>) {
        let is_admin = session.as_ref().map_or(false, |s| s.user.is_admin());
        self.tx.send_replace(SessionState {
            data: session,
            error: None,
            is_pending: false,
            is_admin,
        });
    }

    pub fn clear_session(&self) {
        self.set_session(None);
    }

    pub fn set_pending(&self, is_pending: bool) {
        self.tx.send_modify(|state| state.is_pending = is_pending);
    }

    /// Record a failure. Also ends the pending state.
    pub fn set_error(&self, error: impl Into<String>) {
        let error = error.into();
        self.tx.send_modify(|state| {
            state.error = Some(error);
            state.is_pending = false;
        });
    }

    pub fn snapshot(&self) -> SessionState {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.tx.subscribe()
    }
}
