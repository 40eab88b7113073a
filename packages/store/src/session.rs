//! # Session hub: push notifications of session changes
//!
//! The backend owns the session lifecycle. [`SessionHub`] is the single holder
//! of the current value: backends publish into it, consumers subscribe and
//! mirror. It wraps a [`tokio::sync::watch`] channel, so a subscriber always
//! observes the latest [`SessionChange`] and never a backlog.
//!
//! [`SessionState`] is what the UI keeps: the mirrored session plus a
//! `loading` flag that stays set until the backend reported its initial value.

use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::watch;

use crate::models::Session;

/// How often the session provider checks whether a refresh is due.
pub const REFRESH_TICK: StdDuration = StdDuration::from_secs(30);

/// Refresh once the access token expires within this many ticks.
pub const REFRESH_TICK_THRESHOLD: u32 = 3;

/// Why the session value changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthEvent {
    /// First value reported after start-up (restored, redirected, or absent).
    InitialSession,
    SignedIn,
    SignedOut,
    TokenRefreshed,
    /// The session ran out and could not be refreshed.
    Expired,
}

/// A session transition as pushed by the backend.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionChange {
    pub event: AuthEvent,
    pub session: Option<Session>,
}

/// Owner of the current session value.
#[derive(Debug)]
pub struct SessionHub {
    tx: watch::Sender<Option<SessionChange>>,
}

impl Default for SessionHub {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionHub {
    pub fn new() -> Self {
        // `None` until the backend reports its initial session.
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// The current session, if any.
    pub fn current(&self) -> Option<Session> {
        self.tx
            .borrow()
            .as_ref()
            .and_then(|change| change.session.clone())
    }

    /// Whether the initial session has been reported yet.
    pub fn is_initialized(&self) -> bool {
        self.tx.borrow().is_some()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<SessionChange>> {
        self.tx.subscribe()
    }

    pub fn publish(&self, event: AuthEvent, session: Option<Session>) {
        tracing::info!(
            ?event,
            user = session.as_ref().map(|s| s.user_id()),
            "session changed"
        );
        self.tx.send_replace(Some(SessionChange { event, session }));
    }
}

/// Session state as mirrored by the UI.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub session: Option<Session>,
    pub loading: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            session: None,
            loading: true,
        }
    }
}

impl SessionState {
    /// Mirror a value read from a [`SessionHub`] subscription.
    pub fn mirror(change: Option<&SessionChange>) -> Self {
        match change {
            Some(change) => Self {
                session: change.session.clone(),
                loading: false,
            },
            None => Self::default(),
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }
}

/// Margin before expiry at which the ticker refreshes the session.
pub fn refresh_threshold() -> Duration {
    Duration::from_std(REFRESH_TICK * REFRESH_TICK_THRESHOLD)
        .unwrap_or_else(|_| Duration::seconds(90))
}

/// Whether the ticker should refresh `session` at `now`.
pub fn needs_refresh(session: &Session, now: DateTime<Utc>) -> bool {
    session.expires_within(now, refresh_threshold())
}
