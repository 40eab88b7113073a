//! # Backend traits
//!
//! The client talks to its backend collaborator through two async traits.
//! [`AuthBackend`] owns the session lifecycle and pushes every change through
//! a [`SessionHub`](crate::SessionHub); [`NotesBackend`] is the `notes`
//! collection. Implementations live in [`crate::memory`] (tests, native
//! fallback) and in the `api` crate (the hosted service over HTTP).
//!
//! Futures are not required to be `Send`: the client runs on a single
//! cooperative thread (the browser event loop).

use std::future::Future;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::error::BackendResult;
use crate::models::{NewNote, Note, NoteId, Session};
use crate::session::SessionChange;

/// A federated identity provider accepted by the hosted auth service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Google,
    Github,
    Gitlab,
    Azure,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Google => "google",
            Provider::Github => "github",
            Provider::Gitlab => "gitlab",
            Provider::Azure => "azure",
        }
    }

    /// Button label for the sign-in form.
    pub fn label(&self) -> &'static str {
        match self {
            Provider::Google => "Sign in with Google",
            Provider::Github => "Sign in with GitHub",
            Provider::Gitlab => "Sign in with GitLab",
            Provider::Azure => "Sign in with Azure",
        }
    }
}

/// Result of an email/password sign-up.
#[derive(Clone, Debug, PartialEq)]
pub enum SignUp {
    /// The account is usable right away and a session was published.
    SignedIn,
    /// The backend sent a confirmation e-mail; no session yet.
    ConfirmationSent,
}

/// Authentication half of the backend.
pub trait AuthBackend {
    /// Report the initial session: complete a pending federated sign-in when
    /// `callback_query` carries an auth code, otherwise restore a persisted
    /// session. Publishes [`AuthEvent::InitialSession`](crate::AuthEvent).
    fn initialize(
        &self,
        callback_query: Option<&str>,
    ) -> impl Future<Output = BackendResult<Option<Session>>>;

    /// The session as last published.
    fn current_session(&self) -> Option<Session>;

    /// Subscribe to session changes.
    fn subscribe(&self) -> watch::Receiver<Option<SessionChange>>;

    /// Begin a federated sign-in. Returns the URL the browser must visit.
    fn provider_sign_in_url(
        &self,
        provider: Provider,
    ) -> impl Future<Output = BackendResult<String>>;

    fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = BackendResult<Session>>;

    fn sign_up(&self, email: &str, password: &str) -> impl Future<Output = BackendResult<SignUp>>;

    /// Exchange the refresh token for a new session.
    fn refresh_session(&self) -> impl Future<Output = BackendResult<Session>>;

    /// Terminate the session on the backend and publish the sign-out.
    fn sign_out(&self) -> impl Future<Output = BackendResult<()>>;
}

/// The `notes` collection. Visibility is restricted to the caller by the backend.
pub trait NotesBackend {
    /// All notes of the current user, newest first.
    fn list_notes(&self) -> impl Future<Output = BackendResult<Vec<Note>>>;

    fn insert_note(&self, note: &NewNote) -> impl Future<Output = BackendResult<()>>;

    fn delete_note(&self, id: &NoteId) -> impl Future<Output = BackendResult<()>>;
}
