use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, Utc};
use tokio::sync::watch;

use crate::backend::{AuthBackend, NotesBackend, Provider, SignUp};
use crate::error::{BackendError, BackendResult};
use crate::models::{NewNote, Note, NoteId, Session, UserInfo};
use crate::session::{AuthEvent, SessionChange, SessionHub};

/// A request as seen by [`MemoryBackend`].
#[derive(Clone, Debug, PartialEq)]
pub enum Request {
    List,
    Insert(NewNote),
    Delete(NoteId),
    SignOut,
}

/// Operations that can be told to fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Insert,
    Delete,
    SignIn,
    Refresh,
    SignOut,
}

#[derive(Debug, Default)]
struct State {
    notes: Vec<Note>,
    requests: Vec<Request>,
    failures: HashMap<Operation, BackendError>,
    accounts: HashMap<String, (String, UserInfo)>,
    next_id: u64,
    last_created: Option<DateTime<Utc>>,
}

/// In-memory backend for testing and native builds without a hosted project.
///
/// Mimics the hosted service's row-level policy: only the session user's
/// notes are listed, inserts for another user are rejected and deletes of
/// foreign notes do nothing.
#[derive(Clone, Debug, Default)]
pub struct MemoryBackend {
    state: Arc<Mutex<State>>,
    hub: Arc<SessionHub>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make the next call of `operation` fail with `error`.
    pub fn fail(&self, operation: Operation, error: BackendError) {
        self.state().failures.insert(operation, error);
    }

    fn check(&self, operation: Operation) -> BackendResult<()> {
        match self.state().failures.remove(&operation) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<Request> {
        self.state().requests.clone()
    }

    pub fn clear_requests(&self) {
        self.state().requests.clear();
    }

    /// Store notes as they are, bypassing the policy.
    pub fn seed(&self, notes: Vec<Note>) {
        self.state().notes.extend(notes);
    }

    /// Register an email/password account.
    pub fn add_account(&self, email: &str, password: &str, user: UserInfo) {
        self.state()
            .accounts
            .insert(email.to_string(), (password.to_string(), user));
    }

    /// Publish a fresh session for `user`.
    pub fn sign_in_as(&self, user: UserInfo) -> Session {
        let session = issue_session(user);
        self.hub.publish(AuthEvent::SignedIn, Some(session.clone()));
        session
    }

    /// Drop the session as if it ran out.
    pub fn expire_session(&self) {
        self.hub.publish(AuthEvent::Expired, None);
    }

    fn session_user(&self) -> Option<String> {
        self.hub.current().map(|s| s.user.id)
    }

    fn next_created_at(state: &mut State) -> DateTime<Utc> {
        let now = Utc::now();
        let created = match state.last_created {
            Some(last) if last >= now => last + Duration::milliseconds(1),
            _ => now,
        };
        state.last_created = Some(created);
        created
    }
}

fn issue_session(user: UserInfo) -> Session {
    Session {
        access_token: format!("memory-access-{}", user.id),
        refresh_token: format!("memory-refresh-{}", user.id),
        token_type: "bearer".to_string(),
        expires_at: Utc::now() + Duration::hours(1),
        user,
    }
}

impl NotesBackend for MemoryBackend {
    async fn list_notes(&self) -> BackendResult<Vec<Note>> {
        self.state().requests.push(Request::List);
        self.check(Operation::List)?;

        let Some(user_id) = self.session_user() else {
            return Ok(Vec::new());
        };
        let mut notes: Vec<Note> = self
            .state()
            .notes
            .iter()
            .filter(|note| note.user_id.as_deref() == Some(user_id.as_str()))
            .cloned()
            .collect();
        notes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notes)
    }

    async fn insert_note(&self, note: &NewNote) -> BackendResult<()> {
        self.state().requests.push(Request::Insert(note.clone()));
        self.check(Operation::Insert)?;

        if self.session_user().as_deref() != Some(note.user_id.as_str()) {
            return Err(BackendError::rejected(
                403,
                "new row violates row-level security policy for table \"notes\"",
            ));
        }

        let mut state = self.state();
        state.next_id += 1;
        let id = NoteId::new(format!("note-{}", state.next_id));
        let created_at = Self::next_created_at(&mut state);
        state.notes.push(Note {
            id,
            title: note.title.clone(),
            content: note.content.clone(),
            created_at,
            user_id: Some(note.user_id.clone()),
        });
        Ok(())
    }

    async fn delete_note(&self, id: &NoteId) -> BackendResult<()> {
        self.state().requests.push(Request::Delete(id.clone()));
        self.check(Operation::Delete)?;

        let user_id = self.session_user();
        self.state()
            .notes
            .retain(|note| !(&note.id == id && note.user_id == user_id));
        Ok(())
    }
}

impl AuthBackend for MemoryBackend {
    async fn initialize(&self, _callback_query: Option<&str>) -> BackendResult<Option<Session>> {
        let session = self.hub.current();
        self.hub.publish(AuthEvent::InitialSession, session.clone());
        Ok(session)
    }

    fn current_session(&self) -> Option<Session> {
        self.hub.current()
    }

    fn subscribe(&self) -> watch::Receiver<Option<SessionChange>> {
        self.hub.subscribe()
    }

    async fn provider_sign_in_url(&self, provider: Provider) -> BackendResult<String> {
        self.check(Operation::SignIn)?;
        Ok(format!("memory://authorize?provider={}", provider.as_str()))
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> BackendResult<Session> {
        self.check(Operation::SignIn)?;
        let user = match self.state().accounts.get(email) {
            Some((stored, user)) if stored == password => user.clone(),
            _ => return Err(BackendError::rejected(400, "Invalid login credentials")),
        };
        Ok(self.sign_in_as(user))
    }

    async fn sign_up(&self, email: &str, password: &str) -> BackendResult<SignUp> {
        self.check(Operation::SignIn)?;
        let user = {
            let mut state = self.state();
            if state.accounts.contains_key(email) {
                return Err(BackendError::rejected(422, "User already registered"));
            }
            state.next_id += 1;
            let user = UserInfo {
                id: format!("user-{}", state.next_id),
                email: Some(email.to_string()),
                name: None,
                avatar_url: None,
                provider: "email".to_string(),
            };
            state
                .accounts
                .insert(email.to_string(), (password.to_string(), user.clone()));
            user
        };
        self.sign_in_as(user);
        Ok(SignUp::SignedIn)
    }

    async fn refresh_session(&self) -> BackendResult<Session> {
        if let Err(e) = self.check(Operation::Refresh) {
            self.hub.publish(AuthEvent::Expired, None);
            return Err(e);
        }
        let Some(current) = self.hub.current() else {
            return Err(BackendError::rejected(401, "Refresh Token Not Found"));
        };
        let session = issue_session(current.user);
        self.hub
            .publish(AuthEvent::TokenRefreshed, Some(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> BackendResult<()> {
        self.state().requests.push(Request::SignOut);
        self.check(Operation::SignOut)?;
        self.hub.publish(AuthEvent::SignedOut, None);
        Ok(())
    }
}
