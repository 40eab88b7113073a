//! # Notes screen: model and workflows
//!
//! [`NotesModel`] is everything the notes screen displays: the fetched list,
//! the new-note draft and a loading flag. It is a plain value so the UI can
//! keep it in a signal and tests can keep it on the stack.
//!
//! The four operations (list, create, delete, sign out) are async functions
//! generic over the backend and over a [`NotesView`], the sink through which
//! a workflow touches the model and raises toasts. A workflow only borrows the
//! model between awaits, never across one.
//!
//! ## Re-fetch ordering
//!
//! Every mutation is followed by a full re-fetch. Overlapping re-fetches are
//! ordered with [`FetchTicket`]s: a response is applied only if no newer
//! request has been applied already, so a superseded list that arrives late
//! is dropped.
//!
//! ## Lifetime
//!
//! Each screen instance owns a [`CancellationToken`]. Workflows check it after
//! every await and stop without touching the model once it was cancelled.

use tokio_util::sync::CancellationToken;

use crate::backend::{AuthBackend, NotesBackend};
use crate::error::BackendResult;
use crate::models::{NewNote, Note, NoteId};
use crate::toast::Toast;

pub const FETCH_FAILED: &str = "Failed to fetch notes";
pub const CREATE_FAILED: &str = "Failed to create note";
pub const DELETE_FAILED: &str = "Failed to delete note";
pub const SIGN_OUT_FAILED: &str = "Failed to sign out";
pub const CREATED: &str = "Note created successfully";
pub const DELETED: &str = "Note deleted successfully";

/// The new-note form.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
}

impl NoteDraft {
    /// Both fields must contain something other than whitespace.
    pub fn is_submittable(&self) -> bool {
        !self.title.trim().is_empty() && !self.content.trim().is_empty()
    }

    /// Insert payload for `user_id`, or `None` if the draft is incomplete.
    /// Fields are sent as typed.
    pub fn to_new_note(&self, user_id: &str) -> Option<NewNote> {
        self.is_submittable().then(|| NewNote {
            title: self.title.clone(),
            content: self.content.clone(),
            user_id: user_id.to_string(),
        })
    }

    pub fn clear(&mut self) {
        self.title.clear();
        self.content.clear();
    }
}

/// Sequence number of a list request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

#[derive(Clone, Debug, Default, PartialEq)]
pub struct NotesModel {
    pub notes: Vec<Note>,
    pub draft: NoteDraft,
    issued: u64,
    applied: u64,
    /// Newest ticket that finished, successfully or not.
    settled: u64,
}

impl NotesModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// The newest list request has not finished yet.
    pub fn is_loading(&self) -> bool {
        self.issued > self.settled
    }

    /// Register a new list request.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued += 1;
        FetchTicket(self.issued)
    }

    /// Apply the result of the request identified by `ticket`.
    ///
    /// Any finished request ends the loading state unless a newer one is
    /// still pending; only successful ones can replace the list.
    ///
    /// Returns `Ok(true)` if the list was replaced, `Ok(false)` if the result
    /// was superseded by a newer one and dropped, and the error if the
    /// request failed. A failed request leaves the list as it was.
    pub fn finish_fetch(
        &mut self,
        ticket: FetchTicket,
        result: BackendResult<Vec<Note>>,
    ) -> BackendResult<bool> {
        self.settled = self.settled.max(ticket.0);
        let notes = result?;
        if ticket.0 <= self.applied {
            tracing::debug!(ticket = ticket.0, applied = self.applied, "dropping superseded note list");
            return Ok(false);
        }
        self.applied = ticket.0;
        self.notes = notes;
        Ok(true)
    }

    pub fn contains(&self, id: &NoteId) -> bool {
        self.notes.iter().any(|note| &note.id == id)
    }
}

/// How a workflow ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing was sent (incomplete draft).
    Skipped,
    Succeeded,
    Failed,
    /// The screen went away while the request was in flight.
    Cancelled,
}

/// Where workflows read and write screen state.
pub trait NotesView {
    fn update<R>(&mut self, f: impl FnOnce(&mut NotesModel) -> R) -> R;

    fn notify(&mut self, toast: Toast);
}

/// Fetch the note list and replace the displayed one.
pub async fn refresh_notes<B, V>(backend: &B, view: &mut V, lifetime: &CancellationToken) -> Outcome
where
    B: NotesBackend + ?Sized,
    V: NotesView,
{
    let ticket = view.update(|model| model.begin_fetch());
    let result = backend.list_notes().await;
    if lifetime.is_cancelled() {
        return Outcome::Cancelled;
    }

    match view.update(|model| model.finish_fetch(ticket, result)) {
        Ok(_) => Outcome::Succeeded,
        Err(e) => {
            tracing::warn!(error = %e, "failed to fetch notes");
            view.notify(Toast::error(FETCH_FAILED));
            Outcome::Failed
        }
    }
}

/// Submit the draft as a new note owned by `user_id`.
pub async fn create_note<B, V>(
    backend: &B,
    view: &mut V,
    user_id: &str,
    lifetime: &CancellationToken,
) -> Outcome
where
    B: NotesBackend + ?Sized,
    V: NotesView,
{
    let Some(new_note) = view.update(|model| model.draft.to_new_note(user_id)) else {
        return Outcome::Skipped;
    };

    tracing::debug!(title = %new_note.title, "creating note");
    let result = backend.insert_note(&new_note).await;
    if lifetime.is_cancelled() {
        return Outcome::Cancelled;
    }

    match result {
        Ok(()) => {
            view.update(|model| model.draft.clear());
            view.notify(Toast::success(CREATED));
            refresh_notes(backend, view, lifetime).await;
            Outcome::Succeeded
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to create note");
            view.notify(Toast::error(CREATE_FAILED));
            Outcome::Failed
        }
    }
}

/// Delete a note by id. The note stays listed until the re-fetch lands.
pub async fn delete_note<B, V>(
    backend: &B,
    view: &mut V,
    id: &NoteId,
    lifetime: &CancellationToken,
) -> Outcome
where
    B: NotesBackend + ?Sized,
    V: NotesView,
{
    tracing::debug!(%id, "deleting note");
    let result = backend.delete_note(id).await;
    if lifetime.is_cancelled() {
        return Outcome::Cancelled;
    }

    match result {
        Ok(()) => {
            view.notify(Toast::success(DELETED));
            refresh_notes(backend, view, lifetime).await;
            Outcome::Succeeded
        }
        Err(e) => {
            tracing::warn!(error = %e, %id, "failed to delete note");
            view.notify(Toast::error(DELETE_FAILED));
            Outcome::Failed
        }
    }
}

/// Ask the backend to end the session. Navigation follows from the session
/// change, not from here.
pub async fn sign_out<B, V>(backend: &B, view: &mut V, lifetime: &CancellationToken) -> Outcome
where
    B: AuthBackend + ?Sized,
    V: NotesView,
{
    let result = backend.sign_out().await;
    if lifetime.is_cancelled() {
        return Outcome::Cancelled;
    }

    match result {
        Ok(()) => Outcome::Succeeded,
        Err(e) => {
            tracing::warn!(error = %e, "failed to sign out");
            view.notify(Toast::error(SIGN_OUT_FAILED));
            Outcome::Failed
        }
    }
}
