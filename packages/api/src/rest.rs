//! The `notes` collection over the data service (`rest/v1`).

use store::{BackendResult, NewNote, Note, NoteId, NotesBackend};

use crate::client::SupabaseClient;

const NOTES_PATH: &str = "rest/v1/notes";

impl NotesBackend for SupabaseClient {
    async fn list_notes(&self) -> BackendResult<Vec<Note>> {
        let request = self
            .inner
            .http
            .get(self.endpoint(NOTES_PATH)?)
            .query(&[("select", "*"), ("order", "created_at.desc")])
            .bearer_auth(self.bearer().await);

        let notes: Vec<Note> = self.send_json(request).await?;
        tracing::debug!(count = notes.len(), "fetched notes");
        Ok(notes)
    }

    async fn insert_note(&self, note: &NewNote) -> BackendResult<()> {
        let request = self
            .inner
            .http
            .post(self.endpoint(NOTES_PATH)?)
            .header("Prefer", "return=minimal")
            .bearer_auth(self.bearer().await)
            .json(&[note]);

        self.send(request).await?;
        Ok(())
    }

    async fn delete_note(&self, id: &NoteId) -> BackendResult<()> {
        let request = self
            .inner
            .http
            .delete(self.endpoint(NOTES_PATH)?)
            .query(&[("id", format!("eq.{id}"))])
            .bearer_auth(self.bearer().await);

        self.send(request).await?;
        Ok(())
    }
}
