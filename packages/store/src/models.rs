//! # Domain models for notes and sessions
//!
//! Defines the data structures exchanged with the backend. Every type is
//! `Serialize + Deserialize` so it can travel as JSON to and from the hosted
//! database, and so a [`Session`] can be persisted between page loads.
//!
//! ## Types
//!
//! | Struct | Represents |
//! |--------|-----------|
//! | [`Note`] | A row of the `notes` collection as returned by a list request. `id`, `created_at` and `user_id` are assigned by the backend. |
//! | [`NewNote`] | The insert payload: `title`, `content` and the owner `user_id` taken from the current session. |
//! | [`NoteId`] | Opaque note identifier. Accepts a JSON string or integer, always handled as text on the client. |
//! | [`UserInfo`] | The signed-in principal as far as the UI cares: id, email, display name, avatar and provider. |
//! | [`Session`] | Access/refresh token pair plus expiry and the owning [`UserInfo`]. |
//!
//! Ownership of notes is never decided here: the backend's row-level policy
//! only returns and accepts rows belonging to the caller.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Opaque, backend-assigned note identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for NoteId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Tables keyed by uuid send strings, identity columns send integers.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Int(i64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => NoteId(s),
            Raw::Int(n) => NoteId(n.to_string()),
        })
    }
}

/// A note as stored by the backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    /// Owner reference. Older rows selected through a view may omit it.
    #[serde(default)]
    pub user_id: Option<String>,
}

impl Note {
    /// Creation date formatted for the note card, e.g. `Jan 5, 2025`.
    pub fn created_label(&self) -> String {
        self.created_at.format("%b %-d, %Y").to_string()
    }
}

/// Insert payload for a new note.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewNote {
    pub title: String,
    pub content: String,
    pub user_id: String,
}

/// User information exposed to the UI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserInfo {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    /// Identity provider the user signed in with (`"email"`, `"google"`, ...).
    pub provider: String,
}

impl UserInfo {
    /// Get display name, falling back to email and then the raw id.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(&self.id)
    }
}

/// An authenticated session. Token material is opaque to the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserInfo,
}

impl Session {
    pub fn user_id(&self) -> &str {
        &self.user.id
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// True when the access token expires before `now + margin`.
    pub fn expires_within(&self, now: DateTime<Utc>, margin: Duration) -> bool {
        self.expires_at <= now + margin
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn user(id: &str) -> UserInfo {
        UserInfo {
            id: id.to_string(),
            email: Some(format!("{id}@example.com")),
            name: None,
            avatar_url: None,
            provider: "email".to_string(),
        }
    }

    pub fn session_for(id: &str, expires_at: DateTime<Utc>) -> Session {
        Session {
            access_token: format!("access-{id}"),
            refresh_token: format!("refresh-{id}"),
            token_type: "bearer".to_string(),
            expires_at,
            user: user(id),
        }
    }
}
