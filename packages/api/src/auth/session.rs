//! Session persistence.
//!
//! The session is stored as JSON under the client's storage key, the PKCE
//! verifier of a pending federated sign-in under the same key with a
//! `-code-verifier` suffix.

use store::Session;

use crate::client::SupabaseClient;

/// Suffix of the key holding the PKCE verifier.
pub const VERIFIER_KEY_SUFFIX: &str = "-code-verifier";

impl SupabaseClient {
    pub(crate) fn verifier_key(&self) -> String {
        format!("{}{}", self.inner.storage_key, VERIFIER_KEY_SUFFIX)
    }

    pub(crate) fn persist(&self, session: &Session) {
        match serde_json::to_string(session) {
            Ok(json) => self.inner.storage.set(&self.inner.storage_key, &json),
            Err(e) => tracing::warn!(error = %e, "failed to serialize session"),
        }
    }

    pub(crate) fn forget(&self) {
        self.inner.storage.remove(&self.inner.storage_key);
    }

    /// The persisted session, if one is stored and readable.
    pub(crate) fn stored_session(&self) -> Option<Session> {
        let json = self.inner.storage.get(&self.inner.storage_key)?;
        match serde_json::from_str(&json) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!(error = %e, "discarding unreadable stored session");
                self.forget();
                None
            }
        }
    }
}
