use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use store::{BackendError, Session};

use super::AuthUser;

/// Successful answer of `/auth/v1/token` (every grant type).
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub expires_in: i64,
    /// Unix seconds. Older service versions omit it.
    pub expires_at: Option<i64>,
    pub refresh_token: String,
    pub user: AuthUser,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl TokenResponse {
    pub fn into_session(self, now: DateTime<Utc>) -> Session {
        let expires_at = self
            .expires_at
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
            .unwrap_or_else(|| now + Duration::seconds(self.expires_in));
        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            token_type: self.token_type,
            expires_at,
            user: self.user.to_info(),
        }
    }
}

/// `/auth/v1/signup` returns a session when no confirmation is required,
/// otherwise just the (unconfirmed) user.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum SignUpResponse {
    Session(TokenResponse),
    User(AuthUser),
}

/// Error bodies of both services. The auth service uses `msg` or
/// `error_description`, the data service uses `message`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    msg: Option<String>,
    message: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

impl ErrorBody {
    pub fn into_error(self, status: u16) -> BackendError {
        let message = self
            .msg
            .or(self.message)
            .or(self.error_description)
            .or(self.error)
            .unwrap_or_default();
        BackendError::rejected(status, message)
    }
}
