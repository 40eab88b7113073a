//! Backend error type shared by every backend implementation.

use thiserror::Error;

/// A failed backend request.
///
/// The UI reports every variant the same way; the distinction only matters
/// for logs and for the session logic (e.g. a 401 on sign-out).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BackendError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status.
    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The response body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),

    /// A redirect carried an auth code but no verifier was stored for it.
    #[error("no pending sign-in to complete")]
    MissingVerifier,

    #[error("configuration error: {0}")]
    Config(String),
}

impl BackendError {
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    /// Status code of a rejected request, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message suitable for showing inside the sign-in form.
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { message, .. } if !message.is_empty() => message.clone(),
            Self::Network(_) => "Could not reach the server".to_string(),
            _ => "Something went wrong, please try again".to_string(),
        }
    }
}

pub type BackendResult<T> = Result<T, BackendError>;
