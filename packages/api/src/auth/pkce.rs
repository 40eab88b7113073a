//! # Federated sign-in with PKCE
//!
//! 1. [`authorize_url`](SupabaseClient::authorize_url) generates a random PKCE
//!    challenge, stores the verifier and returns
//!    `auth/v1/authorize?provider=..&redirect_to=..&code_challenge=..&code_challenge_method=s256`.
//!    The browser leaves the app for the identity provider.
//! 2. The auth service redirects back with `?code=...` in the query string.
//!    [`callback_code`] extracts it (or the error the service reported) and
//!    [`exchange_code`](SupabaseClient::exchange_code) trades code and
//!    verifier for a session at `auth/v1/token?grant_type=pkce`.

use chrono::Utc;
use oauth2::PkceCodeChallenge;
use serde_json::json;
use store::{BackendError, BackendResult, Provider, Session};
use url::form_urlencoded;

use crate::client::SupabaseClient;
use crate::models::TokenResponse;

/// What a redirect back into the app carried.
#[derive(Debug, Clone, PartialEq)]
pub enum Callback {
    Code(String),
    /// The provider or the auth service refused the sign-in.
    Error(String),
}

/// Parse the query string of a redirect (with or without the leading `?`).
pub fn callback_code(query: &str) -> Option<Callback> {
    let mut code = None;
    let mut error = None;
    for (key, value) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "error_description" => error = Some(value.into_owned()),
            "error" if error.is_none() => error = Some(value.into_owned()),
            _ => {}
        }
    }
    error.map(Callback::Error).or(code.map(Callback::Code))
}

impl SupabaseClient {
    pub(crate) fn authorize_url(&self, provider: Provider) -> BackendResult<String> {
        let (challenge, verifier) = PkceCodeChallenge::new_random_sha256();
        self.inner
            .storage
            .set(&self.verifier_key(), verifier.secret());

        let mut url = self.endpoint("auth/v1/authorize")?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("provider", provider.as_str());
            if let Some(redirect_to) = &self.inner.redirect_to {
                query.append_pair("redirect_to", redirect_to);
            }
            query.append_pair("code_challenge", challenge.as_str());
            query.append_pair("code_challenge_method", "s256");
        }
        Ok(url.to_string())
    }

    pub(crate) async fn exchange_code(&self, code: &str) -> BackendResult<Session> {
        let verifier_key = self.verifier_key();
        let verifier = self
            .inner
            .storage
            .get(&verifier_key)
            .ok_or(BackendError::MissingVerifier)?;

        let mut url = self.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "pkce");
        let request = self
            .inner
            .http
            .post(url)
            .json(&json!({ "auth_code": code, "code_verifier": verifier }));

        let token: TokenResponse = self.send_json(request).await?;
        self.inner.storage.remove(&verifier_key);
        Ok(token.into_session(Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callback_code() {
        assert_eq!(
            callback_code("?code=abc123&state=x"),
            Some(Callback::Code("abc123".to_string()))
        );
        assert_eq!(callback_code(""), None);
        assert_eq!(callback_code("?tab=notes"), None);
    }

    #[test]
    fn test_callback_error_wins() {
        assert_eq!(
            callback_code("error=access_denied&error_description=User+cancelled"),
            Some(Callback::Error("User cancelled".to_string()))
        );
        assert_eq!(
            callback_code("error=server_error"),
            Some(Callback::Error("server_error".to_string()))
        );
    }
}
