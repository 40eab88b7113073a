//! Authentication against the hosted auth service (`auth/v1`).
//!
//! Every transition ends in [`SessionHub::publish`](store::SessionHub::publish):
//! the UI never learns about sign-in success from a return value alone.

mod pkce;
mod session;

pub use pkce::{callback_code, Callback};
pub use session::VERIFIER_KEY_SUFFIX;

use chrono::Utc;
use serde_json::json;
use store::{
    AuthBackend, AuthEvent, BackendError, BackendResult, Provider, Session, SessionChange,
    SignUp,
};
use tokio::sync::watch;

use crate::client::SupabaseClient;
use crate::models::{SignUpResponse, TokenResponse};

impl SupabaseClient {
    async fn token_grant(&self, grant_type: &str, body: serde_json::Value) -> BackendResult<Session> {
        let mut url = self.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", grant_type);
        let token: TokenResponse = self
            .send_json(self.inner.http.post(url).json(&body))
            .await?;
        Ok(token.into_session(Utc::now()))
    }

    async fn refresh_with(&self, refresh_token: &str) -> BackendResult<Session> {
        self.token_grant("refresh_token", json!({ "refresh_token": refresh_token }))
            .await
    }

    /// Persist and announce a new session.
    fn establish(&self, event: AuthEvent, session: &Session) {
        self.persist(session);
        self.inner.hub.publish(event, Some(session.clone()));
    }

    /// Stored session, refreshed if it is about to run out.
    async fn restore(&self) -> Option<Session> {
        let stored = self.stored_session()?;
        if !stored.expires_within(Utc::now(), self.inner.refresh_margin) {
            return Some(stored);
        }

        match self.refresh_with(&stored.refresh_token).await {
            Ok(session) => {
                self.persist(&session);
                Some(session)
            }
            Err(BackendError::Network(e)) if !stored.is_expired(Utc::now()) => {
                tracing::warn!(error = %e, "could not refresh stored session, keeping it");
                Some(stored)
            }
            Err(e) => {
                tracing::info!(error = %e, "stored session could not be refreshed");
                self.forget();
                None
            }
        }
    }
}

impl AuthBackend for SupabaseClient {
    async fn initialize(&self, callback_query: Option<&str>) -> BackendResult<Option<Session>> {
        let result = match callback_query.and_then(pkce::callback_code) {
            Some(pkce::Callback::Code(code)) => self.exchange_code(&code).await.map(Some),
            Some(pkce::Callback::Error(message)) => Err(BackendError::rejected(400, message)),
            None => Ok(self.restore().await),
        };

        match result {
            Ok(session) => {
                if let Some(session) = &session {
                    self.persist(session);
                }
                self.inner
                    .hub
                    .publish(AuthEvent::InitialSession, session.clone());
                Ok(session)
            }
            Err(e) => {
                tracing::warn!(error = %e, "sign-in redirect could not be completed");
                let fallback = self.restore().await;
                self.inner
                    .hub
                    .publish(AuthEvent::InitialSession, fallback);
                Err(e)
            }
        }
    }

    fn current_session(&self) -> Option<Session> {
        self.inner.hub.current()
    }

    fn subscribe(&self) -> watch::Receiver<Option<SessionChange>> {
        self.inner.hub.subscribe()
    }

    async fn provider_sign_in_url(&self, provider: Provider) -> BackendResult<String> {
        tracing::debug!(provider = provider.as_str(), "starting federated sign-in");
        self.authorize_url(provider)
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> BackendResult<Session> {
        let session = self
            .token_grant(
                "password",
                json!({ "email": email.trim(), "password": password }),
            )
            .await?;
        self.establish(AuthEvent::SignedIn, &session);
        Ok(session)
    }

    async fn sign_up(&self, email: &str, password: &str) -> BackendResult<SignUp> {
        let mut url = self.endpoint("auth/v1/signup")?;
        if let Some(redirect_to) = &self.inner.redirect_to {
            url.query_pairs_mut().append_pair("redirect_to", redirect_to);
        }
        let request = self
            .inner
            .http
            .post(url)
            .json(&json!({ "email": email.trim(), "password": password }));

        match self.send_json::<SignUpResponse>(request).await? {
            SignUpResponse::Session(token) => {
                let session = token.into_session(Utc::now());
                self.establish(AuthEvent::SignedIn, &session);
                Ok(SignUp::SignedIn)
            }
            SignUpResponse::User(user) => {
                tracing::info!(user = %user.id, "sign-up awaiting email confirmation");
                Ok(SignUp::ConfirmationSent)
            }
        }
    }

    async fn refresh_session(&self) -> BackendResult<Session> {
        let Some(current) = self.inner.hub.current() else {
            return Err(BackendError::rejected(401, "Refresh Token Not Found"));
        };

        match self.refresh_with(&current.refresh_token).await {
            Ok(session) => {
                self.establish(AuthEvent::TokenRefreshed, &session);
                Ok(session)
            }
            Err(e) => {
                // A concurrent refresh or sign-in may have replaced the session meanwhile.
                let still_current = self
                    .inner
                    .hub
                    .current()
                    .is_some_and(|latest| latest.refresh_token == current.refresh_token);
                // Rejected refresh tokens never become valid again.
                if still_current && (e.status().is_some() || current.is_expired(Utc::now())) {
                    self.forget();
                    self.inner.hub.publish(AuthEvent::Expired, None);
                }
                Err(e)
            }
        }
    }

    async fn sign_out(&self) -> BackendResult<()> {
        let Some(current) = self.inner.hub.current() else {
            self.forget();
            self.inner.hub.publish(AuthEvent::SignedOut, None);
            return Ok(());
        };

        let mut url = self.endpoint("auth/v1/logout")?;
        url.query_pairs_mut().append_pair("scope", "global");
        let request = self
            .inner
            .http
            .post(url)
            .bearer_auth(&current.access_token);

        match self.send(request).await {
            Ok(_) => {}
            // The session is already gone on the server side.
            Err(e) if matches!(e.status(), Some(401 | 403 | 404)) => {
                tracing::debug!(error = %e, "session already revoked");
            }
            Err(e) => return Err(e),
        }

        self.forget();
        self.inner.hub.publish(AuthEvent::SignedOut, None);
        Ok(())
    }
}
