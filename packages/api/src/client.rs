//! # HTTP client for the hosted backend
//!
//! [`SupabaseClient`] is a cheap-to-clone handle (`Arc` inside) that knows the
//! project URL, the public anon key and the current session. Both services
//! are reached below the project URL:
//!
//! | Service | Prefix |
//! |---------|--------|
//! | auth    | `auth/v1/` |
//! | data    | `rest/v1/` |
//!
//! Every request carries `apikey: <anon key>`. Data requests are authorized
//! with the session's access token, refreshed first when it is about to
//! expire, or with the anon key when nobody is signed in.

use std::fmt;
use std::sync::Arc;

use chrono::{Duration, Utc};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use store::{
    AuthBackend, BackendError, BackendResult, KeyValueStore, NotebookConfig, SessionHub,
};
use url::Url;

use crate::models::ErrorBody;

pub(crate) struct Inner {
    pub http: reqwest::Client,
    pub base_url: Url,
    pub anon_key: String,
    pub redirect_to: Option<String>,
    pub refresh_margin: Duration,
    pub storage: Box<dyn KeyValueStore>,
    pub storage_key: String,
    pub hub: SessionHub,
}

/// Client for a Supabase-compatible project.
#[derive(Clone)]
pub struct SupabaseClient {
    pub(crate) inner: Arc<Inner>,
}

impl fmt::Debug for SupabaseClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupabaseClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("storage_key", &self.inner.storage_key)
            .finish_non_exhaustive()
    }
}

impl PartialEq for SupabaseClient {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl SupabaseClient {
    /// Create a client that persists session material in `storage`.
    pub fn new(config: &NotebookConfig, storage: impl KeyValueStore + 'static) -> BackendResult<Self> {
        config
            .validate()
            .map_err(|e| BackendError::Config(e.to_string()))?;

        let raw = config.backend.url.trim().trim_end_matches('/');
        let base_url =
            Url::parse(&format!("{raw}/")).map_err(|e| BackendError::Config(e.to_string()))?;
        let storage_key = storage_key_for(&base_url);

        Ok(Self {
            inner: Arc::new(Inner {
                http: reqwest::Client::new(),
                base_url,
                anon_key: config.backend.anon_key.trim().to_string(),
                redirect_to: config.auth.redirect_to.clone(),
                refresh_margin: config.refresh_margin(),
                storage: Box::new(storage),
                storage_key,
                hub: SessionHub::new(),
            }),
        })
    }

    /// Create a client with the platform's default session storage:
    /// `localStorage` in the browser, memory elsewhere.
    pub fn with_default_storage(config: &NotebookConfig) -> BackendResult<Self> {
        #[cfg(target_arch = "wasm32")]
        {
            Self::new(config, crate::local_storage::LocalStorage)
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            Self::new(config, store::MemoryKeyValueStore::new())
        }
    }

    /// Key under which the session is persisted.
    pub fn storage_key(&self) -> &str {
        &self.inner.storage_key
    }

    pub(crate) fn endpoint(&self, path: &str) -> BackendResult<Url> {
        self.inner
            .base_url
            .join(path)
            .map_err(|e| BackendError::Config(e.to_string()))
    }

    /// Send a request with the anon key attached and map failures.
    pub(crate) async fn send(&self, request: RequestBuilder) -> BackendResult<Response> {
        let response = request
            .header("apikey", &self.inner.anon_key)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = serde_json::from_str::<ErrorBody>(&body)
            .unwrap_or_default()
            .into_error(status.as_u16());
        tracing::debug!(status = status.as_u16(), %error, "backend rejected request");
        Err(error)
    }

    pub(crate) async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> BackendResult<T> {
        self.send(request)
            .await?
            .json::<T>()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))
    }

    /// Bearer token for data requests.
    pub(crate) async fn bearer(&self) -> String {
        let Some(session) = self.inner.hub.current() else {
            return self.inner.anon_key.clone();
        };
        if !session.expires_within(Utc::now(), self.inner.refresh_margin) {
            return session.access_token;
        }

        tracing::debug!("access token about to expire, refreshing before request");
        match self.refresh_session().await {
            Ok(refreshed) => refreshed.access_token,
            Err(e) => {
                tracing::warn!(error = %e, "token refresh failed");
                match self.inner.hub.current() {
                    Some(still_valid) if !still_valid.is_expired(Utc::now()) => {
                        still_valid.access_token
                    }
                    _ => self.inner.anon_key.clone(),
                }
            }
        }
    }
}

/// `sb-<project ref>-auth-token`, the project ref being the first host label.
fn storage_key_for(base_url: &Url) -> String {
    let host = base_url.host_str().unwrap_or("local");
    let project = host.split('.').next().unwrap_or(host);
    format!("sb-{project}-auth-token")
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::MemoryKeyValueStore;

    fn config(url: &str) -> NotebookConfig {
        let mut config = NotebookConfig::default();
        config.backend.url = url.to_string();
        config.backend.anon_key = "anon".to_string();
        config
    }

    #[test]
    fn test_storage_key_uses_project_ref() {
        let client =
            SupabaseClient::new(&config("https://abcd.supabase.co"), MemoryKeyValueStore::new()).unwrap();
        assert_eq!(client.storage_key(), "sb-abcd-auth-token");
    }

    #[test]
    fn test_endpoints_keep_project_path() {
        let client = SupabaseClient::new(
            &config("https://example.com/project/"),
            MemoryKeyValueStore::new(),
        )
        .unwrap();
        assert_eq!(
            client.endpoint("rest/v1/notes").unwrap().as_str(),
            "https://example.com/project/rest/v1/notes"
        );
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let err = SupabaseClient::new(&config(""), MemoryKeyValueStore::new()).unwrap_err();
        assert!(matches!(err, BackendError::Config(_)));
    }
}
