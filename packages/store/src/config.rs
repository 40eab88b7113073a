//! # Client configuration: `notebook.toml`
//!
//! Defines the TOML configuration the web client is built with.
//!
//! ## Structure
//!
//! ```toml
//! [backend]
//! url = "https://abcd.supabase.co"
//! anon_key = "public-anon-key"
//!
//! [auth]
//! providers = ["google"]
//! redirect_to = "https://notes.example.com/"   # optional
//! refresh_margin_secs = 60
//!
//! [toasts]
//! success_ms = 2000
//! error_ms = 4000
//! ```
//!
//! All sections derive `Default`, so a missing or empty file is equivalent to
//! the default configuration. The backend URL and key have no usable default
//! and are checked by [`NotebookConfig::validate`]; the `api` crate can fill
//! them from the environment first.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backend::Provider;
use crate::toast::ToastKind;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("backend url must start with http:// or https://, got {0:?}")]
    InvalidUrl(String),
}

/// Top-level configuration stored in `notebook.toml`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NotebookConfig {
    #[serde(default)]
    pub backend: BackendSettings,
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub toasts: ToastSettings,
}

/// Where the hosted backend lives.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BackendSettings {
    /// Project URL, without the `/auth/v1` or `/rest/v1` suffix.
    #[serde(default)]
    pub url: String,
    /// Public (anonymous) API key sent with every request.
    #[serde(default)]
    pub anon_key: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuthSettings {
    /// Federated providers offered on the sign-in screen.
    #[serde(default = "default_providers")]
    pub providers: Vec<Provider>,
    /// Where the provider redirects back to. Defaults to the current origin.
    #[serde(default)]
    pub redirect_to: Option<String>,
    /// Refresh the access token before a request when it expires this soon.
    #[serde(default = "default_refresh_margin")]
    pub refresh_margin_secs: u32,
}

fn default_providers() -> Vec<Provider> {
    vec![Provider::Google]
}

fn default_refresh_margin() -> u32 {
    60
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            providers: default_providers(),
            redirect_to: None,
            refresh_margin_secs: default_refresh_margin(),
        }
    }
}

/// Toast display times in milliseconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToastSettings {
    #[serde(default = "default_success_ms")]
    pub success_ms: u64,
    #[serde(default = "default_error_ms")]
    pub error_ms: u64,
}

fn default_success_ms() -> u64 {
    ToastKind::Success.default_duration().as_millis() as u64
}

fn default_error_ms() -> u64 {
    ToastKind::Error.default_duration().as_millis() as u64
}

impl Default for ToastSettings {
    fn default() -> Self {
        Self {
            success_ms: default_success_ms(),
            error_ms: default_error_ms(),
        }
    }
}

impl ToastSettings {
    pub fn duration_for(&self, kind: ToastKind) -> Duration {
        match kind {
            ToastKind::Success => Duration::from_millis(self.success_ms),
            ToastKind::Error => Duration::from_millis(self.error_ms),
        }
    }
}

impl NotebookConfig {
    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Check that the backend can be reached with this config.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.backend.url.trim();
        if url.is_empty() {
            return Err(ConfigError::Missing("backend.url"));
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::InvalidUrl(url.to_string()));
        }
        if self.backend.anon_key.trim().is_empty() {
            return Err(ConfigError::Missing("backend.anon_key"));
        }
        Ok(())
    }

    pub fn refresh_margin(&self) -> chrono::Duration {
        chrono::Duration::seconds(i64::from(self.auth.refresh_margin_secs))
    }
}
