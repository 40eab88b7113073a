//! # Auth user object
//!
//! The hosted auth service returns a user object with every token response
//! and from `/auth/v1/user`. Profile fields arrive in two free-form maps:
//!
//! - `user_metadata`: written by the identity provider (`full_name` or
//!   `name`, `avatar_url` or `picture`).
//! - `app_metadata`: written by the service (`provider`: `"email"`,
//!   `"google"`, ...).
//!
//! [`AuthUser::to_info`] projects this into the client-side
//! [`UserInfo`](store::UserInfo).

use serde::Deserialize;
use store::UserInfo;

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct UserMetadata {
    pub full_name: Option<String>,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub picture: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct AppMetadata {
    pub provider: Option<String>,
}

/// User object as sent by the auth service.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AuthUser {
    pub id: String,
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: UserMetadata,
    #[serde(default)]
    pub app_metadata: AppMetadata,
}

impl AuthUser {
    /// Convert to UserInfo for client consumption.
    pub fn to_info(&self) -> UserInfo {
        let meta = &self.user_metadata;
        UserInfo {
            id: self.id.clone(),
            email: self.email.clone().filter(|e| !e.is_empty()),
            name: meta.full_name.clone().or_else(|| meta.name.clone()),
            avatar_url: meta.avatar_url.clone().or_else(|| meta.picture.clone()),
            provider: self
                .app_metadata
                .provider
                .clone()
                .unwrap_or_else(|| "email".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_google_user_projection() {
        let user: AuthUser = serde_json::from_str(
            r#"{
                "id": "8d0f",
                "aud": "authenticated",
                "email": "ada@example.com",
                "app_metadata": {"provider": "google", "providers": ["google"]},
                "user_metadata": {"full_name": "Ada Lovelace", "picture": "https://img/ada.png"}
            }"#,
        )
        .unwrap();

        let info = user.to_info();
        assert_eq!(info.id, "8d0f");
        assert_eq!(info.name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(info.avatar_url.as_deref(), Some("https://img/ada.png"));
        assert_eq!(info.provider, "google");
    }

    #[test]
    fn test_bare_user_defaults_to_email_provider() {
        let user: AuthUser = serde_json::from_str(r#"{"id": "u-1", "email": ""}"#).unwrap();
        let info = user.to_info();
        assert_eq!(info.provider, "email");
        assert!(info.email.is_none());
        assert_eq!(info.display_name(), "u-1");
    }
}
