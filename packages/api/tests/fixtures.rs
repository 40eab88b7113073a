//! Mock backend helpers for integration tests.

#![allow(dead_code)]

use api::SupabaseClient;
use serde_json::{json, Value};
use store::{AuthBackend, MemoryKeyValueStore, NotebookConfig, Session};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const ANON_KEY: &str = "anon-key";
pub const EMAIL: &str = "ada@example.com";
pub const PASSWORD: &str = "correct horse";

/// Client pointed at `server`, with its storage handle for inspection.
pub fn client_for(server: &MockServer) -> (SupabaseClient, MemoryKeyValueStore) {
    let mut config = NotebookConfig::default();
    config.backend.url = server.uri();
    config.backend.anon_key = ANON_KEY.to_string();
    config.auth.redirect_to = Some("http://localhost:8080/".to_string());

    let storage = MemoryKeyValueStore::new();
    let client = SupabaseClient::new(&config, storage.clone()).unwrap();
    (client, storage)
}

/// A token response for `user_id` valid for `expires_in` seconds.
pub fn token_json(user_id: &str, access_token: &str, expires_in: i64) -> Value {
    json!({
        "access_token": access_token,
        "token_type": "bearer",
        "expires_in": expires_in,
        "refresh_token": format!("refresh-{access_token}"),
        "user": {
            "id": user_id,
            "email": EMAIL,
            "app_metadata": {"provider": "email"},
            "user_metadata": {}
        }
    })
}

pub fn note_json(id: i64, title: &str, created_at: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "content": format!("{title} body"),
        "created_at": created_at,
        "user_id": "u-1"
    })
}

/// Mount a password grant answering with `token`.
pub async fn mount_password_grant(server: &MockServer, token: Value) {
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token))
        .mount(server)
        .await;
}

/// Sign `client` in as `u-1` with access token `jwt-u-1`.
pub async fn signed_in(server: &MockServer, client: &SupabaseClient) -> Session {
    mount_password_grant(server, token_json("u-1", "jwt-u-1", 3600)).await;
    client.sign_in_with_password(EMAIL, PASSWORD).await.unwrap()
}
