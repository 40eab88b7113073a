//! Integration tests for sign-in, redirect completion, refresh and sign-out.

mod fixtures;

use api::auth::VERIFIER_KEY_SUFFIX;
use chrono::{Duration, Utc};
use fixtures::{client_for, mount_password_grant, signed_in, token_json, EMAIL, PASSWORD};
use serde_json::json;
use store::{
    AuthBackend, AuthEvent, BackendError, KeyValueStore, Provider, Session, SignUp, UserInfo,
};
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn last_event(client: &api::SupabaseClient) -> Option<AuthEvent> {
    client.subscribe().borrow().as_ref().map(|change| change.event)
}

#[tokio::test]
async fn test_password_sign_in_publishes_and_persists() {
    let server = MockServer::start().await;
    let (client, storage) = client_for(&server);

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .and(body_json(json!({"email": EMAIL, "password": PASSWORD})))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_json("u-1", "jwt-u-1", 3600)))
        .expect(1)
        .mount(&server)
        .await;

    let session = client.sign_in_with_password(EMAIL, PASSWORD).await.unwrap();

    assert_eq!(session.user_id(), "u-1");
    assert_eq!(client.current_session(), Some(session.clone()));
    assert_eq!(last_event(&client), Some(AuthEvent::SignedIn));

    let stored: Session = serde_json::from_str(&storage.get(client.storage_key()).unwrap()).unwrap();
    assert_eq!(stored, session);
}

#[tokio::test]
async fn test_wrong_password_is_rejected() {
    let server = MockServer::start().await;
    let (client, _) = client_for(&server);

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid login credentials"
        })))
        .mount(&server)
        .await;

    let err = client.sign_in_with_password(EMAIL, "nope").await.unwrap_err();

    assert_eq!(err, BackendError::rejected(400, "Invalid login credentials"));
    assert_eq!(err.user_message(), "Invalid login credentials");
    assert!(client.current_session().is_none());
}

#[tokio::test]
async fn test_sign_up_waiting_for_confirmation() {
    let server = MockServer::start().await;
    let (client, _) = client_for(&server);

    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .and(query_param("redirect_to", "http://localhost:8080/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u-9",
            "email": "new@example.com",
            "confirmation_sent_at": "2025-01-01T00:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client.sign_up("new@example.com", "secret-pw").await.unwrap();

    assert_eq!(outcome, SignUp::ConfirmationSent);
    assert!(client.current_session().is_none());
}

#[tokio::test]
async fn test_sign_up_with_immediate_session() {
    let server = MockServer::start().await;
    let (client, _) = client_for(&server);

    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_json("u-9", "jwt-u-9", 3600)))
        .mount(&server)
        .await;

    assert_eq!(
        client.sign_up("new@example.com", "secret-pw").await.unwrap(),
        SignUp::SignedIn
    );
    assert_eq!(client.current_session().unwrap().user_id(), "u-9");
}

#[tokio::test]
async fn test_initialize_restores_stored_session_offline() {
    let server = MockServer::start().await;
    let (client, storage) = client_for(&server);

    let session = Session {
        access_token: "stored-jwt".to_string(),
        refresh_token: "stored-refresh".to_string(),
        token_type: "bearer".to_string(),
        expires_at: Utc::now() + Duration::hours(1),
        user: UserInfo {
            id: "u-1".to_string(),
            email: Some(EMAIL.to_string()),
            name: None,
            avatar_url: None,
            provider: "email".to_string(),
        },
    };
    storage.set(client.storage_key(), &serde_json::to_string(&session).unwrap());

    let restored = client.initialize(None).await.unwrap();

    assert_eq!(restored, Some(session));
    assert_eq!(last_event(&client), Some(AuthEvent::InitialSession));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_initialize_without_anything_reports_no_session() {
    let server = MockServer::start().await;
    let (client, storage) = client_for(&server);
    storage.set(client.storage_key(), "{not json");

    assert_eq!(client.initialize(Some("?tab=notes")).await.unwrap(), None);

    let change = client.subscribe().borrow().clone().unwrap();
    assert_eq!(change.event, AuthEvent::InitialSession);
    assert!(change.session.is_none());
    assert!(storage.get(client.storage_key()).is_none());
}

#[tokio::test]
async fn test_provider_redirect_round_trip() {
    let server = MockServer::start().await;
    let (client, storage) = client_for(&server);

    let url = client.provider_sign_in_url(Provider::Google).await.unwrap();
    let url = Url::parse(&url).unwrap();
    assert_eq!(url.path(), "/auth/v1/authorize");

    let params: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();
    assert_eq!(params["provider"], "google");
    assert_eq!(params["redirect_to"], "http://localhost:8080/");
    assert_eq!(params["code_challenge_method"], "s256");
    assert!(!params["code_challenge"].is_empty());

    let verifier_key = format!("{}{}", client.storage_key(), VERIFIER_KEY_SUFFIX);
    let verifier = storage.get(&verifier_key).expect("verifier stored");

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "pkce"))
        .and(header("apikey", fixtures::ANON_KEY))
        .and(body_json(json!({"auth_code": "code-123", "code_verifier": verifier})))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_json("u-1", "jwt-u-1", 3600)))
        .expect(1)
        .mount(&server)
        .await;

    let session = client.initialize(Some("?code=code-123")).await.unwrap();

    assert_eq!(session.unwrap().user_id(), "u-1");
    assert_eq!(last_event(&client), Some(AuthEvent::InitialSession));
    assert!(storage.get(&verifier_key).is_none());
    assert!(storage.get(client.storage_key()).is_some());
}

#[tokio::test]
async fn test_redirect_without_verifier_fails_cleanly() {
    let server = MockServer::start().await;
    let (client, _) = client_for(&server);

    let err = client.initialize(Some("code=stale")).await.unwrap_err();

    assert_eq!(err, BackendError::MissingVerifier);
    let change = client.subscribe().borrow().clone().unwrap();
    assert_eq!(change.event, AuthEvent::InitialSession);
    assert!(change.session.is_none());
}

#[tokio::test]
async fn test_redirect_error_is_reported() {
    let server = MockServer::start().await;
    let (client, _) = client_for(&server);

    let err = client
        .initialize(Some("?error=access_denied&error_description=Access+denied"))
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "Access denied");
    assert!(client.current_session().is_none());
}

#[tokio::test]
async fn test_sign_out_clears_session() {
    let server = MockServer::start().await;
    let (client, storage) = client_for(&server);
    signed_in(&server, &client).await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .and(header("authorization", "Bearer jwt-u-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client.sign_out().await.unwrap();

    assert!(client.current_session().is_none());
    assert_eq!(last_event(&client), Some(AuthEvent::SignedOut));
    assert!(storage.get(client.storage_key()).is_none());
}

#[tokio::test]
async fn test_sign_out_failure_keeps_session() {
    let server = MockServer::start().await;
    let (client, _) = client_for(&server);
    signed_in(&server, &client).await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"msg": "unavailable"})))
        .mount(&server)
        .await;

    let err = client.sign_out().await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert!(client.current_session().is_some());
}

#[tokio::test]
async fn test_sign_out_with_revoked_session_succeeds() {
    let server = MockServer::start().await;
    let (client, _) = client_for(&server);
    signed_in(&server, &client).await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"msg": "invalid JWT"})))
        .mount(&server)
        .await;

    client.sign_out().await.unwrap();
    assert!(client.current_session().is_none());
}

#[tokio::test]
async fn test_rejected_refresh_expires_session() {
    let server = MockServer::start().await;
    let (client, storage) = client_for(&server);
    mount_password_grant(&server, token_json("u-1", "jwt-u-1", 3600)).await;
    client.sign_in_with_password(EMAIL, PASSWORD).await.unwrap();

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "refresh_token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid Refresh Token: Already Used"
        })))
        .mount(&server)
        .await;

    assert!(client.refresh_session().await.is_err());

    assert!(client.current_session().is_none());
    assert_eq!(last_event(&client), Some(AuthEvent::Expired));
    assert!(storage.get(client.storage_key()).is_none());
}

#[tokio::test]
async fn test_stale_refresh_rejection_keeps_newer_session() {
    let server = MockServer::start().await;
    let (client, storage) = client_for(&server);
    signed_in(&server, &client).await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "refresh_token"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({
                    "error": "invalid_grant",
                    "error_description": "Invalid Refresh Token: Already Used"
                }))
                .set_delay(std::time::Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .and(body_json(json!({"email": EMAIL, "password": "second"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_json("u-1", "jwt-u-2", 3600)))
        .with_priority(1)
        .mount(&server)
        .await;

    // The session is replaced while the refresh is still waiting for its answer.
    let (refreshed, signed_in_again) = tokio::join!(client.refresh_session(), async {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        client.sign_in_with_password(EMAIL, "second").await
    });

    assert!(refreshed.is_err());
    let newer = signed_in_again.unwrap();
    assert_eq!(newer.access_token, "jwt-u-2");
    assert_eq!(client.current_session(), Some(newer));
    assert_eq!(last_event(&client), Some(AuthEvent::SignedIn));
    assert!(storage.get(client.storage_key()).is_some());
}
