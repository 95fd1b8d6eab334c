//! Login/refresh flow against a mocked auth backend.

use std::time::Duration;

use chrono::Utc;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use v7mon_auth::{AuthClient, AuthError, SessionHandle};

fn login_body() -> serde_json::Value {
    json!({
        "access_token": "access-abc",
        "refresh_token": "refresh-def",
        "expires_in": 900,
        "user_id": "u-42",
        "email": "user@example.com",
        "username": "user"
    })
}

#[tokio::test]
async fn login_success_yields_valid_credential() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({
            "email": "user@example.com",
            "password": "correctpass"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = AuthClient::new(server.uri()).unwrap();
    let credential = client.login("user@example.com", "correctpass").await.unwrap();

    assert!(!credential.access_token.is_empty());
    assert!(!credential.refresh_token.is_empty());
    assert!(credential.expires_at > Utc::now());
    assert_eq!(credential.user_id, "u-42");
}

#[tokio::test]
async fn login_wrong_secret_is_invalid_credentials_and_session_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "incorrect email or password"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = SessionHandle::new();
    let client = AuthClient::new(server.uri()).unwrap();

    let err = client
        .login("user@example.com", "wrongpass")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));

    // Stored credential remains None: a failed login mutates nothing.
    assert!(session.credential().is_none());
    assert!(session.require_auth().is_none());
}

#[tokio::test]
async fn login_backend_failure_is_service_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = AuthClient::new(server.uri()).unwrap();
    let err = client.login("user@example.com", "pass").await.unwrap_err();
    assert!(matches!(err, AuthError::ServiceUnavailable(_)));
}

#[tokio::test]
async fn login_timeout_is_service_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(login_body())
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let client = AuthClient::with_timeout(server.uri(), Duration::from_millis(50)).unwrap();
    let err = client.login("user@example.com", "pass").await.unwrap_err();
    assert!(matches!(err, AuthError::ServiceUnavailable(_)));
}

#[tokio::test]
async fn refresh_replaces_access_token_only() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_body()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .and(body_json(json!({ "refresh_token": "refresh-def" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-new",
            "expires_in": 900
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = AuthClient::new(server.uri()).unwrap();
    let credential = client.login("user@example.com", "correctpass").await.unwrap();
    let refreshed = client.refresh(&credential).await.unwrap();

    assert_eq!(refreshed.access_token, "access-new");
    assert_eq!(refreshed.refresh_token, credential.refresh_token);
    assert_eq!(refreshed.user_id, credential.user_id);
    assert!(refreshed.expires_at > Utc::now());
}

#[tokio::test]
async fn refresh_rejected_token_is_invalid_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_body()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = AuthClient::new(server.uri()).unwrap();
    let credential = client.login("user@example.com", "correctpass").await.unwrap();
    let err = client.refresh(&credential).await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));
}
