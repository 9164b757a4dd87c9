//! Unit tests for the Google OAuth service

use std::collections::HashMap;
use std::sync::Arc;

use url::Url;

use super::mocks::{identity, MockOAuthProvider, MockSessionStore};
use crate::domain::entities::User;
use crate::domain::value_objects::ClientMetadata;
use crate::errors::{AuthError, DomainError};
use crate::repositories::{MockTokenRepository, MockUserRepository, UserRepository};
use crate::services::oauth::pkce::compute_code_challenge;
use crate::services::oauth::{GoogleOAuthService, OAuthServiceConfig};
use crate::services::token::{TokenService, TokenServiceConfig};

type TestOAuthService =
    GoogleOAuthService<MockUserRepository, MockSessionStore, MockOAuthProvider, MockTokenRepository>;

struct Fixture {
    service: TestOAuthService,
    users: Arc<MockUserRepository>,
    sessions: Arc<MockSessionStore>,
    provider: Arc<MockOAuthProvider>,
    tokens: Arc<MockTokenRepository>,
}

fn fixture_with(users: MockUserRepository, provider: MockOAuthProvider) -> Fixture {
    let users = Arc::new(users);
    let sessions = Arc::new(MockSessionStore::new());
    let provider = Arc::new(provider);
    let tokens = Arc::new(MockTokenRepository::new());
    let token_service = Arc::new(
        TokenService::new(
            Arc::clone(&tokens),
            TokenServiceConfig::with_secret("oauth-service-test-secret"),
        )
        .unwrap(),
    );

    let config = OAuthServiceConfig {
        client_id: "client-123.apps.googleusercontent.com".to_string(),
        ..OAuthServiceConfig::default()
    };

    let service = GoogleOAuthService::new(
        Arc::clone(&users),
        Arc::clone(&sessions),
        Arc::clone(&provider),
        token_service,
        config,
    );

    Fixture {
        service,
        users,
        sessions,
        provider,
        tokens,
    }
}

fn fixture() -> Fixture {
    fixture_with(
        MockUserRepository::new(),
        MockOAuthProvider::new(identity(Some("Jane@Example.com"))),
    )
}

fn query(url: &str) -> HashMap<String, String> {
    Url::parse(url)
        .unwrap()
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

async fn begin(f: &Fixture, session_id: &str) -> String {
    let url = f.service.begin(session_id).await.unwrap();
    query(&url)["state"].clone()
}

#[tokio::test]
async fn test_begin_builds_authorization_url() {
    let f = fixture();
    let url = f.service.begin("session-1").await.unwrap();

    assert!(url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
    let params = query(&url);
    assert_eq!(params["response_type"], "code");
    assert_eq!(params["client_id"], "client-123.apps.googleusercontent.com");
    assert_eq!(
        params["redirect_uri"],
        "http://localhost:8080/api/v1/auth/google/callback"
    );
    assert_eq!(params["scope"], "openid email profile");
    assert_eq!(params["code_challenge_method"], "S256");
    assert_eq!(params["prompt"], "select_account");

    let handshake = f.sessions.get("session-1").unwrap();
    assert_eq!(params["state"], handshake.state);
    assert_eq!(
        params["code_challenge"],
        compute_code_challenge(&handshake.code_verifier)
    );
}

#[tokio::test]
async fn test_complete_creates_verified_user_and_issues_tokens() {
    let f = fixture();
    let state = begin(&f, "session-1").await;
    let verifier = f.sessions.get("session-1").unwrap().code_verifier;

    let outcome = f
        .service
        .complete("session-1", "auth-code", &state, &ClientMetadata::default())
        .await
        .unwrap();

    assert_eq!(outcome.user.email, "jane@example.com");
    assert!(outcome.user.is_email_verified);
    assert_eq!(outcome.user.name.as_deref(), Some("Jane Doe"));
    assert_eq!(f.tokens.all().await.len(), 1);
    assert!(f.sessions.get("session-1").is_none());
    assert_eq!(
        f.provider.last_verifier.lock().unwrap().as_deref(),
        Some(verifier.as_str())
    );
}

#[tokio::test]
async fn test_complete_fills_only_empty_profile_fields() {
    let mut existing = User::new("jane@example.com");
    existing.name = Some("Janey".to_string());
    let f = fixture_with(
        MockUserRepository::with_users(vec![existing.clone()]),
        MockOAuthProvider::new(identity(Some("jane@example.com"))),
    );
    let state = begin(&f, "s").await;

    let outcome = f
        .service
        .complete("s", "code", &state, &ClientMetadata::default())
        .await
        .unwrap();

    assert_eq!(outcome.user.id, existing.id);
    assert_eq!(outcome.user.name.as_deref(), Some("Janey"));
    assert_eq!(
        outcome.user.avatar.as_deref(),
        Some("https://lh3.googleusercontent.com/a/jane")
    );
    assert!(outcome.user.is_email_verified);
    assert_eq!(f.users.count().await, 1);
}

#[tokio::test]
async fn test_state_mismatch_issues_no_tokens() {
    let f = fixture();
    begin(&f, "session-1").await;

    let result = f
        .service
        .complete("session-1", "code", "forged-state", &ClientMetadata::default())
        .await;

    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::StateMismatch))
    ));
    assert!(f.tokens.all().await.is_empty());
    assert_eq!(f.provider.exchange_count(), 0);
}

#[tokio::test]
async fn test_callback_replay_fails_with_session_expired() {
    let f = fixture();
    let state = begin(&f, "session-1").await;

    f.service
        .complete("session-1", "code", &state, &ClientMetadata::default())
        .await
        .unwrap();

    let replay = f
        .service
        .complete("session-1", "code", &state, &ClientMetadata::default())
        .await;

    assert!(matches!(
        replay,
        Err(DomainError::Auth(AuthError::SessionExpired))
    ));
    assert_eq!(f.tokens.all().await.len(), 1);
    assert_eq!(f.provider.exchange_count(), 1);
}

#[tokio::test]
async fn test_unknown_session_is_expired() {
    let f = fixture();
    let result = f
        .service
        .complete("never-started", "code", "state", &ClientMetadata::default())
        .await;
    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::SessionExpired))
    ));
}

#[tokio::test]
async fn test_missing_code_or_state() {
    let f = fixture();
    let result = f
        .service
        .complete("s", "", "state", &ClientMetadata::default())
        .await;
    assert!(matches!(result, Err(DomainError::Validation { .. })));
}

#[tokio::test]
async fn test_exchange_failure_is_opaque_and_clears_handshake() {
    let mut provider = MockOAuthProvider::new(identity(Some("jane@example.com")));
    provider.fail_exchange = true;
    let f = fixture_with(MockUserRepository::new(), provider);
    let state = begin(&f, "s").await;

    let result = f
        .service
        .complete("s", "code", &state, &ClientMetadata::default())
        .await;

    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::UpstreamFailure))
    ));
    assert!(f.sessions.get("s").is_none());
    assert!(f.tokens.all().await.is_empty());
}

#[tokio::test]
async fn test_id_token_rejection_is_upstream_failure() {
    let mut provider = MockOAuthProvider::new(identity(Some("jane@example.com")));
    provider.fail_verify = true;
    let f = fixture_with(MockUserRepository::new(), provider);
    let state = begin(&f, "s").await;

    let result = f
        .service
        .complete("s", "code", &state, &ClientMetadata::default())
        .await;
    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::UpstreamFailure))
    ));
}

#[tokio::test]
async fn test_identity_without_email_is_rejected() {
    let f = fixture_with(MockUserRepository::new(), MockOAuthProvider::new(identity(None)));
    let state = begin(&f, "s").await;

    let result = f
        .service
        .complete("s", "code", &state, &ClientMetadata::default())
        .await;

    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::UpstreamFailure))
    ));
    assert!(f.users.find_by_email("").await.unwrap().is_none());
    assert_eq!(f.users.count().await, 0);
}
