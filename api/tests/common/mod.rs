//! Shared setup for the HTTP integration tests
//!
//! The application runs on the in-memory stores with a capturing mailer and a
//! scripted Google provider, so every flow can be driven end to end.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::web;
use async_trait::async_trait;

use sb_api::{AppState, Collaborators};
use sb_core::domain::entities::{GoogleIdentity, User};
use sb_core::domain::value_objects::ClientMetadata;
use sb_core::errors::{AuthError, DomainError};
use sb_core::repositories::UserRepository;
use sb_core::services::auth::Mailer;
use sb_core::services::oauth::OAuthProvider;
use sb_core::services::HealthCheck;
use sb_infra::memory::{
    InMemoryOtpStore, InMemorySessionStore, InMemoryTokenRepository, InMemoryUserRepository,
};
use sb_shared::config::AppConfig;

pub const DASHBOARD_URL: &str = "http://localhost:3000/dashboard";

/// Mailer that records every code instead of sending it
#[derive(Default)]
pub struct CapturingMailer {
    sent: Mutex<Vec<(String, String)>>,
}

impl CapturingMailer {
    pub fn last_code_for(&self, email: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(to, _)| to == email)
            .map(|(_, code)| code.clone())
    }
}

#[async_trait]
impl Mailer for CapturingMailer {
    async fn send_otp(&self, email: &str, code: &str) -> Result<(), DomainError> {
        self.sent
            .lock()
            .unwrap()
            .push((email.to_string(), code.to_string()));
        Ok(())
    }
}

/// Google stand-in: any code except `bad-code` yields the configured identity
pub struct FakeGoogle {
    identity: Mutex<GoogleIdentity>,
    exchanges: AtomicUsize,
    last_verifier: Mutex<Option<String>>,
}

impl FakeGoogle {
    pub fn new(identity: GoogleIdentity) -> Self {
        Self {
            identity: Mutex::new(identity),
            exchanges: AtomicUsize::new(0),
            last_verifier: Mutex::new(None),
        }
    }

    pub fn exchanges(&self) -> usize {
        self.exchanges.load(Ordering::SeqCst)
    }

    pub fn last_verifier(&self) -> Option<String> {
        self.last_verifier.lock().unwrap().clone()
    }
}

#[async_trait]
impl OAuthProvider for FakeGoogle {
    async fn exchange_code(&self, code: &str, code_verifier: &str) -> Result<String, DomainError> {
        self.exchanges.fetch_add(1, Ordering::SeqCst);
        *self.last_verifier.lock().unwrap() = Some(code_verifier.to_string());
        if code == "bad-code" {
            return Err(AuthError::UpstreamFailure.into());
        }
        Ok(format!("id-token-for-{}", code))
    }

    async fn verify_id_token(&self, _id_token: &str) -> Result<GoogleIdentity, DomainError> {
        Ok(self.identity.lock().unwrap().clone())
    }
}

/// Health check with a fixed answer
pub struct StaticHealth {
    pub component: &'static str,
    pub healthy: bool,
}

#[async_trait]
impl HealthCheck for StaticHealth {
    fn component(&self) -> &'static str {
        self.component
    }

    async fn is_healthy(&self) -> bool {
        self.healthy
    }
}

pub fn google_identity() -> GoogleIdentity {
    GoogleIdentity {
        subject: "google-subject-1".to_string(),
        email: Some("Jane.Doe@Example.com".to_string()),
        email_verified: true,
        name: Some("Jane Doe".to_string()),
        picture: Some("https://example.com/jane.png".to_string()),
    }
}

pub struct TestContext {
    pub state: web::Data<AppState>,
    pub config: AppConfig,
    pub mailer: Arc<CapturingMailer>,
    pub google: Arc<FakeGoogle>,
    pub users: Arc<InMemoryUserRepository>,
    pub tokens: Arc<InMemoryTokenRepository>,
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.auth.jwt.secret = "integration-test-secret".to_string();
    config.google.client_id = "test-client-id".to_string();
    config.google.client_secret = "test-client-secret".to_string();
    config.google.post_login_redirect = DASHBOARD_URL.to_string();
    config
}

pub fn setup() -> TestContext {
    setup_with(test_config())
}

pub fn setup_with(config: AppConfig) -> TestContext {
    setup_with_health(config, Vec::new())
}

pub fn setup_with_health(
    config: AppConfig,
    health_checks: Vec<Arc<dyn HealthCheck>>,
) -> TestContext {
    let users = Arc::new(InMemoryUserRepository::new());
    let tokens = Arc::new(InMemoryTokenRepository::new());
    let mailer = Arc::new(CapturingMailer::default());
    let google = Arc::new(FakeGoogle::new(google_identity()));

    let collaborators = Collaborators {
        users: users.clone(),
        tokens: tokens.clone(),
        otps: Arc::new(InMemoryOtpStore::new()),
        sessions: Arc::new(InMemorySessionStore::new()),
        mailer: mailer.clone(),
        oauth_provider: google.clone(),
        health_checks,
    };

    let state = web::Data::new(AppState::build(&config, collaborators).unwrap());

    TestContext {
        state,
        config,
        mailer,
        google,
        users,
        tokens,
    }
}

impl TestContext {
    /// Create a user and issue a pair for it without going through HTTP
    pub async fn signed_in_user(&self, email: &str) -> (User, String, String) {
        let user = self.users.create(User::new(email)).await.unwrap();
        let pair = self
            .state
            .token_service
            .issue_tokens(user.id, &ClientMetadata::default())
            .await
            .unwrap();
        (user, pair.access_token, pair.refresh_token)
    }
}

/// Cookie set by a response, if any
pub fn response_cookie<B>(resp: &ServiceResponse<B>, name: &str) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|c| c.name() == name)
        .map(|c| c.into_owned())
}
