//! Shared application state
//!
//! Services are stored behind trait objects so the binary can choose between
//! MySQL/Redis and in-memory collaborators at startup without making every
//! handler generic.

use std::sync::Arc;

use sb_core::errors::DomainError;
use sb_core::repositories::{TokenRepository, UserRepository};
use sb_core::services::auth::{AuthService, AuthServiceConfig, Mailer, OtpStore};
use sb_core::services::oauth::{GoogleOAuthService, OAuthProvider, OAuthServiceConfig, SessionStore};
use sb_core::services::token::{TokenService, TokenServiceConfig};
use sb_core::services::HealthCheck;
use sb_shared::config::{AppConfig, CookieConfig};

pub type DynTokenService = TokenService<dyn TokenRepository>;

pub type DynAuthService =
    AuthService<dyn UserRepository, dyn OtpStore, dyn Mailer, dyn TokenRepository>;

pub type DynOAuthService =
    GoogleOAuthService<dyn UserRepository, dyn SessionStore, dyn OAuthProvider, dyn TokenRepository>;

/// Storage and delivery implementations the services are built on
pub struct Collaborators {
    pub users: Arc<dyn UserRepository>,
    pub tokens: Arc<dyn TokenRepository>,
    pub otps: Arc<dyn OtpStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub mailer: Arc<dyn Mailer>,
    pub oauth_provider: Arc<dyn OAuthProvider>,
    /// Stores reported by `GET /health`; empty for in-memory storage
    pub health_checks: Vec<Arc<dyn HealthCheck>>,
}

/// State shared by every worker
pub struct AppState {
    pub token_service: Arc<DynTokenService>,
    pub auth_service: Arc<DynAuthService>,
    pub oauth_service: Arc<DynOAuthService>,
    pub cookies: CookieConfig,
    /// Where the browser is sent after a successful Google login
    pub post_login_redirect: String,
    pub health_checks: Vec<Arc<dyn HealthCheck>>,
}

impl AppState {
    /// Wire the services from configuration and collaborators
    ///
    /// Fails when the signing configuration is unusable.
    pub fn build(config: &AppConfig, collaborators: Collaborators) -> Result<Self, DomainError> {
        let token_service = Arc::new(TokenService::new(
            collaborators.tokens,
            TokenServiceConfig::from(&config.auth.jwt),
        )?);

        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&collaborators.users),
            collaborators.otps,
            collaborators.mailer,
            Arc::clone(&token_service),
            AuthServiceConfig::from(&config.auth.otp),
        ));

        let oauth_service = Arc::new(GoogleOAuthService::new(
            collaborators.users,
            collaborators.sessions,
            collaborators.oauth_provider,
            Arc::clone(&token_service),
            OAuthServiceConfig::from(&config.google),
        ));

        Ok(Self {
            token_service,
            auth_service,
            oauth_service,
            cookies: config.cookie.clone(),
            post_login_redirect: config.google.post_login_redirect.clone(),
            health_checks: collaborators.health_checks,
        })
    }
}
