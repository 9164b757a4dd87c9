//! Google OAuth service implementation

use std::sync::Arc;

use sb_shared::utils::validation::{mask_email, normalize_email};
use url::Url;

use crate::domain::entities::{GoogleIdentity, OAuthHandshakeState, User};
use crate::domain::value_objects::{ClientMetadata, LoginOutcome};
use crate::errors::{AuthError, DomainError, DomainResult};
use crate::repositories::{TokenRepository, UserRepository};
use crate::services::token::TokenService;

use super::config::OAuthServiceConfig;
use super::pkce;
use super::traits::{OAuthProvider, SessionStore};

/// Service driving the Google authorization code + PKCE flow
pub struct GoogleOAuthService<U, S, P, R>
where
    U: UserRepository + ?Sized,
    S: SessionStore + ?Sized,
    P: OAuthProvider + ?Sized,
    R: TokenRepository + ?Sized,
{
    user_repository: Arc<U>,
    session_store: Arc<S>,
    provider: Arc<P>,
    token_service: Arc<TokenService<R>>,
    config: OAuthServiceConfig,
}

impl<U, S, P, R> GoogleOAuthService<U, S, P, R>
where
    U: UserRepository + ?Sized,
    S: SessionStore + ?Sized,
    P: OAuthProvider + ?Sized,
    R: TokenRepository + ?Sized,
{
    pub fn new(
        user_repository: Arc<U>,
        session_store: Arc<S>,
        provider: Arc<P>,
        token_service: Arc<TokenService<R>>,
        config: OAuthServiceConfig,
    ) -> Self {
        Self {
            user_repository,
            session_store,
            provider,
            token_service,
            config,
        }
    }

    /// Start a login: store a fresh handshake for the session and return the
    /// provider authorization URL
    ///
    /// # Arguments
    ///
    /// * `session_id` - Browser session the handshake is bound to
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - URL to redirect the browser to
    /// * `Err(DomainError)` - Session store failure or bad endpoint config
    pub async fn begin(&self, session_id: &str) -> DomainResult<String> {
        let state = pkce::generate_state();
        let code_verifier = pkce::generate_code_verifier();
        let code_challenge = pkce::compute_code_challenge(&code_verifier);

        let handshake = OAuthHandshakeState::new(state.clone(), code_verifier);
        self.session_store
            .put_handshake(session_id, &handshake, self.config.handshake_ttl_seconds)
            .await?;

        let scope = self.config.scopes.join(" ");
        let url = Url::parse_with_params(
            &self.config.authorization_endpoint,
            &[
                ("response_type", "code"),
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("scope", scope.as_str()),
                ("state", state.as_str()),
                ("code_challenge", code_challenge.as_str()),
                ("code_challenge_method", "S256"),
                ("prompt", "select_account"),
            ],
        )
        .map_err(|e| DomainError::Internal {
            message: format!("Invalid authorization endpoint: {}", e),
        })?;

        tracing::debug!("Started Google OAuth handshake");
        Ok(url.into())
    }

    /// Finish a login from the provider callback
    ///
    /// The handshake is consumed before the code exchange, so a callback can
    /// be replayed at most once even if the exchange fails.
    ///
    /// # Returns
    ///
    /// * `Ok(LoginOutcome)` - User upserted and tokens issued
    /// * `Err(AuthError::SessionExpired)` - No handshake, or already consumed
    /// * `Err(AuthError::StateMismatch)` - `state` differs from the stored one
    /// * `Err(AuthError::UpstreamFailure)` - Exchange or ID token check failed
    pub async fn complete(
        &self,
        session_id: &str,
        code: &str,
        state: &str,
        client: &ClientMetadata,
    ) -> DomainResult<LoginOutcome> {
        if code.is_empty() || state.is_empty() {
            return Err(DomainError::Validation {
                message: "Missing code or state".to_string(),
            });
        }

        let handshake = self
            .session_store
            .get_handshake(session_id)
            .await?
            .ok_or(AuthError::SessionExpired)?;

        if handshake.state != state {
            tracing::warn!("OAuth callback state mismatch");
            return Err(AuthError::StateMismatch.into());
        }

        let handshake = self
            .session_store
            .take_handshake(session_id)
            .await?
            .ok_or(AuthError::SessionExpired)?;

        let identity = self.fetch_identity(code, &handshake.code_verifier).await?;
        let email = identity
            .email
            .as_deref()
            .map(normalize_email)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| {
                tracing::warn!(subject = %identity.subject, "Google identity has no email");
                DomainError::Auth(AuthError::UpstreamFailure)
            })?;

        let user = self.upsert_user(&email, &identity).await?;
        let tokens = self.token_service.issue_tokens(user.id, client).await?;

        tracing::info!(user_id = %user.id, "Google login succeeded");
        Ok(LoginOutcome { user, tokens })
    }

    async fn fetch_identity(&self, code: &str, code_verifier: &str) -> DomainResult<GoogleIdentity> {
        let id_token = self
            .provider
            .exchange_code(code, code_verifier)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Google code exchange failed");
                DomainError::Auth(AuthError::UpstreamFailure)
            })?;

        self.provider
            .verify_id_token(&id_token)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Google ID token rejected");
                DomainError::Auth(AuthError::UpstreamFailure)
            })
    }

    /// Create the user, or fill the empty profile fields of an existing one
    async fn upsert_user(&self, email: &str, identity: &GoogleIdentity) -> DomainResult<User> {
        let existing = match self.user_repository.find_by_email(email).await? {
            Some(user) => user,
            None => {
                let mut user = User::new(email);
                user.fill_profile(identity.name.as_deref(), identity.picture.as_deref());
                user.verify_email();
                user.record_login();

                match self.user_repository.create(user).await {
                    Ok(user) => {
                        tracing::info!(user_id = %user.id, email = %mask_email(email), "Created user from Google login");
                        return Ok(user);
                    }
                    Err(DomainError::Auth(AuthError::UserAlreadyExists)) => self
                        .user_repository
                        .find_by_email(email)
                        .await?
                        .ok_or(DomainError::Auth(AuthError::UserNotFound))?,
                    Err(e) => return Err(e),
                }
            }
        };

        let mut user = existing;
        user.fill_profile(identity.name.as_deref(), identity.picture.as_deref());
        user.verify_email();
        user.record_login();
        self.user_repository.update(user).await
    }
}
