//! Main authentication service implementation

use std::sync::Arc;

use rand::Rng;
use sb_shared::utils::validation::{is_valid_email, mask_email, normalize_email};
use uuid::Uuid;

use crate::domain::entities::{OtpChallenge, TokenPair, User};
use crate::domain::value_objects::{ClientMetadata, LoginOutcome};
use crate::errors::{AuthError, DomainError, DomainResult};
use crate::repositories::{TokenRepository, UserRepository};
use crate::services::token::TokenService;

use super::config::AuthServiceConfig;
use super::traits::{Mailer, OtpStore};

/// Authentication service for the email OTP flow and session maintenance
pub struct AuthService<U, O, M, R>
where
    U: UserRepository + ?Sized,
    O: OtpStore + ?Sized,
    M: Mailer + ?Sized,
    R: TokenRepository + ?Sized,
{
    /// User repository for database operations
    user_repository: Arc<U>,
    /// Storage for outstanding codes
    otp_store: Arc<O>,
    /// Code delivery
    mailer: Arc<M>,
    /// Token service for JWT management
    token_service: Arc<TokenService<R>>,
    /// Service configuration
    config: AuthServiceConfig,
}

impl<U, O, M, R> AuthService<U, O, M, R>
where
    U: UserRepository + ?Sized,
    O: OtpStore + ?Sized,
    M: Mailer + ?Sized,
    R: TokenRepository + ?Sized,
{
    /// Create a new authentication service
    ///
    /// # Arguments
    ///
    /// * `user_repository` - Repository for user data persistence
    /// * `otp_store` - Storage for outstanding codes
    /// * `mailer` - Delivers codes to users
    /// * `token_service` - Service for JWT token management
    /// * `config` - Service configuration
    pub fn new(
        user_repository: Arc<U>,
        otp_store: Arc<O>,
        mailer: Arc<M>,
        token_service: Arc<TokenService<R>>,
        config: AuthServiceConfig,
    ) -> Self {
        Self {
            user_repository,
            otp_store,
            mailer,
            token_service,
            config,
        }
    }

    /// Send a login code to an email address
    ///
    /// This method:
    /// 1. Normalizes and validates the email
    /// 2. Creates an unverified user if none exists yet
    /// 3. Stores the hash of a fresh six-digit code, replacing any earlier one
    /// 4. Hands the code to the mailer
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Code stored and sent
    /// * `Err(DomainError::Validation)` - Malformed email
    /// * `Err(AuthError::UpstreamFailure)` - The mailer failed
    pub async fn send_otp(&self, email: &str) -> DomainResult<()> {
        let email = normalize_email(email);
        if !is_valid_email(&email) {
            return Err(DomainError::Validation {
                message: "Invalid email address".to_string(),
            });
        }

        self.find_or_create_user(&email).await?;

        let code = generate_otp_code();
        let challenge = OtpChallenge::new(email.clone(), &code, self.config.otp_ttl_seconds);
        self.otp_store
            .store(&challenge, self.config.otp_ttl_seconds)
            .await?;

        if let Err(e) = self.mailer.send_otp(&email, &code).await {
            tracing::error!(email = %mask_email(&email), error = %e, "Failed to deliver OTP");
            return Err(AuthError::UpstreamFailure.into());
        }

        tracing::info!(email = %mask_email(&email), "OTP sent");
        Ok(())
    }

    /// Exchange a login code for a token pair
    ///
    /// Every failure other than an unknown user is reported as
    /// `InvalidOtp`. Each submission counts as an attempt, right or wrong. A
    /// code is discarded once `max_otp_attempts` submissions have been made
    /// and after its first successful use.
    ///
    /// # Arguments
    ///
    /// * `email` - The address the code was sent to
    /// * `code` - The submitted code
    /// * `client` - Request metadata stored with the refresh record
    pub async fn verify_otp(
        &self,
        email: &str,
        code: &str,
        client: &ClientMetadata,
    ) -> DomainResult<LoginOutcome> {
        let email = normalize_email(email);
        let masked = mask_email(&email);

        let mut user = self
            .user_repository
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let challenge = self
            .otp_store
            .load(&email)
            .await?
            .ok_or(AuthError::InvalidOtp)?;

        if challenge.is_expired() {
            self.otp_store.take(&email).await?;
            tracing::info!(email = %masked, "Discarded expired OTP challenge");
            return Err(AuthError::InvalidOtp.into());
        }

        // Count first: only guesses within the allowance are ever compared.
        let attempts = self.otp_store.register_attempt(&email).await?;
        if attempts > self.config.max_otp_attempts {
            self.otp_store.take(&email).await?;
            tracing::warn!(email = %masked, attempts, "OTP attempts exhausted");
            return Err(AuthError::InvalidOtp.into());
        }

        if !challenge.matches(code) {
            if attempts >= self.config.max_otp_attempts {
                self.otp_store.take(&email).await?;
                tracing::warn!(email = %masked, attempts, "OTP attempts exhausted");
            } else {
                tracing::info!(email = %masked, attempts, "Invalid OTP submitted");
            }
            return Err(AuthError::InvalidOtp.into());
        }

        // A concurrent verification may have consumed the code already.
        if self.otp_store.take(&email).await?.is_none() {
            return Err(AuthError::InvalidOtp.into());
        }

        user.verify_email();
        user.record_login();
        let user = self.user_repository.update(user).await?;

        let tokens = self.token_service.issue_tokens(user.id, client).await?;
        tracing::info!(user_id = %user.id, "OTP login succeeded");

        Ok(LoginOutcome { user, tokens })
    }

    /// Rotate a refresh token into a new pair
    pub async fn refresh(
        &self,
        refresh_token: &str,
        client: &ClientMetadata,
    ) -> DomainResult<TokenPair> {
        self.token_service
            .rotate_refresh_token(refresh_token, client)
            .await
    }

    /// Revoke the presented refresh token, if any
    ///
    /// Succeeds for missing, unverifiable and already revoked tokens.
    pub async fn logout(&self, refresh_token: Option<&str>) -> DomainResult<()> {
        match refresh_token {
            Some(token) if !token.is_empty() => {
                self.token_service.revoke_refresh_token(token).await
            }
            _ => Ok(()),
        }
    }

    /// Load the user behind an authenticated request
    pub async fn current_user(&self, user_id: Uuid) -> DomainResult<User> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                resource: "user".to_string(),
            })
    }

    async fn find_or_create_user(&self, email: &str) -> DomainResult<User> {
        if let Some(user) = self.user_repository.find_by_email(email).await? {
            return Ok(user);
        }

        match self.user_repository.create(User::new(email)).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "Created user for OTP login");
                Ok(user)
            }
            Err(DomainError::Auth(AuthError::UserAlreadyExists)) => self
                .user_repository
                .find_by_email(email)
                .await?
                .ok_or(DomainError::Auth(AuthError::UserNotFound)),
            Err(e) => Err(e),
        }
    }
}

/// Six decimal digits from the thread-local CSPRNG
fn generate_otp_code() -> String {
    let code: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{:06}", code)
}
