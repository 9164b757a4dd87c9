//! Main token service implementation

use std::sync::Arc;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::domain::entities::token::{Claims, RefreshTokenRecord, TokenPair};
use crate::domain::value_objects::ClientMetadata;
use crate::errors::{DomainError, TokenError};
use crate::repositories::TokenRepository;

use super::config::TokenServiceConfig;

/// Service for issuing, verifying, rotating and revoking tokens
pub struct TokenService<R: TokenRepository + ?Sized> {
    pub(crate) repository: Arc<R>,
    config: TokenServiceConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl<R: TokenRepository + ?Sized> TokenService<R> {
    /// Creates a new token service instance
    ///
    /// # Arguments
    ///
    /// * `repository` - Token repository for persistence
    /// * `config` - Token service configuration
    ///
    /// # Returns
    ///
    /// A new `TokenService` instance, or a validation error when the secret
    /// is empty or a lifetime is not positive
    pub fn new(repository: Arc<R>, config: TokenServiceConfig) -> Result<Self, DomainError> {
        if config.jwt_secret.is_empty() {
            return Err(DomainError::Validation {
                message: "JWT secret must not be empty".to_string(),
            });
        }
        if config.access_ttl_seconds <= 0 || config.refresh_ttl_seconds <= 0 {
            return Err(DomainError::Validation {
                message: "Token lifetimes must be positive".to_string(),
            });
        }

        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(config.algorithm);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.validate_exp = true;
        validation.leeway = 0;

        Ok(Self {
            repository,
            config,
            encoding_key,
            decoding_key,
            validation,
        })
    }

    pub fn config(&self) -> &TokenServiceConfig {
        &self.config
    }

    /// Issues a new token pair for a user
    ///
    /// The refresh record is persisted before anything is signed, so a
    /// refresh token never exists without its record.
    ///
    /// # Arguments
    ///
    /// * `user_id` - The user's UUID
    /// * `client` - Request metadata stored with the record for auditing
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - The generated token pair
    /// * `Err(DomainError)` - Persistence or signing failed
    pub async fn issue_tokens(
        &self,
        user_id: Uuid,
        client: &ClientMetadata,
    ) -> Result<TokenPair, DomainError> {
        let record = RefreshTokenRecord::new(user_id, self.config.refresh_ttl_seconds, client);
        let record = self.repository.save(record).await?;

        let access_claims =
            Claims::new_access_token(user_id, self.config.access_ttl_seconds, &self.config.issuer);
        let refresh_claims = Claims::new_refresh_token(&record, &self.config.issuer);

        let access_token = self.encode_jwt(&access_claims)?;
        let refresh_token = self.encode_jwt(&refresh_claims)?;

        tracing::debug!(user_id = %user_id, record_id = %record.id, "Issued token pair");

        Ok(TokenPair {
            access_token,
            refresh_token,
            access_ttl_seconds: self.config.access_ttl_seconds,
            refresh_ttl_seconds: self.config.refresh_ttl_seconds,
            refresh_record_id: record.id,
        })
    }

    /// Encodes claims into a JWT
    pub(crate) fn encode_jwt(&self, claims: &Claims) -> Result<String, DomainError> {
        let header = Header::new(self.config.algorithm);
        encode(&header, claims, &self.encoding_key)
            .map_err(|_| DomainError::Token(TokenError::TokenGenerationFailed))
    }

    /// Decodes a JWT, checking signature, issuer and expiry
    fn decode_jwt(&self, token: &str) -> Result<Claims, DomainError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => DomainError::Token(TokenError::ExpiredToken),
                _ => DomainError::Token(TokenError::InvalidToken),
            })
    }

    /// Verifies an access token and returns the claims
    ///
    /// Refresh tokens are rejected here even though they share the signing
    /// key: they carry a `jti`.
    ///
    /// # Returns
    ///
    /// * `Ok(Claims)` - The decoded claims if valid
    /// * `Err(TokenError::ExpiredToken)` - Signature fine but past `exp`
    /// * `Err(TokenError::InvalidToken)` - Anything else
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, DomainError> {
        let claims = self.decode_jwt(token)?;

        if claims.jti.is_some() || claims.user_id().is_err() {
            return Err(DomainError::Token(TokenError::InvalidToken));
        }

        Ok(claims)
    }

    /// Verifies an access token without surfacing why it failed
    pub fn inspect_access_token(&self, token: &str) -> Option<Claims> {
        match self.verify_access_token(token) {
            Ok(claims) => Some(claims),
            Err(e) => {
                tracing::debug!(error = %e, "Access token rejected");
                None
            }
        }
    }

    /// Rotates a refresh token into a fresh pair
    ///
    /// The presented token is verified, its record looked up by `jti` and
    /// revoked with a conditional write. Only the caller whose write flips the
    /// record gets a new pair; every other caller, concurrent or later, gets
    /// `RevokedOrMissing`.
    ///
    /// # Arguments
    ///
    /// * `refresh_token` - The presented refresh JWT
    /// * `client` - Request metadata for the new record
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - New token pair
    /// * `Err(TokenError)` - Invalid, expired, revoked or missing
    pub async fn rotate_refresh_token(
        &self,
        refresh_token: &str,
        client: &ClientMetadata,
    ) -> Result<TokenPair, DomainError> {
        let claims = self.decode_jwt(refresh_token)?;

        let token_identifier = claims
            .jti
            .as_deref()
            .ok_or(DomainError::Token(TokenError::InvalidToken))?;
        let user_id = claims
            .user_id()
            .map_err(|_| DomainError::Token(TokenError::InvalidToken))?;

        let record = self
            .repository
            .find_by_identifier(token_identifier)
            .await?
            .ok_or(DomainError::Token(TokenError::RevokedOrMissing))?;

        if record.user_id != user_id {
            tracing::warn!(record_id = %record.id, "Refresh token subject does not match record");
            return Err(DomainError::Token(TokenError::InvalidToken));
        }
        if !record.is_active() {
            tracing::info!(record_id = %record.id, "Rejected reuse of revoked refresh token");
            return Err(DomainError::Token(TokenError::RevokedOrMissing));
        }

        if !self.repository.revoke_if_active(token_identifier).await? {
            tracing::info!(record_id = %record.id, "Lost refresh rotation race");
            return Err(DomainError::Token(TokenError::RevokedOrMissing));
        }

        self.issue_tokens(user_id, client).await
    }

    /// Revokes the record behind a refresh token
    ///
    /// Unverifiable, unknown and already revoked tokens are a no-op so logout
    /// stays idempotent. Only storage failures are reported.
    pub async fn revoke_refresh_token(&self, refresh_token: &str) -> Result<(), DomainError> {
        let claims = match self.decode_jwt(refresh_token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring unverifiable refresh token on logout");
                return Ok(());
            }
        };

        let Some(token_identifier) = claims.jti.as_deref() else {
            return Ok(());
        };

        if self.repository.revoke_if_active(token_identifier).await? {
            tracing::info!(user_id = %claims.sub, "Refresh token revoked");
        }

        Ok(())
    }
}
