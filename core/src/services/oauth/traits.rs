//! Collaborator traits for the OAuth flow

use async_trait::async_trait;

use crate::domain::entities::{GoogleIdentity, OAuthHandshakeState};
use crate::errors::DomainError;

/// Key-value store for in-flight OAuth handshakes, keyed by browser session
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store a handshake, replacing any earlier one for the session
    async fn put_handshake(
        &self,
        session_id: &str,
        handshake: &OAuthHandshakeState,
        ttl_seconds: u64,
    ) -> Result<(), DomainError>;

    /// Read a handshake without consuming it
    async fn get_handshake(&self, session_id: &str)
        -> Result<Option<OAuthHandshakeState>, DomainError>;

    /// Atomically remove and return a handshake
    ///
    /// At most one caller receives `Some` for a stored handshake.
    async fn take_handshake(
        &self,
        session_id: &str,
    ) -> Result<Option<OAuthHandshakeState>, DomainError>;
}

/// The identity provider side of the flow
#[async_trait]
pub trait OAuthProvider: Send + Sync {
    /// Exchange an authorization code for an ID token
    ///
    /// # Arguments
    /// * `code` - Authorization code from the callback
    /// * `code_verifier` - PKCE verifier generated at init
    ///
    /// # Returns
    /// * `Ok(String)` - The raw ID token
    async fn exchange_code(&self, code: &str, code_verifier: &str) -> Result<String, DomainError>;

    /// Verify an ID token and extract the identity
    async fn verify_id_token(&self, id_token: &str) -> Result<GoogleIdentity, DomainError>;
}
