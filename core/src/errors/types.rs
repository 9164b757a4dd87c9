//! Error types for the login flows and the token lifecycle
//!
//! Display strings are safe to show to end users; the presentation layer
//! still chooses the final HTTP message.

use thiserror::Error;

/// Login-flow errors (OTP and Google OAuth)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("User not found")]
    UserNotFound,

    #[error("User already exists")]
    UserAlreadyExists,

    #[error("Invalid OTP")]
    InvalidOtp,

    /// No handshake state is stored for this browser session, or it was already used
    #[error("Session expired")]
    SessionExpired,

    /// The `state` returned by the provider differs from the stored one
    #[error("Invalid state parameter")]
    StateMismatch,

    /// The identity provider or mailer failed or returned something unusable
    #[error("Authentication failed")]
    UpstreamFailure,
}

/// Token lifecycle errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Bad signature, malformed token or missing claims
    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    ExpiredToken,

    /// The refresh record is unknown, already revoked, or lost a concurrent rotation
    #[error("Refresh token revoked or not found")]
    RevokedOrMissing,

    #[error("Token generation failed")]
    TokenGenerationFailed,
}
