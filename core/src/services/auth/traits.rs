//! Collaborator traits for the OTP login flow

use async_trait::async_trait;

use crate::domain::entities::OtpChallenge;
use crate::errors::DomainError;

/// Short-lived storage for outstanding OTP challenges, keyed by email
#[async_trait]
pub trait OtpStore: Send + Sync {
    /// Store a challenge, replacing any previous one and resetting attempts
    async fn store(&self, challenge: &OtpChallenge, ttl_seconds: u64) -> Result<(), DomainError>;

    /// Load the current challenge without consuming it
    async fn load(&self, email: &str) -> Result<Option<OtpChallenge>, DomainError>;

    /// Atomically count one verification attempt and return the new total
    ///
    /// Returns 0 when no challenge is stored.
    async fn register_attempt(&self, email: &str) -> Result<u32, DomainError>;

    /// Atomically remove and return the challenge
    ///
    /// Returns `None` when another caller already took it.
    async fn take(&self, email: &str) -> Result<Option<OtpChallenge>, DomainError>;
}

/// Delivers login codes to users
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_otp(&self, email: &str, code: &str) -> Result<(), DomainError>;
}
