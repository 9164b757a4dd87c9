//! Redis-backed store for OTP challenges
//!
//! The challenge is kept as JSON under `otp:challenge:{email}`. Attempts are
//! counted separately under `otp:attempts:{email}` with `INCR`, which the
//! service calls before comparing a code, so each concurrent guess gets its
//! own slot.

use async_trait::async_trait;
use sb_core::domain::entities::OtpChallenge;
use sb_core::errors::DomainError;
use sb_core::services::auth::OtpStore;

use super::redis_client::RedisClient;
use crate::InfrastructureError;

#[derive(Clone)]
pub struct RedisOtpStore {
    client: RedisClient,
    ttl_seconds: u64,
}

impl RedisOtpStore {
    /// # Arguments
    /// * `client` - Shared Redis client
    /// * `ttl_seconds` - Lifetime of the attempt counter, matching the code TTL
    pub fn new(client: RedisClient, ttl_seconds: u64) -> Self {
        Self {
            client,
            ttl_seconds,
        }
    }

    pub(crate) fn challenge_key(email: &str) -> String {
        format!("otp:challenge:{}", email)
    }

    pub(crate) fn attempts_key(email: &str) -> String {
        format!("otp:attempts:{}", email)
    }

    fn decode(raw: Option<String>) -> Result<Option<OtpChallenge>, DomainError> {
        raw.map(|json| serde_json::from_str(&json).map_err(InfrastructureError::from))
            .transpose()
            .map_err(DomainError::from)
    }
}

#[async_trait]
impl OtpStore for RedisOtpStore {
    async fn store(&self, challenge: &OtpChallenge, ttl_seconds: u64) -> Result<(), DomainError> {
        let json = serde_json::to_string(challenge).map_err(InfrastructureError::from)?;
        self.client
            .delete(&Self::attempts_key(&challenge.email))
            .await?;
        self.client
            .set_with_expiry(&Self::challenge_key(&challenge.email), &json, ttl_seconds)
            .await?;
        Ok(())
    }

    async fn load(&self, email: &str) -> Result<Option<OtpChallenge>, DomainError> {
        let raw = self.client.get(&Self::challenge_key(email)).await?;
        let Some(mut challenge) = Self::decode(raw)? else {
            return Ok(None);
        };

        if let Some(attempts) = self.client.get(&Self::attempts_key(email)).await? {
            challenge.attempts = attempts.parse().unwrap_or(0);
        }
        Ok(Some(challenge))
    }

    async fn register_attempt(&self, email: &str) -> Result<u32, DomainError> {
        let count = self
            .client
            .increment(&Self::attempts_key(email), Some(self.ttl_seconds))
            .await?;
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    async fn take(&self, email: &str) -> Result<Option<OtpChallenge>, DomainError> {
        let raw = self
            .client
            .get_and_delete(&Self::challenge_key(email))
            .await?;
        self.client.delete(&Self::attempts_key(email)).await?;
        Self::decode(raw)
    }
}
