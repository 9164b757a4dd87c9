use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use sb_core::domain::entities::OtpChallenge;
use sb_core::errors::DomainError;
use sb_core::services::auth::OtpStore;

/// OTP challenges keyed by email; expiry is carried by the challenge itself
///
/// Expired challenges are purged whenever a new one is stored.
#[derive(Default)]
pub struct InMemoryOtpStore {
    challenges: RwLock<HashMap<String, OtpChallenge>>,
}

impl InMemoryOtpStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OtpStore for InMemoryOtpStore {
    async fn store(&self, challenge: &OtpChallenge, _ttl_seconds: u64) -> Result<(), DomainError> {
        let mut fresh = challenge.clone();
        fresh.attempts = 0;

        let mut challenges = self.challenges.write().await;
        challenges.retain(|_, c| !c.is_expired());
        challenges.insert(challenge.email.clone(), fresh);
        Ok(())
    }

    async fn load(&self, email: &str) -> Result<Option<OtpChallenge>, DomainError> {
        Ok(self.challenges.read().await.get(email).cloned())
    }

    async fn register_attempt(&self, email: &str) -> Result<u32, DomainError> {
        let mut challenges = self.challenges.write().await;
        Ok(challenges
            .get_mut(email)
            .map(|c| {
                c.attempts += 1;
                c.attempts
            })
            .unwrap_or(0))
    }

    async fn take(&self, email: &str) -> Result<Option<OtpChallenge>, DomainError> {
        Ok(self.challenges.write().await.remove(email))
    }
}
