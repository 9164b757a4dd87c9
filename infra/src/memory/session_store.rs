use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use sb_core::domain::entities::OAuthHandshakeState;
use sb_core::errors::DomainError;
use sb_core::services::oauth::SessionStore;

/// OAuth handshakes with per-entry expiry
///
/// Expired entries are purged whenever a new handshake is stored.
#[derive(Default)]
pub struct InMemorySessionStore {
    entries: RwLock<HashMap<String, (OAuthHandshakeState, Instant)>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn put_handshake(
        &self,
        session_id: &str,
        handshake: &OAuthHandshakeState,
        ttl_seconds: u64,
    ) -> Result<(), DomainError> {
        let now = Instant::now();
        let expires_at = now + Duration::from_secs(ttl_seconds);

        let mut entries = self.entries.write().await;
        entries.retain(|_, (_, expiry)| now < *expiry);
        entries.insert(session_id.to_string(), (handshake.clone(), expires_at));
        Ok(())
    }

    async fn get_handshake(
        &self,
        session_id: &str,
    ) -> Result<Option<OAuthHandshakeState>, DomainError> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(session_id)
            .filter(|(_, expires_at)| Instant::now() < *expires_at)
            .map(|(handshake, _)| handshake.clone()))
    }

    async fn take_handshake(
        &self,
        session_id: &str,
    ) -> Result<Option<OAuthHandshakeState>, DomainError> {
        let mut entries = self.entries.write().await;
        Ok(entries
            .remove(session_id)
            .filter(|(_, expires_at)| Instant::now() < *expires_at)
            .map(|(handshake, _)| handshake))
    }
}
