//! Redis-backed store for in-flight OAuth handshakes

use async_trait::async_trait;
use sb_core::domain::entities::OAuthHandshakeState;
use sb_core::errors::DomainError;
use sb_core::services::oauth::SessionStore;

use super::redis_client::RedisClient;
use crate::InfrastructureError;

/// Stores handshakes as JSON under `oauth:handshake:{session_id}`
#[derive(Clone)]
pub struct RedisSessionStore {
    client: RedisClient,
}

impl RedisSessionStore {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    pub(crate) fn key(session_id: &str) -> String {
        format!("oauth:handshake:{}", session_id)
    }

    fn decode(raw: Option<String>) -> Result<Option<OAuthHandshakeState>, DomainError> {
        raw.map(|json| serde_json::from_str(&json).map_err(InfrastructureError::from))
            .transpose()
            .map_err(DomainError::from)
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn put_handshake(
        &self,
        session_id: &str,
        handshake: &OAuthHandshakeState,
        ttl_seconds: u64,
    ) -> Result<(), DomainError> {
        let json = serde_json::to_string(handshake).map_err(InfrastructureError::from)?;
        self.client
            .set_with_expiry(&Self::key(session_id), &json, ttl_seconds)
            .await?;
        Ok(())
    }

    async fn get_handshake(
        &self,
        session_id: &str,
    ) -> Result<Option<OAuthHandshakeState>, DomainError> {
        let raw = self.client.get(&Self::key(session_id)).await?;
        Self::decode(raw)
    }

    async fn take_handshake(
        &self,
        session_id: &str,
    ) -> Result<Option<OAuthHandshakeState>, DomainError> {
        let raw = self.client.get_and_delete(&Self::key(session_id)).await?;
        Self::decode(raw)
    }
}
