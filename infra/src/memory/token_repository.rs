use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use sb_core::domain::entities::token::RefreshTokenRecord;
use sb_core::errors::DomainError;
use sb_core::repositories::TokenRepository;

/// Refresh token records keyed by token identifier
#[derive(Default)]
pub struct InMemoryTokenRepository {
    records: RwLock<HashMap<String, RefreshTokenRecord>>,
}

impl InMemoryTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Every record issued to a user, revoked or not
    pub async fn records_for_user(&self, user_id: Uuid) -> Vec<RefreshTokenRecord> {
        self.records
            .read()
            .await
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl TokenRepository for InMemoryTokenRepository {
    async fn save(&self, record: RefreshTokenRecord) -> Result<RefreshTokenRecord, DomainError> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.token_identifier) {
            return Err(DomainError::Internal {
                message: "Duplicate refresh token identifier".to_string(),
            });
        }
        records.insert(record.token_identifier.clone(), record.clone());
        Ok(record)
    }

    async fn find_by_identifier(
        &self,
        token_identifier: &str,
    ) -> Result<Option<RefreshTokenRecord>, DomainError> {
        Ok(self.records.read().await.get(token_identifier).cloned())
    }

    async fn revoke_if_active(&self, token_identifier: &str) -> Result<bool, DomainError> {
        let mut records = self.records.write().await;
        match records.get_mut(token_identifier) {
            Some(record) if !record.revoked => {
                record.revoke();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
