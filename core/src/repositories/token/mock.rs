//! Mock implementation of TokenRepository for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::token::RefreshTokenRecord;
use crate::errors::DomainError;

use super::trait_::TokenRepository;

/// Mock token repository for testing
///
/// Keyed by token identifier. `revoke_if_active` runs under the write lock so
/// concurrent callers see a single winner.
pub struct MockTokenRepository {
    records: Arc<RwLock<HashMap<String, RefreshTokenRecord>>>,
    fail_saves: AtomicBool,
}

impl MockTokenRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
            fail_saves: AtomicBool::new(false),
        }
    }

    /// Make subsequent `save` calls fail with an internal error
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Snapshot of every stored record
    pub async fn all(&self) -> Vec<RefreshTokenRecord> {
        self.records.read().await.values().cloned().collect()
    }

    /// Overwrite a stored record, e.g. to backdate its expiry
    pub async fn put(&self, record: RefreshTokenRecord) {
        self.records
            .write()
            .await
            .insert(record.token_identifier.clone(), record);
    }
}

impl Default for MockTokenRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenRepository for MockTokenRepository {
    async fn save(&self, record: RefreshTokenRecord) -> Result<RefreshTokenRecord, DomainError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(DomainError::Internal {
                message: "token store unavailable".to_string(),
            });
        }

        let mut records = self.records.write().await;
        if records.contains_key(&record.token_identifier) {
            return Err(DomainError::Internal {
                message: "duplicate token identifier".to_string(),
            });
        }

        records.insert(record.token_identifier.clone(), record.clone());
        Ok(record)
    }

    async fn find_by_identifier(
        &self,
        token_identifier: &str,
    ) -> Result<Option<RefreshTokenRecord>, DomainError> {
        let records = self.records.read().await;
        Ok(records.get(token_identifier).cloned())
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
