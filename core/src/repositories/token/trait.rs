//! Token repository trait defining the interface for refresh token persistence.

use async_trait::async_trait;

use crate::domain::entities::token::RefreshTokenRecord;
use crate::errors::DomainError;

/// Repository trait for refresh token records
///
/// Records are looked up by their opaque `token_identifier`, which is the
/// `jti` claim of the refresh JWT. Records are never deleted.
///
/// # Concurrency
/// `revoke_if_active` must be atomic: when several callers race to revoke the
/// same record, exactly one of them observes `true`.
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Persist a new refresh token record
    ///
    /// # Arguments
    /// * `record` - The record to persist
    ///
    /// # Returns
    /// * `Ok(RefreshTokenRecord)` - The saved record
    /// * `Err(DomainError)` - Save failed (e.g., duplicate identifier)
    async fn save(&self, record: RefreshTokenRecord) -> Result<RefreshTokenRecord, DomainError>;

    /// Find a record by its token identifier
    ///
    /// # Returns
    /// * `Ok(Some(RefreshTokenRecord))` - Record found, revoked or not
    /// * `Ok(None)` - No record with this identifier
    /// * `Err(DomainError)` - Database error occurred
    async fn find_by_identifier(
        &self,
        token_identifier: &str,
    ) -> Result<Option<RefreshTokenRecord>, DomainError>;

    /// Atomically flip `revoked` from false to true
    ///
    /// # Returns
    /// * `Ok(true)` - This call performed the revocation
    /// * `Ok(false)` - The record was already revoked or does not exist
    /// * `Err(DomainError)` - Database error occurred
    async fn revoke_if_active(&self, token_identifier: &str) -> Result<bool, DomainError>;
}
