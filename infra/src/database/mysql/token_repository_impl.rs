//! MySQL implementation of the TokenRepository trait.
//!
//! Refresh token records are stored in `refresh_tokens` and looked up by
//! their opaque identifier. Revocation is a single conditional `UPDATE`, so
//! concurrent rotations of the same token have exactly one winner.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use sb_core::domain::entities::token::RefreshTokenRecord;
use sb_core::errors::DomainError;
use sb_core::repositories::TokenRepository;

use super::{db_error, is_unique_violation};

/// MySQL implementation of TokenRepository
pub struct MySqlTokenRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlTokenRepository {
    /// Create a new MySQL token repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to RefreshTokenRecord entity
    fn row_to_record(row: &sqlx::mysql::MySqlRow) -> Result<RefreshTokenRecord, DomainError> {
        let field = |name: &str, e: sqlx::Error| DomainError::Internal {
            message: format!("Failed to get {}: {}", name, e),
        };

        let id: String = row.try_get("id").map_err(|e| field("id", e))?;
        let user_id: String = row.try_get("user_id").map_err(|e| field("user_id", e))?;

        Ok(RefreshTokenRecord {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Internal {
                message: format!("Invalid token UUID: {}", e),
            })?,
            token_identifier: row
                .try_get("token_identifier")
                .map_err(|e| field("token_identifier", e))?,
            user_id: Uuid::parse_str(&user_id).map_err(|e| DomainError::Internal {
                message: format!("Invalid user UUID: {}", e),
            })?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| field("created_at", e))?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| field("expires_at", e))?,
            revoked: row.try_get("revoked").map_err(|e| field("revoked", e))?,
            ip_address: row.try_get("ip_address").map_err(|e| field("ip_address", e))?,
            user_agent: row.try_get("user_agent").map_err(|e| field("user_agent", e))?,
        })
    }
}

#[async_trait]
impl TokenRepository for MySqlTokenRepository {
    async fn save(&self, record: RefreshTokenRecord) -> Result<RefreshTokenRecord, DomainError> {
        let query = r#"
            INSERT INTO refresh_tokens (
                id, token_identifier, user_id, created_at, expires_at, revoked,
                ip_address, user_agent
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(record.id.to_string())
            .bind(&record.token_identifier)
            .bind(record.user_id.to_string())
            .bind(record.created_at)
            .bind(record.expires_at)
            .bind(record.revoked)
            .bind(&record.ip_address)
            .bind(&record.user_agent)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DomainError::Internal {
                        message: "Duplicate refresh token identifier".to_string(),
                    }
                } else {
                    db_error("Failed to save refresh token", e)
                }
            })?;

        Ok(record)
    }

    async fn find_by_identifier(
        &self,
        token_identifier: &str,
    ) -> Result<Option<RefreshTokenRecord>, DomainError> {
        let query = r#"
            SELECT id, token_identifier, user_id, created_at, expires_at, revoked,
                   ip_address, user_agent
            FROM refresh_tokens
            WHERE token_identifier = ?
        "#;

        let row = sqlx::query(query)
            .bind(token_identifier)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find refresh token", e))?;

        row.as_ref().map(Self::row_to_record).transpose()
    }

    async fn revoke_if_active(&self, token_identifier: &str) -> Result<bool, DomainError> {
        let query = r#"
            UPDATE refresh_tokens
            SET revoked = TRUE
            WHERE token_identifier = ? AND revoked = FALSE
        "#;

        let result = sqlx::query(query)
            .bind(token_identifier)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to revoke refresh token", e))?;

        Ok(result.rows_affected() == 1)
    }
}
