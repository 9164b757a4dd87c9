//! Token entities for JWT-based authentication.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::ClientMetadata;

/// Claims structure for JWT payload
///
/// Access tokens carry `{sub, iat, exp, iss}`. Refresh tokens add `jti`, the
/// identifier of their persisted [`RefreshTokenRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// Refresh token identifier; absent on access tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

impl Claims {
    /// Creates new claims for an access token
    ///
    /// # Arguments
    ///
    /// * `user_id` - The user's UUID
    /// * `ttl_seconds` - Lifetime of the token
    /// * `issuer` - Value of the `iss` claim
    pub fn new_access_token(user_id: Uuid, ttl_seconds: i64, issuer: &str) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(ttl_seconds)).timestamp(),
            iss: issuer.to_string(),
            jti: None,
        }
    }

    /// Creates new claims for a refresh token bound to a persisted record
    ///
    /// # Arguments
    ///
    /// * `record` - The refresh record whose identifier becomes `jti`
    /// * `issuer` - Value of the `iss` claim
    pub fn new_refresh_token(record: &RefreshTokenRecord, issuer: &str) -> Self {
        Self {
            sub: record.user_id.to_string(),
            iat: record.created_at.timestamp(),
            exp: record.expires_at.timestamp(),
            iss: issuer.to_string(),
            jti: Some(record.token_identifier.clone()),
        }
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Gets the user ID from the claims
    ///
    /// # Returns
    ///
    /// `Ok(Uuid)` if the subject can be parsed as a UUID, `Err` otherwise
    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }
}

/// Refresh token record stored in the database
///
/// Records are never deleted. Rotation and logout flip `revoked`, which is a
/// one-way transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTokenRecord {
    /// Unique identifier for the record
    pub id: Uuid,

    /// Random opaque identifier embedded in the refresh JWT as `jti`
    pub token_identifier: String,

    /// User ID this token belongs to
    pub user_id: Uuid,

    /// Timestamp when the token was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the token expires
    pub expires_at: DateTime<Utc>,

    /// Whether the token has been revoked
    pub revoked: bool,

    /// Client IP at issuance, for auditing only
    pub ip_address: Option<String>,

    /// Client user agent at issuance, for auditing only
    pub user_agent: Option<String>,
}

impl RefreshTokenRecord {
    /// Creates a new active record with a fresh random identifier
    ///
    /// # Arguments
    ///
    /// * `user_id` - The user's UUID
    /// * `ttl_seconds` - Lifetime of the refresh token
    /// * `client` - Request metadata captured for the audit trail
    pub fn new(user_id: Uuid, ttl_seconds: i64, client: &ClientMetadata) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            token_identifier: Uuid::new_v4().to_string(),
            user_id,
            created_at: now,
            expires_at: now + Duration::seconds(ttl_seconds),
            revoked: false,
            ip_address: client.ip_address.clone(),
            user_agent: client.user_agent.clone(),
        }
    }

    /// Checks if the refresh token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// A record authorizes rotation only while unrevoked and unexpired
    pub fn is_active(&self) -> bool {
        !self.revoked && !self.is_expired()
    }

    /// Revokes the record
    pub fn revoke(&mut self) {
        self.revoked = true;
    }
}

/// Token pair returned by the issuer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// JWT access token
    pub access_token: String,

    /// JWT refresh token
    pub refresh_token: String,

    /// Access token lifetime in seconds
    pub access_ttl_seconds: i64,

    /// Refresh token lifetime in seconds
    pub refresh_ttl_seconds: i64,

    /// ID of the persisted refresh record
    pub refresh_record_id: Uuid,
}
