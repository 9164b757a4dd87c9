//! Shared error response structure

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Error body returned by every endpoint
///
/// `detail` carries a generic, user-facing message. Internal causes are only
/// ever logged, never serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for client identification
    pub error: String,

    /// Human-readable message
    pub detail: String,

    /// Timestamp when the error occurred
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            detail: detail.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Common error codes used across the application
pub mod error_codes {
    pub const VALIDATION_ERROR: &str = "validation_error";
    pub const INVALID_TOKEN: &str = "invalid_token";
    pub const TOKEN_EXPIRED: &str = "token_expired";
    pub const TOKEN_REVOKED: &str = "token_revoked";
    pub const UNAUTHORIZED: &str = "unauthorized";
    pub const USER_NOT_FOUND: &str = "user_not_found";
    pub const USER_ALREADY_EXISTS: &str = "user_already_exists";
    pub const INVALID_OTP: &str = "invalid_otp";
    pub const SESSION_EXPIRED: &str = "session_expired";
    pub const STATE_MISMATCH: &str = "state_mismatch";
    pub const AUTHENTICATION_FAILED: &str = "authentication_failed";
    pub const NOT_FOUND: &str = "not_found";
    pub const INTERNAL_ERROR: &str = "internal_error";
}
