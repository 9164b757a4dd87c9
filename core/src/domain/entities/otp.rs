//! One-time password challenge for email login.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// An outstanding OTP for an email address
///
/// Only the SHA-256 digest of the code is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpChallenge {
    /// Normalized email the code was sent to
    pub email: String,

    /// Hex-encoded SHA-256 of the code
    pub code_hash: String,

    /// Failed verification attempts so far
    #[serde(default)]
    pub attempts: u32,

    /// When the code stops being accepted
    pub expires_at: DateTime<Utc>,
}

impl OtpChallenge {
    pub fn new(email: impl Into<String>, code: &str, ttl_seconds: u64) -> Self {
        Self {
            email: email.into(),
            code_hash: Self::hash_code(code),
            attempts: 0,
            expires_at: Utc::now() + Duration::seconds(ttl_seconds as i64),
        }
    }

    /// Hashes a code for storage and comparison
    pub fn hash_code(code: &str) -> String {
        hex::encode(Sha256::digest(code.trim().as_bytes()))
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Checks a submitted code against the stored digest
    pub fn matches(&self, code: &str) -> bool {
        Self::hash_code(code) == self.code_hash
    }
}
