//! OAuth handshake entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Transient state kept in the session store between the redirect to Google
/// and the callback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthHandshakeState {
    /// Anti-CSRF value echoed back by the provider
    pub state: String,

    /// PKCE code verifier, sent with the code exchange
    pub code_verifier: String,

    /// When the handshake started
    pub created_at: DateTime<Utc>,
}

impl OAuthHandshakeState {
    pub fn new(state: String, code_verifier: String) -> Self {
        Self {
            state,
            code_verifier,
            created_at: Utc::now(),
        }
    }
}

/// Identity extracted from a verified Google ID token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoogleIdentity {
    /// Google account ID (`sub`)
    pub subject: String,

    /// Email address, if the `email` scope was granted
    pub email: Option<String>,

    /// Whether Google has verified the email
    pub email_verified: bool,

    /// Display name
    pub name: Option<String>,

    /// Profile picture URL
    pub picture: Option<String>,
}
