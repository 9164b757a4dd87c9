//! Google OAuth client configuration

use serde::{Deserialize, Serialize};

/// Google OAuth 2.0 client settings
///
/// Endpoint URLs default to Google's published values and are only overridden
/// in tests.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GoogleOAuthConfig {
    /// OAuth client ID, also the expected `aud` of ID tokens
    pub client_id: String,

    /// OAuth client secret
    pub client_secret: String,

    /// Callback URL registered with Google
    pub redirect_uri: String,

    /// Where the browser lands after a successful login
    pub post_login_redirect: String,

    /// Authorization endpoint
    pub authorization_endpoint: String,

    /// Token endpoint
    pub token_endpoint: String,

    /// JSON Web Key Set used to verify ID tokens
    pub jwks_uri: String,

    /// Requested scopes
    pub scopes: Vec<String>,

    /// Lifetime of the stored handshake state in seconds
    pub handshake_ttl_seconds: u64,

    /// Timeout for calls to Google in seconds
    pub request_timeout_seconds: u64,
}

impl Default for GoogleOAuthConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            redirect_uri: String::from("http://localhost:8080/api/v1/auth/google/callback"),
            post_login_redirect: String::from("http://localhost:3000/dashboard"),
            authorization_endpoint: String::from("https://accounts.google.com/o/oauth2/v2/auth"),
            token_endpoint: String::from("https://oauth2.googleapis.com/token"),
            jwks_uri: String::from("https://www.googleapis.com/oauth2/v3/certs"),
            scopes: vec![
                String::from("openid"),
                String::from("email"),
                String::from("profile"),
            ],
            handshake_ttl_seconds: 600,
            request_timeout_seconds: 10,
        }
    }
}

impl GoogleOAuthConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            client_id: std::env::var("GOOGLE_CLIENT_ID").unwrap_or(defaults.client_id),
            client_secret: std::env::var("GOOGLE_CLIENT_SECRET").unwrap_or(defaults.client_secret),
            redirect_uri: std::env::var("GOOGLE_REDIRECT_URI").unwrap_or(defaults.redirect_uri),
            post_login_redirect: std::env::var("GOOGLE_REDIRECT_DASHBOARD_URI")
                .unwrap_or(defaults.post_login_redirect),
            ..defaults
        }
    }

    /// Whether a client has been configured at all
    pub fn is_configured(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }
}
