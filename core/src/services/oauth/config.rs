//! Configuration for the Google OAuth service

use sb_shared::config::GoogleOAuthConfig;

/// Settings needed to build the authorization redirect
#[derive(Debug, Clone)]
pub struct OAuthServiceConfig {
    pub client_id: String,
    pub redirect_uri: String,
    pub authorization_endpoint: String,
    pub scopes: Vec<String>,
    /// Lifetime of the stored handshake in seconds
    pub handshake_ttl_seconds: u64,
}

impl Default for OAuthServiceConfig {
    fn default() -> Self {
        Self::from(&GoogleOAuthConfig::default())
    }
}

impl From<&GoogleOAuthConfig> for OAuthServiceConfig {
    fn from(google: &GoogleOAuthConfig) -> Self {
        Self {
            client_id: google.client_id.clone(),
            redirect_uri: google.redirect_uri.clone(),
            authorization_endpoint: google.authorization_endpoint.clone(),
            scopes: google.scopes.clone(),
            handshake_ttl_seconds: google.handshake_ttl_seconds,
        }
    }
}
