//! Configuration for the token service

use jsonwebtoken::Algorithm;
use sb_shared::config::JwtConfig;

/// Configuration for the token service
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// Shared HMAC signing secret
    pub jwt_secret: String,
    /// JWT signing algorithm
    pub algorithm: Algorithm,
    /// Access token lifetime in seconds
    pub access_ttl_seconds: i64,
    /// Refresh token lifetime in seconds
    pub refresh_ttl_seconds: i64,
    /// Value of the `iss` claim, checked on verification
    pub issuer: String,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self::from(&JwtConfig::default())
    }
}

impl From<&JwtConfig> for TokenServiceConfig {
    fn from(jwt: &JwtConfig) -> Self {
        Self {
            jwt_secret: jwt.secret.clone(),
            algorithm: Algorithm::HS256,
            access_ttl_seconds: jwt.access_token_expiry,
            refresh_ttl_seconds: jwt.refresh_token_expiry,
            issuer: jwt.issuer.clone(),
        }
    }
}

impl TokenServiceConfig {
    /// Creates a config with the given secret and default lifetimes
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: secret.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_jwt_config() {
        let config = TokenServiceConfig::default();
        assert_eq!(config.access_ttl_seconds, 900);
        assert_eq!(config.refresh_ttl_seconds, 2_592_000);
        assert_eq!(config.algorithm, Algorithm::HS256);
        assert_eq!(config.issuer, "saasboard");
    }

    #[test]
    fn test_from_jwt_config() {
        let jwt = JwtConfig::new("s3cret")
            .with_access_expiry_seconds(60)
            .with_refresh_expiry_seconds(120);
        let config = TokenServiceConfig::from(&jwt);
        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.access_ttl_seconds, 60);
        assert_eq!(config.refresh_ttl_seconds, 120);
    }
}
