//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `auth` - JWT signing and OTP settings
//! - `cookie` - Attributes of the auth and session cookies
//! - `oauth` - Google OAuth client settings
//! - `cache` - Redis connection settings
//! - `database` - MySQL connection and pool settings
//! - `environment` - Environment detection and logging configuration
//! - `mail` - OTP delivery backend and SMTP relay
//! - `server` - HTTP server and CORS settings
//! - `storage` - Backing store selection

pub mod auth;
pub mod cache;
pub mod cookie;
pub mod database;
pub mod environment;
pub mod mail;
pub mod oauth;
pub mod server;
pub mod storage;

use serde::{Deserialize, Serialize};

pub use auth::{AuthConfig, JwtConfig, OtpConfig};
pub use cache::CacheConfig;
pub use cookie::CookieConfig;
pub use database::DatabaseConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use mail::{MailBackend, MailConfig, SmtpConfig};
pub use oauth::GoogleOAuthConfig;
pub use server::{CorsConfig, ServerConfig};
pub use storage::StorageBackend;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Cache configuration
    pub cache: CacheConfig,

    /// Authentication configuration
    pub auth: AuthConfig,

    /// Auth cookie attributes
    pub cookie: CookieConfig,

    /// Google OAuth client
    pub google: GoogleOAuthConfig,

    /// OTP mail delivery
    #[serde(default)]
    pub mail: MailConfig,

    /// CORS configuration
    #[serde(default)]
    pub cors: CorsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Backing stores
    #[serde(default)]
    pub storage: StorageBackend,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            cache: CacheConfig::default(),
            auth: AuthConfig::default(),
            cookie: CookieConfig::for_environment(env),
            google: GoogleOAuthConfig::default(),
            mail: MailConfig::default(),
            cors: CorsConfig::default(),
            logging: LoggingConfig::for_environment(env),
            storage: StorageBackend::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Call `dotenvy::dotenv()` beforehand to pick up a local `.env` file.
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        let mut logging = LoggingConfig::for_environment(environment);
        if let Ok(level) = std::env::var("RUST_LOG") {
            logging.level = level;
        }

        Self {
            environment,
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            cache: CacheConfig::from_env(),
            auth: AuthConfig::from_env(),
            cookie: CookieConfig::from_env(environment),
            google: GoogleOAuthConfig::from_env(),
            mail: MailConfig::from_env(),
            cors: CorsConfig::from_env(),
            logging,
            storage: StorageBackend::from_env(),
        }
    }

    /// Validate configuration for the current environment
    ///
    /// Production refuses to start with the built-in signing secret or
    /// without a real mail relay.
    pub fn validate(&self) -> Result<(), String> {
        if self.auth.jwt.secret.is_empty() {
            return Err("JWT_SECRET_KEY must not be empty".to_string());
        }

        if self.auth.jwt.is_using_default_secret() {
            if self.environment.is_production() {
                return Err("JWT_SECRET_KEY must be set in production".to_string());
            }
            tracing::warn!("Using the default JWT signing secret; set JWT_SECRET_KEY");
        }

        if self.auth.jwt.access_token_expiry <= 0 || self.auth.jwt.refresh_token_expiry <= 0 {
            return Err("Token lifetimes must be positive".to_string());
        }

        if self.environment.is_production() && !self.cookie.secure {
            return Err("Auth cookies must be Secure in production".to_string());
        }

        if self.environment.is_production() && self.storage == StorageBackend::Memory {
            return Err("In-memory storage is not allowed in production".to_string());
        }

        match self.mail.backend {
            MailBackend::Log if self.environment.is_production() => {
                return Err("MAIL_BACKEND=log is not allowed in production".to_string());
            }
            MailBackend::Smtp if !self.mail.smtp.is_configured() => {
                return Err("SMTP_HOST and SMTP_FROM must be set for SMTP mail".to_string());
            }
            _ => {}
        }

        Ok(())
    }
}
