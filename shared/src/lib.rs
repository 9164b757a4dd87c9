//! Shared utilities and common types for the SaaSBoard auth backend
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types loaded from the environment
//! - The error body returned by every endpoint
//! - Email helpers used by the OTP login flow

pub mod config;
pub mod errors;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, CacheConfig, CookieConfig, DatabaseConfig, Environment,
    GoogleOAuthConfig, JwtConfig, LoggingConfig, MailBackend, MailConfig, OtpConfig, ServerConfig,
    SmtpConfig, StorageBackend,
};
pub use errors::{error_codes, ErrorResponse};
pub use utils::validation;
