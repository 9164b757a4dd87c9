//! # Infrastructure Layer
//!
//! Concrete implementations of the collaborators the core services depend
//! on.
//!
//! ## Architecture
//!
//! - **Database**: MySQL repositories using SQLx
//! - **Cache**: Redis client, OAuth session store and OTP store
//! - **OAuth**: Google token exchange and ID token verification over HTTP
//! - **Mail**: OTP delivery over SMTP, or to the log in development
//! - **Memory**: in-process stores for development and tests

use sb_core::errors::DomainError;

/// Database module - MySQL implementations using SQLx
pub mod database;

/// Cache module - Redis client and stores built on it
pub mod cache;

pub mod mail;
pub mod memory;
pub mod oauth;

/// Configuration types consumed by infrastructure components
pub mod config {
    pub use sb_shared::config::{CacheConfig, DatabaseConfig, GoogleOAuthConfig};
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Stored data could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Mail delivery error
    #[error("Mail error: {0}")]
    Mail(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// General infrastructure error
    #[error("Infrastructure error: {0}")]
    General(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        DomainError::Internal {
            message: err.to_string(),
        }
    }
}
