//! Token service module for JWT management
//!
//! This module handles all token-related operations:
//! - Issuing access/refresh token pairs backed by a persisted refresh record
//! - Verifying access tokens
//! - Rotating refresh tokens with single-use revocation
//! - Revoking refresh tokens on logout

mod config;
mod service;

#[cfg(test)]
mod tests;

pub use config::TokenServiceConfig;
pub use service::TokenService;
