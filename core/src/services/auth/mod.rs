//! Authentication service module
//!
//! This module provides:
//! - Email one-time password login
//! - Refresh token rotation and logout on behalf of the HTTP layer
//! - Lookup of the currently authenticated user

mod config;
mod service;
mod traits;

#[cfg(test)]
mod tests;

pub use config::AuthServiceConfig;
pub use service::AuthService;
pub use traits::{Mailer, OtpStore};
