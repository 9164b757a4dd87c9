//! # SaaSBoard Core
//!
//! Core business logic and domain layer for the SaaSBoard auth backend.
//! This crate contains the token lifecycle (issue, verify, rotate, revoke),
//! the email OTP and Google OAuth login flows, the repository and collaborator
//! traits they depend on, and the error types shared by every layer.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
