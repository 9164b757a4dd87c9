//! Google OAuth login module
//!
//! Authorization code flow with PKCE. The handshake state lives in a
//! [`SessionStore`] between the redirect and the callback and is consumed
//! before the code is exchanged.

mod config;
pub mod pkce;
mod service;
mod traits;

#[cfg(test)]
mod tests;

pub use config::OAuthServiceConfig;
pub use service::GoogleOAuthService;
pub use traits::{OAuthProvider, SessionStore};
