//! Business services containing domain logic and use cases.

pub mod auth;
pub mod health;
pub mod oauth;
pub mod token;

pub use auth::{AuthService, AuthServiceConfig, Mailer, OtpStore};
pub use health::HealthCheck;
pub use oauth::{GoogleOAuthService, OAuthProvider, OAuthServiceConfig, SessionStore};
pub use token::{TokenService, TokenServiceConfig};
