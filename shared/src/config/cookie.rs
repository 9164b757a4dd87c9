//! Auth cookie configuration

use serde::{Deserialize, Serialize};

use super::environment::Environment;

/// Attributes applied to the `access_token`, `refresh_token` and `session_id` cookies
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CookieConfig {
    /// Cookie domain; host-only when unset
    pub domain: Option<String>,

    /// Cookie path
    pub path: String,

    /// Send only over HTTPS
    pub secure: bool,

    /// Name of the browser session cookie used during the OAuth redirect
    pub session_cookie_name: String,

    /// Lifetime of the session cookie in seconds
    pub session_ttl_seconds: i64,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            domain: None,
            path: String::from("/"),
            secure: false,
            session_cookie_name: String::from("session_id"),
            session_ttl_seconds: 1209600, // 2 weeks
        }
    }
}

impl CookieConfig {
    /// Defaults for an environment: `Secure` is on in production
    pub fn for_environment(env: Environment) -> Self {
        Self {
            secure: env.is_production(),
            ..Default::default()
        }
    }

    /// Create from environment variables
    pub fn from_env(env: Environment) -> Self {
        let mut config = Self::for_environment(env);
        config.domain = std::env::var("COOKIE_DOMAIN")
            .ok()
            .filter(|d| !d.trim().is_empty());
        if let Some(secure) = std::env::var("COOKIE_SECURE")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.secure = secure;
        }
        config
    }
}
