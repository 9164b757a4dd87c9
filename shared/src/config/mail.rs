//! OTP mail delivery configuration

use serde::{Deserialize, Serialize};
use std::env;

/// How login codes are delivered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MailBackend {
    /// Write codes to the log (development only)
    #[default]
    Log,
    /// Send email through an SMTP relay
    Smtp,
}

impl std::str::FromStr for MailBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "log" => Ok(MailBackend::Log),
            "smtp" => Ok(MailBackend::Smtp),
            _ => Err(format!("Invalid mail backend: {}", s)),
        }
    }
}

/// SMTP relay settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SmtpConfig {
    /// Relay host name
    pub host: String,

    /// Relay port (587 for STARTTLS)
    #[serde(default = "default_smtp_port")]
    pub port: u16,

    /// Login user name
    pub username: String,

    /// Login password
    #[serde(skip_serializing)]
    pub password: String,

    /// Sender address
    pub from_email: String,

    /// Sender display name
    #[serde(default = "default_from_name")]
    pub from_name: String,

    /// Upgrade the connection with STARTTLS
    #[serde(default = "default_starttls")]
    pub starttls: bool,

    /// Timeout for one delivery in seconds
    #[serde(default = "default_smtp_timeout")]
    pub timeout_seconds: u64,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: default_smtp_port(),
            username: String::new(),
            password: String::new(),
            from_email: String::new(),
            from_name: default_from_name(),
            starttls: default_starttls(),
            timeout_seconds: default_smtp_timeout(),
        }
    }
}

impl SmtpConfig {
    /// Create from `SMTP_*` environment variables
    ///
    /// `SMTP_FROM` falls back to the login user name, the usual setup for
    /// hosted relays.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let username = env::var("SMTP_USERNAME").unwrap_or(defaults.username);

        Self {
            host: env::var("SMTP_HOST").unwrap_or(defaults.host),
            port: env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            password: env::var("SMTP_PASSWORD").unwrap_or(defaults.password),
            from_email: env::var("SMTP_FROM").unwrap_or_else(|_| username.clone()),
            from_name: env::var("SMTP_FROM_NAME").unwrap_or(defaults.from_name),
            starttls: env::var("SMTP_STARTTLS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.starttls),
            timeout_seconds: env::var("SMTP_TIMEOUT_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout_seconds),
            username,
        }
    }

    /// Whether enough is set to reach a relay
    pub fn is_configured(&self) -> bool {
        !self.host.is_empty() && !self.from_email.is_empty()
    }
}

/// Mail delivery configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MailConfig {
    pub backend: MailBackend,
    #[serde(default)]
    pub smtp: SmtpConfig,
}

impl MailConfig {
    /// `MAIL_BACKEND` picks the backend; without it SMTP is used as soon as
    /// `SMTP_HOST` is set.
    pub fn from_env() -> Self {
        let smtp = SmtpConfig::from_env();
        let backend = env::var("MAIL_BACKEND")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(if smtp.host.is_empty() {
                MailBackend::Log
            } else {
                MailBackend::Smtp
            });

        Self { backend, smtp }
    }
}

fn default_smtp_port() -> u16 {
    587
}

fn default_from_name() -> String {
    String::from("SaaSBoard")
}

fn default_starttls() -> bool {
    true
}

fn default_smtp_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mail_backend_parsing() {
        assert_eq!("SMTP".parse::<MailBackend>(), Ok(MailBackend::Smtp));
        assert_eq!("log".parse::<MailBackend>(), Ok(MailBackend::Log));
        assert!("sendgrid".parse::<MailBackend>().is_err());
    }

    #[test]
    fn test_smtp_requires_host_and_sender() {
        let mut smtp = SmtpConfig::default();
        assert!(!smtp.is_configured());

        smtp.host = "smtp.example.com".to_string();
        smtp.from_email = "no-reply@example.com".to_string();
        assert!(smtp.is_configured());
        assert_eq!(smtp.port, 587);
    }
}
