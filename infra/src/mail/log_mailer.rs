//! Mailer that writes login codes to the log instead of sending email

use async_trait::async_trait;
use sb_core::errors::DomainError;
use sb_core::services::auth::Mailer;
use sb_shared::utils::validation::mask_email;

/// Logs OTP codes at `info` level
///
/// Development only; configuration validation rejects it in production.
/// The recipient is masked, the code is not.
#[derive(Debug, Default, Clone)]
pub struct LogMailer;

impl LogMailer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send_otp(&self, email: &str, code: &str) -> Result<(), DomainError> {
        tracing::info!(to = %mask_email(email), code = %code, "Login code issued");
        Ok(())
    }
}
