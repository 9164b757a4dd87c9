//! SMTP delivery of login codes

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::{header, Mailbox, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::{debug, error, info};

use sb_core::errors::DomainError;
use sb_core::services::auth::Mailer;
use sb_shared::config::SmtpConfig;
use sb_shared::utils::validation::mask_email;

use crate::InfrastructureError;

const OTP_SUBJECT: &str = "Your OTP Code";

/// Sends login codes through an SMTP relay
///
/// The transport is built once; each delivery runs on the blocking pool.
pub struct SmtpMailer {
    transport: SmtpTransport,
    from: Mailbox,
    dashboard_url: String,
}

impl SmtpMailer {
    /// # Arguments
    /// * `config` - Relay and sender settings
    /// * `dashboard_url` - Linked from the message body
    pub fn new(
        config: &SmtpConfig,
        dashboard_url: impl Into<String>,
    ) -> Result<Self, InfrastructureError> {
        let builder = if config.starttls {
            SmtpTransport::starttls_relay(&config.host)
        } else {
            SmtpTransport::relay(&config.host)
        }
        .map_err(|e| InfrastructureError::Config(format!("Invalid SMTP relay: {}", e)))?;

        let mut builder = builder
            .port(config.port)
            .timeout(Some(Duration::from_secs(config.timeout_seconds)));
        if !config.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ));
        }

        let from = format!("{} <{}>", config.from_name, config.from_email)
            .parse::<Mailbox>()
            .map_err(|e| InfrastructureError::Config(format!("Invalid sender address: {}", e)))?;

        info!(host = %config.host, port = config.port, "SMTP mailer configured");

        Ok(Self {
            transport: builder.build(),
            from,
            dashboard_url: dashboard_url.into(),
        })
    }

    fn build_message(&self, email: &str, code: &str) -> Result<Message, InfrastructureError> {
        let to = email
            .parse::<Mailbox>()
            .map_err(|e| InfrastructureError::Mail(format!("Invalid recipient: {}", e)))?;

        let body = format!(
            "Your OTP code is: {}. Visit {} to access the dashboard.",
            code, self.dashboard_url
        );

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(OTP_SUBJECT)
            .singlepart(
                SinglePart::builder()
                    .header(header::ContentType::TEXT_PLAIN)
                    .body(body),
            )
            .map_err(|e| InfrastructureError::Mail(format!("Failed to build message: {}", e)))
    }

    async fn deliver(&self, message: Message) -> Result<(), InfrastructureError> {
        let transport = self.transport.clone();

        tokio::task::spawn_blocking(move || {
            transport
                .send(&message)
                .map(|_| ())
                .map_err(|e| InfrastructureError::Mail(format!("SMTP send failed: {}", e)))
        })
        .await
        .map_err(|e| InfrastructureError::Mail(format!("Mail task failed: {}", e)))?
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_otp(&self, email: &str, code: &str) -> Result<(), DomainError> {
        let masked = mask_email(email);
        debug!(to = %masked, "Sending OTP email");

        let message = self.build_message(email, code)?;
        self.deliver(message).await.map_err(|e| {
            error!(to = %masked, error = %e, "OTP email delivery failed");
            DomainError::from(e)
        })?;

        info!(to = %masked, "OTP email sent");
        Ok(())
    }
}
