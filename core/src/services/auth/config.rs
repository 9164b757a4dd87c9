//! Configuration for the authentication service

use sb_shared::config::OtpConfig;

/// Configuration for the authentication service
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// Lifetime of an emailed code in seconds
    pub otp_ttl_seconds: u64,
    /// Failed attempts after which a code is discarded
    pub max_otp_attempts: u32,
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self::from(&OtpConfig::default())
    }
}

impl From<&OtpConfig> for AuthServiceConfig {
    fn from(otp: &OtpConfig) -> Self {
        Self {
            otp_ttl_seconds: otp.ttl_seconds,
            max_otp_attempts: otp.max_attempts,
        }
    }
}
