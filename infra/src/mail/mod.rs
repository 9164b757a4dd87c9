//! OTP delivery

pub mod log_mailer;
pub mod smtp_mailer;

pub use log_mailer::LogMailer;
pub use smtp_mailer::SmtpMailer;
