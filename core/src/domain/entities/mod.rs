pub mod oauth;
pub mod otp;
pub mod token;
pub mod user;

pub use oauth::{GoogleIdentity, OAuthHandshakeState};
pub use otp::OtpChallenge;
pub use token::{Claims, RefreshTokenRecord, TokenPair};
pub use user::User;
