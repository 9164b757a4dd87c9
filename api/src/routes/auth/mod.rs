//! Authentication route handlers
//!
//! This module contains all authentication-related endpoints:
//! - Email OTP login (send and verify)
//! - Token refresh
//! - Logout
//! - Current user lookup
//! - Google OAuth redirect and callback

pub mod google;
pub mod logout;
pub mod me;
pub mod otp;
pub mod token;

pub use google::{google_callback, google_login};
pub use logout::logout;
pub use me::me;
pub use otp::{send_otp, verify_otp};
pub use token::refresh_token;
