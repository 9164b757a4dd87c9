//! Cache module for Redis-based storage
//!
//! Provides the Redis client plus the OAuth handshake and OTP stores built on
//! top of it.

pub mod otp_store;
pub mod redis_client;
pub mod session_store;


pub use otp_store::RedisOtpStore;
pub use redis_client::RedisClient;
pub use session_store::RedisSessionStore;

pub use sb_shared::config::CacheConfig;
