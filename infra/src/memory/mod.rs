//! In-process collaborator implementations
//!
//! Used when no database or Redis is configured and by the HTTP tests. Each
//! store guards its map with a `tokio::sync` lock and performs its
//! take/compare-and-set operations under a single write lock.

pub mod otp_store;
pub mod session_store;
pub mod token_repository;
pub mod user_repository;

pub use otp_store::InMemoryOtpStore;
pub use session_store::InMemorySessionStore;
pub use token_repository::InMemoryTokenRepository;
pub use user_repository::InMemoryUserRepository;
