//! Value objects representing immutable domain concepts.

pub mod client_metadata;
pub mod login_outcome;

pub use client_metadata::ClientMetadata;
pub use login_outcome::LoginOutcome;
