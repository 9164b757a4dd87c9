//! MySQL repository implementations

pub mod token_repository_impl;
pub mod user_repository_impl;

pub use token_repository_impl::MySqlTokenRepository;
pub use user_repository_impl::MySqlUserRepository;

use sb_core::errors::DomainError;

/// Wrap a SQLx error for the domain, keeping the context in the message
pub(crate) fn db_error(context: &str, err: sqlx::Error) -> DomainError {
    tracing::error!("{}: {}", context, err);
    DomainError::Internal {
        message: format!("{}: {}", context, err),
    }
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
