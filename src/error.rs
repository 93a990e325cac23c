//! Crate error types

use thiserror::Error;

/// Errors surfaced by the data layer and the session recorder
#[derive(Debug, Error)]
pub enum Error {
    /// Bad or missing user input; nothing was written
    #[error("{0}")]
    Validation(String),

    /// Referential-integrity violation on delete; nothing was written
    #[error("{0}")]
    Constraint(String),

    /// Unexpected database failure; any open transaction was rolled back
    #[error("database error: {0}")]
    Storage(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// True when the underlying SQLite error is a constraint violation
pub(crate) fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}
