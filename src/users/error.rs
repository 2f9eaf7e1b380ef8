use axum::http::StatusCode;
use thiserror::Error;

/// Failures surfaced by [`UserRepository`](super::repo::UserRepository).
#[derive(Debug, Error)]
pub enum UserError {
    #[error("invalid email format")]
    InvalidEmailFormat,
    #[error("invalid phone number format")]
    InvalidPhoneFormat,
    #[error("user already registered")]
    UserAlreadyRegistered,
    /// Login miss. Kept generic so callers cannot probe which emails exist.
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("user not found")]
    UserNotFound,
    #[error("nothing to update")]
    NothingToUpdate,
    #[error("storage error: {0}")]
    Storage(#[source] sqlx::Error),
}

impl UserError {
    pub fn status(&self) -> StatusCode {
        match self {
            UserError::InvalidEmailFormat
            | UserError::InvalidPhoneFormat
            | UserError::NothingToUpdate => StatusCode::BAD_REQUEST,
            UserError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            UserError::UserNotFound => StatusCode::NOT_FOUND,
            UserError::UserAlreadyRegistered => StatusCode::CONFLICT,
            UserError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// True when the database rejected a write because of a unique constraint.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
