use auth::RoleError;
use auth::SessionError;
use auth::SubjectIdError;
use thiserror::Error;

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Top-level error for all account-related operations
#[derive(Debug, Clone, Error)]
pub enum AccountError {
    // Stored record validation errors (automatically converted via #[from])
    #[error("Invalid subject identifier: {0}")]
    InvalidSubjectId(#[from] SubjectIdError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Invalid role: {0}")]
    InvalidRole(#[from] RoleError),

    // Domain-level errors
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    // Infrastructure errors
    #[error("Database error: {0}")]
    DatabaseError(String),
}
