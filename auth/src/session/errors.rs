use thiserror::Error;

/// Error type for session artifact operations.
///
/// Guards and resolvers treat every variant as "no valid session".
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Session is expired")]
    Expired,

    #[error("Session is invalid: {0}")]
    Invalid(String),

    #[error("Session is malformed: {0}")]
    Malformed(String),

    #[error("Failed to encode session: {0}")]
    EncodingFailed(String),
}
