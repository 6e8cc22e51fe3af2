use thiserror::Error;

/// Error type for bearer credential decoding.
///
/// Variants carry diagnostic detail for logs only; callers answer with a
/// generic unauthorized response.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Credential is not valid base64: {0}")]
    InvalidEncoding(String),

    #[error("Credential too short: minimum {min} bytes, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Credential authentication failed")]
    Authentication,

    #[error("Credential plaintext is not a subject identifier: {0}")]
    InvalidPlaintext(String),
}

/// Error type for bearer credential encoding.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EncodeError {
    #[error("Credential encryption failed: {0}")]
    EncryptionFailed(String),
}
