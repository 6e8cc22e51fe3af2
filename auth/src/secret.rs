use std::fmt;

use thiserror::Error;

/// Error for secret construction failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SecretError {
    #[error("Secret too short: minimum {min} bytes, got {actual}")]
    TooShort { min: usize, actual: usize },
}

/// Process-wide static secret shared by the credential codec and the session manager.
///
/// Constructed once at startup and passed by reference to the components that need it.
///
/// # Security Notes
/// - At least 256 bits (32 bytes), matching HS256 and the AES-256 key size
/// - Store in environment variables or a secure vault, never in code
#[derive(Clone)]
pub struct AuthSecret(Vec<u8>);

impl AuthSecret {
    pub const MIN_LENGTH: usize = 32;

    /// Wrap raw secret bytes.
    ///
    /// # Errors
    /// * `TooShort` - Secret is shorter than 32 bytes
    pub fn new(secret: impl Into<Vec<u8>>) -> Result<Self, SecretError> {
        let secret = secret.into();
        if secret.len() < Self::MIN_LENGTH {
            return Err(SecretError::TooShort {
                min: Self::MIN_LENGTH,
                actual: secret.len(),
            });
        }
        Ok(Self(secret))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for AuthSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthSecret(<redacted>)")
    }
}
