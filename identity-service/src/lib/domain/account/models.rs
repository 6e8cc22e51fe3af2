use std::fmt;
use std::str::FromStr;

use auth::Role;
use auth::SubjectId;

use crate::domain::account::errors::EmailError;

/// Credential-store record of a Client, Driver or Admin.
///
/// Owned by the external account store; this service only reads it at sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: SubjectId,
    pub email: EmailAddress,
    pub role: Role,
    pub password_hash: String,
}

impl Account {
    pub fn new(id: SubjectId, email: EmailAddress, role: Role, password_hash: String) -> Self {
        Self {
            id,
            email,
            role,
            password_hash,
        }
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
/// Stored lowercased so lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        let email = email.trim().to_lowercase();
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
