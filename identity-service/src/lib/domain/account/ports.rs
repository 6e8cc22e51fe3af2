use async_trait::async_trait;
use auth::IssuedSession;

use crate::domain::account::errors::AccountError;
use crate::domain::account::models::Account;
use crate::domain::account::models::EmailAddress;

/// Port for sign-in operations.
#[async_trait]
pub trait AccountServicePort: Send + Sync + 'static {
    /// Verify email and password against the credential store and issue a session.
    ///
    /// # Arguments
    /// * `email` - Account email
    /// * `password` - Plaintext password
    ///
    /// # Returns
    /// Signed session artifact carrying the stored subject and role
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email, wrong password or unusable stored hash
    /// * `DatabaseError` - Credential store lookup failed
    /// * `Session` - Session signing failed
    async fn login(&self, email: &EmailAddress, password: &str)
        -> Result<IssuedSession, AccountError>;

    /// Issue a session for an email already verified by an external identity provider.
    ///
    /// # Errors
    /// * `InvalidCredentials` - No account is registered under the email
    /// * `DatabaseError` - Credential store lookup failed
    /// * `Session` - Session signing failed
    async fn sign_in_federated(&self, email: &EmailAddress)
        -> Result<IssuedSession, AccountError>;
}

/// Read access to the external credential store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync + 'static {
    /// Retrieve the account registered under an email.
    ///
    /// # Returns
    /// Optional account (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Store lookup failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, AccountError>;
}
