use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::IssuedSession;

use crate::domain::account::errors::AccountError;
use crate::domain::account::models::Account;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::ports::AccountRepository;
use crate::domain::account::ports::AccountServicePort;

/// Domain service implementation for sign-in.
///
/// Concrete implementation of AccountServicePort with dependency injection.
pub struct AccountService<AR>
where
    AR: AccountRepository,
{
    repository: Arc<AR>,
    authenticator: Arc<Authenticator>,
}

impl<AR> AccountService<AR>
where
    AR: AccountRepository,
{
    pub fn new(repository: Arc<AR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }

    async fn find_account(&self, email: &EmailAddress) -> Result<Account, AccountError> {
        self.repository.find_by_email(email).await?.ok_or_else(|| {
            tracing::info!(email = %email, "Sign-in for unknown email");
            AccountError::InvalidCredentials
        })
    }
}

#[async_trait]
impl<AR> AccountServicePort for AccountService<AR>
where
    AR: AccountRepository,
{
    async fn login(
        &self,
        email: &EmailAddress,
        password: &str,
    ) -> Result<IssuedSession, AccountError> {
        let account = self.find_account(email).await?;

        let issued = self
            .authenticator
            .authenticate(
                password,
                &account.password_hash,
                account.id.clone(),
                account.role,
            )
            .map_err(|e| match e {
                AuthenticationError::InvalidCredentials => {
                    tracing::info!(subject_id = %account.id, "Password mismatch");
                    AccountError::InvalidCredentials
                }
                AuthenticationError::PasswordError(err) => {
                    tracing::error!(
                        subject_id = %account.id,
                        error = %err,
                        "Stored password hash is unusable"
                    );
                    AccountError::InvalidCredentials
                }
                AuthenticationError::SessionError(err) => AccountError::Session(err),
            })?;

        tracing::info!(
            subject_id = %account.id,
            role = %account.role,
            expires_at = %issued.session.expires_at(),
            "Session issued"
        );

        Ok(issued)
    }

    async fn sign_in_federated(&self, email: &EmailAddress) -> Result<IssuedSession, AccountError> {
        let account = self.find_account(email).await?;

        let issued = self
            .authenticator
            .issue_session(account.id.clone(), account.role)?;

        tracing::info!(
            subject_id = %account.id,
            role = %account.role,
            provider = "federated",
            "Session issued"
        );

        Ok(issued)
    }
}
