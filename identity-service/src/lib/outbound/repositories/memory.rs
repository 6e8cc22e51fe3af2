use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::account::errors::AccountError;
use crate::domain::account::models::Account;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::ports::AccountRepository;

/// Fixed, read-only credential store held in memory.
///
/// Used for tests and for embedding the service without a database.
#[derive(Debug, Default)]
pub struct InMemoryAccountRepository {
    accounts: HashMap<EmailAddress, Account>,
}

impl InMemoryAccountRepository {
    pub fn new(accounts: impl IntoIterator<Item = Account>) -> Self {
        Self {
            accounts: accounts
                .into_iter()
                .map(|account| (account.email.clone(), account))
                .collect(),
        }
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, AccountError> {
        Ok(self.accounts.get(email).cloned())
    }
}

#[cfg(test)]
mod tests {
    use auth::Role;
    use auth::SubjectId;

    use super::*;

    fn email(raw: &str) -> EmailAddress {
        EmailAddress::new(raw.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_find_by_email() {
        let repository = InMemoryAccountRepository::new([Account::new(
            SubjectId::new("rider-1").unwrap(),
            email("rider@example.com"),
            Role::Client,
            "$argon2id$placeholder".to_string(),
        )]);

        let found = repository
            .find_by_email(&email("RIDER@example.com"))
            .await
            .unwrap()
            .expect("account present");
        assert_eq!(found.id.as_str(), "rider-1");

        assert!(repository
            .find_by_email(&email("ghost@example.com"))
            .await
            .unwrap()
            .is_none());
    }
}
