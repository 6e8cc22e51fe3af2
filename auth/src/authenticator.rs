use std::sync::Arc;

use crate::authorization::AuthorizationTable;
use crate::authorization::RouteGuard;
use crate::codec::CredentialCodec;
use crate::identity::Role;
use crate::identity::SubjectId;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::resolver::IdentityResolver;
use crate::secret::AuthSecret;
use crate::session::IssuedSession;
use crate::session::Refresh;
use crate::session::Session;
use crate::session::SessionError;
use crate::session::SessionManager;
use crate::session::SessionPolicy;
use crate::signer::RequestSigner;

/// Authentication coordinator combining password verification, session
/// issuance and the bearer credential codec.
///
/// Built once from the process secret; every component it hands out shares
/// the same key material and holds no mutable state.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    sessions: Arc<SessionManager>,
    codec: CredentialCodec,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Session error: {0}")]
    SessionError(#[from] SessionError),
}

impl Authenticator {
    pub fn new(secret: &AuthSecret, policy: SessionPolicy) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            sessions: Arc::new(SessionManager::new(secret, policy)),
            codec: CredentialCodec::new(secret),
        }
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and issue a session for the stored subject and role.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `subject` - Identifier of the matching account
    /// * `role` - Role recorded on the matching account
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash is malformed
    /// * `SessionError` - Session signing failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        subject: SubjectId,
        role: Role,
    ) -> Result<IssuedSession, AuthenticationError> {
        let is_valid = self.password_hasher.verify(password, stored_hash)?;

        if !is_valid {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(self.sessions.issue(subject, role)?)
    }

    /// Issue a session without password verification.
    ///
    /// Used when an external identity provider has already authenticated the subject.
    pub fn issue_session(
        &self,
        subject: SubjectId,
        role: Role,
    ) -> Result<IssuedSession, SessionError> {
        self.sessions.issue(subject, role)
    }

    pub fn verify_session(&self, token: &str) -> Result<Session, SessionError> {
        self.sessions.verify(token)
    }

    pub fn refresh_session(&self, token: &str) -> Result<Refresh, SessionError> {
        self.sessions.refresh(token)
    }

    pub fn sessions(&self) -> Arc<SessionManager> {
        Arc::clone(&self.sessions)
    }

    pub fn policy(&self) -> &SessionPolicy {
        self.sessions.policy()
    }

    pub fn resolver(&self) -> IdentityResolver {
        IdentityResolver::new(self.codec.clone(), self.sessions())
    }

    pub fn guard(&self, table: AuthorizationTable) -> RouteGuard {
        RouteGuard::new(self.sessions(), table)
    }

    pub fn signer(&self) -> RequestSigner {
        RequestSigner::new(self.codec.clone())
    }
}
