use std::sync::Arc;

use chrono::DateTime;
use chrono::Utc;

use crate::codec::CredentialCodec;
use crate::codec::DecodeError;
use crate::identity::SubjectId;
use crate::session::SessionError;
use crate::session::SessionManager;

/// Identity resolution errors.
///
/// All variants map to the same unauthorized answer at the HTTP boundary;
/// the wrapped causes are for logs.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("No credential presented")]
    Unauthenticated,

    #[error("Bearer credential rejected: {0}")]
    Credential(#[from] DecodeError),

    #[error("Session rejected: {0}")]
    Session(#[from] SessionError),
}

/// Resolves the subject behind an API call from either credential.
///
/// The two paths are independent and share nothing but the subject
/// identifier: a bearer credential is trusted on the strength of its
/// authenticated encryption alone, without consulting any session.
pub struct IdentityResolver {
    codec: CredentialCodec,
    sessions: Arc<SessionManager>,
}

impl IdentityResolver {
    pub fn new(codec: CredentialCodec, sessions: Arc<SessionManager>) -> Self {
        Self { codec, sessions }
    }

    pub fn resolve(
        &self,
        bearer: Option<&str>,
        session_token: Option<&str>,
    ) -> Result<SubjectId, AuthError> {
        self.resolve_at(bearer, session_token, Utc::now())
    }

    /// Resolve a subject, preferring the bearer credential over the session cookie.
    ///
    /// A bearer credential that fails to decode is rejected outright rather
    /// than falling back to the cookie.
    ///
    /// # Errors
    /// * `Unauthenticated` - Neither credential is present
    /// * `Credential` - Bearer credential is malformed or tampered
    /// * `Session` - Session artifact is expired, invalid or malformed
    pub fn resolve_at(
        &self,
        bearer: Option<&str>,
        session_token: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<SubjectId, AuthError> {
        if let Some(credential) = bearer {
            return Ok(self.codec.decode(credential)?);
        }

        if let Some(token) = session_token {
            let session = self.sessions.verify_at(token, now)?;
            return Ok(session.subject().clone());
        }

        Err(AuthError::Unauthenticated)
    }
}
