use std::sync::Arc;

use crate::codec::CredentialCodec;
use crate::codec::EncodeError;
use crate::session::Session;
use crate::session::SessionManager;

/// Outbound signing errors.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum SigningError {
    /// No authenticated session is available; the call must not be sent.
    #[error("No active session")]
    NoSession,

    #[error("Failed to encode bearer credential: {0}")]
    Encoding(#[from] EncodeError),
}

/// Client-held session state consulted before each protected call.
pub trait SessionSource: Send + Sync {
    /// The current verified session, if any.
    fn current_session(&self) -> Option<Session>;
}

/// Session source backed by the artifact the client received at login.
///
/// The artifact is verified on every call, so an expired or tampered artifact
/// yields no session.
pub struct ArtifactSessionSource {
    artifact: Option<String>,
    sessions: Arc<SessionManager>,
}

impl ArtifactSessionSource {
    pub fn new(artifact: impl Into<String>, sessions: Arc<SessionManager>) -> Self {
        Self {
            artifact: Some(artifact.into()),
            sessions,
        }
    }

    /// A source for a signed-out client.
    pub fn signed_out(sessions: Arc<SessionManager>) -> Self {
        Self {
            artifact: None,
            sessions,
        }
    }
}

impl SessionSource for ArtifactSessionSource {
    fn current_session(&self) -> Option<Session> {
        let artifact = self.artifact.as_deref()?;
        self.sessions.verify(artifact).ok()
    }
}

/// Attaches a per-call bearer credential derived from the current session.
///
/// Credentials are minted only from a verified [`Session`] and are never cached.
#[derive(Clone)]
pub struct RequestSigner {
    codec: CredentialCodec,
}

impl RequestSigner {
    pub const SCHEME: &'static str = "Bearer";

    pub fn new(codec: CredentialCodec) -> Self {
        Self { codec }
    }

    /// Fresh bearer credential for a verified session.
    pub fn bearer_token(&self, session: &Session) -> Result<String, EncodeError> {
        self.codec.encode(session.subject())
    }

    /// `Authorization` header value for the source's current session.
    ///
    /// # Errors
    /// * `NoSession` - The source holds no verified session
    /// * `Encoding` - Credential encryption failed
    pub fn authorization_header<S>(&self, source: &S) -> Result<String, SigningError>
    where
        S: SessionSource + ?Sized,
    {
        let session = source.current_session().ok_or(SigningError::NoSession)?;
        let token = self.bearer_token(&session)?;
        Ok(format!("{} {}", Self::SCHEME, token))
    }
}
