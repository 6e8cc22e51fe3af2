use chrono::DateTime;
use chrono::SubsecRound;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::IssuedSession;
use super::claims::Session;
use super::claims::SessionClaims;
use super::claims::SessionPolicy;
use super::errors::SessionError;
use crate::identity::Role;
use crate::identity::SubjectId;
use crate::secret::AuthSecret;

/// Outcome of a sliding refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Refresh {
    /// The artifact is younger than the update interval and stays as it is
    Unchanged(Session),
    /// A new artifact with an extended expiry replaces the old one
    Renewed(IssuedSession),
}

/// Issues and verifies stateless session artifacts (HS256-signed JWTs).
///
/// Every operation has an `_at` variant taking the current time so that
/// expiry and refresh decisions can be exercised deterministically.
pub struct SessionManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    policy: SessionPolicy,
}

impl SessionManager {
    pub fn new(secret: &AuthSecret, policy: SessionPolicy) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            policy,
        }
    }

    pub fn policy(&self) -> &SessionPolicy {
        &self.policy
    }

    /// Issue a new artifact for an authenticated subject.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token signing failed or the expiry overflows the calendar
    pub fn issue(&self, subject: SubjectId, role: Role) -> Result<IssuedSession, SessionError> {
        self.issue_at(subject, role, Utc::now())
    }

    pub fn issue_at(
        &self,
        subject: SubjectId,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<IssuedSession, SessionError> {
        let issued_at = now.trunc_subsecs(0);
        let expires_at = issued_at
            .checked_add_signed(self.policy.max_age)
            .ok_or_else(|| {
                SessionError::EncodingFailed("Session expiry is out of range".to_string())
            })?;
        let session = Session::new(subject, role, issued_at, expires_at);

        let token = encode(
            &Header::new(Algorithm::HS256),
            &SessionClaims::from_session(&session),
            &self.encoding_key,
        )
        .map_err(|e| SessionError::EncodingFailed(e.to_string()))?;

        Ok(IssuedSession { token, session })
    }

    /// Verify an artifact and return the session it carries.
    ///
    /// # Errors
    /// * `Expired` - Current time is past the artifact's expiry
    /// * `Invalid` - Signature or token structure check failed
    /// * `Malformed` - A required claim is missing or unparsable
    pub fn verify(&self, token: &str) -> Result<Session, SessionError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Session, SessionError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the supplied clock below
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        // Signature first; claim shape is only inspected on an authentic token
        let token_data = decode::<serde_json::Value>(token, &self.decoding_key, &validation)
            .map_err(|e| SessionError::Invalid(e.to_string()))?;

        let claims: SessionClaims = serde_json::from_value(token_data.claims)
            .map_err(|e| SessionError::Malformed(e.to_string()))?;
        let session = claims.into_session()?;
        if session.is_expired(now) {
            return Err(SessionError::Expired);
        }

        Ok(session)
    }

    /// Re-issue the artifact if it was last issued more than the update interval ago.
    ///
    /// # Errors
    /// Same as [`SessionManager::verify`]; an expired artifact is never renewed.
    pub fn refresh(&self, token: &str) -> Result<Refresh, SessionError> {
        self.refresh_at(token, Utc::now())
    }

    pub fn refresh_at(&self, token: &str, now: DateTime<Utc>) -> Result<Refresh, SessionError> {
        let session = self.verify_at(token, now)?;

        if now - session.issued_at() <= self.policy.update_age {
            return Ok(Refresh::Unchanged(session));
        }

        let role = session.role();
        let renewed = self.issue_at(session.subject().clone(), role, now)?;
        Ok(Refresh::Renewed(renewed))
    }
}
