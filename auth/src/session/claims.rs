use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::errors::SessionError;
use crate::identity::Role;
use crate::identity::SubjectId;

/// Sliding-expiry policy for session artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPolicy {
    /// Lifetime of an artifact from its last (re)issue
    pub max_age: Duration,
    /// Minimum age before a verified artifact is re-issued
    pub update_age: Duration,
}

impl SessionPolicy {
    pub fn new(max_age: Duration, update_age: Duration) -> Self {
        Self {
            max_age,
            update_age,
        }
    }
}

impl Default for SessionPolicy {
    /// Three months of 30 days, refreshed at most once a day.
    fn default() -> Self {
        Self {
            max_age: Duration::days(3 * 30),
            update_age: Duration::hours(24),
        }
    }
}

/// Wire claims of a session artifact.
///
/// Only the subject and role travel in the token; no profile data.
/// Fields are optional so that a token missing one of them can be
/// reported as malformed rather than as a signature failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub(crate) struct SessionClaims {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Issued at, also the time of the last refresh (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Expiration time (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl SessionClaims {
    pub(crate) fn from_session(session: &Session) -> Self {
        Self {
            sub: Some(session.subject.as_str().to_string()),
            role: Some(session.role.as_str().to_string()),
            iat: Some(session.issued_at.timestamp()),
            exp: Some(session.expires_at.timestamp()),
        }
    }

    pub(crate) fn into_session(self) -> Result<Session, SessionError> {
        let sub = self.sub.ok_or_else(|| missing("sub"))?;
        let role = self.role.ok_or_else(|| missing("role"))?;
        let iat = self.iat.ok_or_else(|| missing("iat"))?;
        let exp = self.exp.ok_or_else(|| missing("exp"))?;

        let subject = SubjectId::new(sub).map_err(|e| SessionError::Malformed(e.to_string()))?;
        let role = role
            .parse::<Role>()
            .map_err(|e| SessionError::Malformed(e.to_string()))?;

        Ok(Session {
            subject,
            role,
            issued_at: timestamp("iat", iat)?,
            expires_at: timestamp("exp", exp)?,
        })
    }
}

fn missing(claim: &str) -> SessionError {
    SessionError::Malformed(format!("Missing required claim: {}", claim))
}

fn timestamp(claim: &str, seconds: i64) -> Result<DateTime<Utc>, SessionError> {
    DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| SessionError::Malformed(format!("Claim {} is out of range", claim)))
}

/// Verified contents of a session artifact.
///
/// Only the session manager constructs this type, so holding one proves the
/// subject was authenticated by an unexpired artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    subject: SubjectId,
    role: Role,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl Session {
    pub(crate) fn new(
        subject: SubjectId,
        role: Role,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            subject,
            role,
            issued_at,
            expires_at,
        }
    }

    pub fn subject(&self) -> &SubjectId {
        &self.subject
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Check if the session is past its expiry (inclusive of the exact second).
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() > self.expires_at.timestamp()
    }
}

/// A freshly signed artifact together with the session it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedSession {
    pub token: String,
    pub session: Session,
}
