use std::sync::Arc;

use chrono::DateTime;
use chrono::Utc;

use super::errors::AuthorizationError;
use super::table::matches_prefix;
use super::table::AuthorizationTable;
use crate::session::Session;
use crate::session::SessionError;
use crate::session::SessionManager;

/// Sign-in page receiving unauthenticated navigations.
pub const SIGN_IN_PATH: &str = "/auth/signin";

/// Landing page receiving navigations outside the caller's role.
pub const ROOT_PATH: &str = "/";

/// Why the guard turned a navigation away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    MissingSession,
    InvalidSession(SessionError),
    Forbidden(AuthorizationError),
}

/// Decision taken for a navigation to a protected path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow(Session),
    Redirect { location: String, reason: DenyReason },
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow(_))
    }

    /// Redirect target, if the navigation was denied.
    pub fn location(&self) -> Option<&str> {
        match self {
            GuardDecision::Allow(_) => None,
            GuardDecision::Redirect { location, .. } => Some(location),
        }
    }
}

/// Perimeter gate for page navigation.
///
/// Only the session cookie is consulted here; bearer credentials are for API
/// calls and are resolved per endpoint.
pub struct RouteGuard {
    sessions: Arc<SessionManager>,
    table: AuthorizationTable,
    protected_prefixes: Vec<String>,
}

impl RouteGuard {
    /// Guard protecting `/user`, `/driver` and `/admin`.
    pub fn new(sessions: Arc<SessionManager>, table: AuthorizationTable) -> Self {
        Self::with_protected_prefixes(sessions, table, ["/user", "/driver", "/admin"])
    }

    pub fn with_protected_prefixes<I, P>(
        sessions: Arc<SessionManager>,
        table: AuthorizationTable,
        protected_prefixes: I,
    ) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Self {
            sessions,
            table,
            protected_prefixes: protected_prefixes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn table(&self) -> &AuthorizationTable {
        &self.table
    }

    /// Whether the guard applies to a path at all.
    pub fn is_protected(&self, path: &str) -> bool {
        self.protected_prefixes
            .iter()
            .any(|prefix| matches_prefix(prefix, path))
    }

    pub fn authorize(&self, path: &str, session_token: Option<&str>) -> GuardDecision {
        self.authorize_at(path, session_token, Utc::now())
    }

    /// Decide a navigation to a protected path.
    ///
    /// - no or invalid session: redirect to the sign-in page with the path as `callbackUrl`
    /// - role not allowed for the path: redirect to the root
    /// - otherwise: allow, handing back the verified session
    pub fn authorize_at(
        &self,
        path: &str,
        session_token: Option<&str>,
        now: DateTime<Utc>,
    ) -> GuardDecision {
        let token = match session_token {
            Some(token) => token,
            None => {
                return GuardDecision::Redirect {
                    location: sign_in_location(path),
                    reason: DenyReason::MissingSession,
                }
            }
        };

        let session = match self.sessions.verify_at(token, now) {
            Ok(session) => session,
            Err(e) => {
                return GuardDecision::Redirect {
                    location: sign_in_location(path),
                    reason: DenyReason::InvalidSession(e),
                }
            }
        };

        match self.table.check(session.role(), path) {
            Ok(()) => GuardDecision::Allow(session),
            Err(e) => GuardDecision::Redirect {
                location: ROOT_PATH.to_string(),
                reason: DenyReason::Forbidden(e),
            },
        }
    }
}

/// Sign-in URL carrying the original path back as `callbackUrl`.
///
/// Query metacharacters are percent-encoded; slashes are legal in a query and kept.
pub fn sign_in_location(path: &str) -> String {
    let callback = urlencoding::encode(path).replace("%2F", "/");
    format!("{}?callbackUrl={}", SIGN_IN_PATH, callback)
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::identity::Role;
    use crate::identity::SubjectId;
    use crate::secret::AuthSecret;
    use crate::session::SessionPolicy;

    fn guard() -> RouteGuard {
        let secret = AuthSecret::new("test_secret_key_at_least_32_bytes!").unwrap();
        let sessions = Arc::new(SessionManager::new(&secret, SessionPolicy::default()));
        RouteGuard::new(sessions, AuthorizationTable::default())
    }

    fn token_for(guard: &RouteGuard, role: Role) -> String {
        guard
            .sessions
            .issue(SubjectId::new("subject-1").unwrap(), role)
            .unwrap()
            .token
    }

    #[test]
    fn test_protected_prefixes() {
        let guard = guard();
        assert!(guard.is_protected("/user/x"));
        assert!(guard.is_protected("/driver"));
        assert!(guard.is_protected("/admin/reports/daily"));
        assert!(!guard.is_protected("/"));
        assert!(!guard.is_protected("/api/me"));
        assert!(!guard.is_protected("/auth/signin"));
    }

    #[test]
    fn test_client_on_driver_area_is_sent_home() {
        let guard = guard();
        let token = token_for(&guard, Role::Client);

        let decision = guard.authorize("/driver/dashboard", Some(&token));
        assert_eq!(decision.location(), Some("/"));
        assert!(matches!(
            decision,
            GuardDecision::Redirect {
                reason: DenyReason::Forbidden(_),
                ..
            }
        ));
    }

    #[test]
    fn test_driver_on_driver_area_is_allowed() {
        let guard = guard();
        let token = token_for(&guard, Role::Driver);

        match guard.authorize("/driver/dashboard", Some(&token)) {
            GuardDecision::Allow(session) => assert_eq!(session.role(), Role::Driver),
            other => panic!("expected allow, got {:?}", other),
        }
    }

    #[test]
    fn test_admin_on_admin_area_is_allowed() {
        let guard = guard();
        let token = token_for(&guard, Role::Admin);
        assert!(guard.authorize("/admin/x", Some(&token)).is_allowed());
    }

    #[test]
    fn test_missing_session_goes_to_sign_in() {
        let decision = guard().authorize("/user/x", None);
        assert_eq!(
            decision,
            GuardDecision::Redirect {
                location: "/auth/signin?callbackUrl=/user/x".to_string(),
                reason: DenyReason::MissingSession,
            }
        );
    }

    #[test]
    fn test_expired_session_goes_to_sign_in() {
        let guard = guard();
        let issued = guard
            .sessions
            .issue_at(
                SubjectId::new("subject-1").unwrap(),
                Role::Client,
                Utc::now() - Duration::days(91),
            )
            .unwrap();

        let decision = guard.authorize("/user/x", Some(&issued.token));
        assert_eq!(decision.location(), Some("/auth/signin?callbackUrl=/user/x"));
        assert!(matches!(
            decision,
            GuardDecision::Redirect {
                reason: DenyReason::InvalidSession(SessionError::Expired),
                ..
            }
        ));
    }

    #[test]
    fn test_tampered_session_goes_to_sign_in() {
        let guard = guard();
        let mut token = token_for(&guard, Role::Admin);
        token.push('x');

        let decision = guard.authorize("/admin/x", Some(&token));
        assert_eq!(decision.location(), Some("/auth/signin?callbackUrl=/admin/x"));
    }

    #[test]
    fn test_sign_in_location_escapes_query_characters() {
        assert_eq!(
            sign_in_location("/user/a&b=c"),
            "/auth/signin?callbackUrl=/user/a%26b%3Dc"
        );
    }
}
