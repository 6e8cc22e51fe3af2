use auth::DenyReason;
use auth::GuardDecision;
use auth::Refresh;
use axum::extract::Request;
use axum::extract::State;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Redirect;
use axum::response::Response;
use axum_extra::extract::CookieJar;
use chrono::Utc;

use crate::inbound::http::cookies::session_token;
use crate::inbound::http::router::AppState;

/// Route guard for page navigation under the protected areas.
///
/// Admitted requests carry the verified `auth::Session` in their extensions and
/// get a renewed session cookie once the artifact is older than the update age.
pub async fn authorize(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();

    if !state.guard.is_protected(&path) {
        return next.run(req).await;
    }

    let token = session_token(&jar);
    let now = Utc::now();

    let session = match state.guard.authorize_at(&path, token.as_deref(), now) {
        GuardDecision::Allow(session) => session,
        GuardDecision::Redirect { location, reason } => {
            match &reason {
                DenyReason::MissingSession => {
                    tracing::debug!(path = %path, "Navigation without session")
                }
                DenyReason::InvalidSession(e) => {
                    tracing::info!(path = %path, error = %e, "Navigation with rejected session")
                }
                DenyReason::Forbidden(e) => {
                    tracing::warn!(path = %path, error = %e, "Navigation outside role")
                }
            }
            return Redirect::temporary(&location).into_response();
        }
    };

    req.extensions_mut().insert(session);
    let response = next.run(req).await;

    // Same clock as the guard, so an admitted token cannot expire in between.
    let sessions = state.authenticator.sessions();
    let renewed = token.and_then(|token| match sessions.refresh_at(&token, now) {
        Ok(Refresh::Renewed(issued)) => Some(issued.token),
        Ok(Refresh::Unchanged(_)) => None,
        Err(e) => {
            tracing::warn!(error = %e, "Session refresh failed");
            None
        }
    });

    match renewed {
        Some(token) => (jar.add(state.cookies.session(token)), response).into_response(),
        None => response,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use auth::AuthSecret;
    use auth::Authenticator;
    use auth::Role;
    use auth::SessionPolicy;
    use auth::SubjectId;
    use axum::body::Body;
    use axum::http::header::COOKIE;
    use axum::http::header::LOCATION;
    use axum::http::header::SET_COOKIE;
    use axum::http::Request;
    use axum::http::StatusCode;
    use chrono::Duration;
    use chrono::Utc;
    use tower::ServiceExt;

    use crate::domain::account::service::AccountService;
    use crate::inbound::http::cookies::SESSION_COOKIE;
    use crate::inbound::http::router::create_router;
    use crate::outbound::repositories::InMemoryAccountRepository;

    fn authenticator() -> Arc<Authenticator> {
        let secret = AuthSecret::new("middleware-test-secret-0123456789abcdef").unwrap();
        Arc::new(Authenticator::new(&secret, SessionPolicy::default()))
    }

    fn app(authenticator: Arc<Authenticator>) -> axum::Router {
        let repository = Arc::new(InMemoryAccountRepository::default());
        let service = Arc::new(AccountService::new(repository, Arc::clone(&authenticator)));
        create_router(service, authenticator, false)
    }

    fn token(authenticator: &Authenticator, role: Role) -> String {
        authenticator
            .issue_session(SubjectId::new("acct-1").unwrap(), role)
            .unwrap()
            .token
    }

    fn navigate(path: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(path);
        if let Some(token) = token {
            builder = builder.header(COOKIE, format!("{}={}", SESSION_COOKIE, token));
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_missing_session_redirects_to_sign_in() {
        let response = app(authenticator())
            .oneshot(navigate("/user/x", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            response.headers()[LOCATION],
            "/auth/signin?callbackUrl=/user/x"
        );
    }

    #[tokio::test]
    async fn test_client_session_is_turned_away_from_admin() {
        let authenticator = authenticator();
        let token = token(&authenticator, Role::Client);

        let response = app(authenticator)
            .oneshot(navigate("/admin/panel", Some(&token)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers()[LOCATION], "/");
    }

    #[tokio::test]
    async fn test_admin_session_reaches_driver_area() {
        let authenticator = authenticator();
        let token = token(&authenticator, Role::Admin);

        let response = app(authenticator)
            .oneshot(navigate("/driver/trips", Some(&token)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(SET_COOKIE).is_none());

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["data"]["role"], "admin");
        assert_eq!(body["data"]["path"], "/driver/trips");
    }

    #[tokio::test]
    async fn test_driver_session_is_turned_away_from_user_area() {
        let authenticator = authenticator();
        let token = token(&authenticator, Role::Driver);

        let response = app(authenticator)
            .oneshot(navigate("/user", Some(&token)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers()[LOCATION], "/");
    }

    #[tokio::test]
    async fn test_tampered_session_redirects_to_sign_in() {
        let authenticator = authenticator();
        let mut token = token(&authenticator, Role::Client);
        token.push('x');

        let response = app(authenticator)
            .oneshot(navigate("/user/profile", Some(&token)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            response.headers()[LOCATION],
            "/auth/signin?callbackUrl=/user/profile"
        );
    }

    #[tokio::test]
    async fn test_session_at_end_of_lifetime_is_renewed() {
        let authenticator = authenticator();
        let max_age = authenticator.policy().max_age;
        let issued_at = Utc::now() - max_age + Duration::seconds(2);
        let expiring = authenticator
            .sessions()
            .issue_at(SubjectId::new("acct-1").unwrap(), Role::Driver, issued_at)
            .unwrap()
            .token;

        let response = app(authenticator)
            .oneshot(navigate("/driver", Some(&expiring)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response.headers()[SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with(&format!("{}=", SESSION_COOKIE)));
        assert!(!cookie.contains(&expiring));
    }

    #[tokio::test]
    async fn test_stale_session_cookie_is_renewed() {
        let authenticator = authenticator();
        let issued_at = Utc::now() - Duration::hours(25);
        let stale = authenticator
            .sessions()
            .issue_at(SubjectId::new("acct-1").unwrap(), Role::Client, issued_at)
            .unwrap()
            .token;

        let response = app(authenticator)
            .oneshot(navigate("/user", Some(&stale)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response.headers()[SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with(&format!("{}=", SESSION_COOKIE)));
        assert!(!cookie.contains(&stale));
        assert!(cookie.contains("HttpOnly"));
    }
}
