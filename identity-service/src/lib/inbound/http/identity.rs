use auth::RequestSigner;
use auth::SubjectId;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;

use super::cookies::session_token;
use super::handlers::ApiError;
use super::router::AppState;

/// Subject resolved from the request's credentials.
///
/// A bearer credential wins over the session cookie. Any other
/// `Authorization` scheme is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity(pub SubjectId);

#[axum::async_trait]
impl FromRequestParts<AppState> for Identity {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let bearer = bearer_credential(parts);
        let jar = CookieJar::from_headers(&parts.headers);
        let session = session_token(&jar);

        state
            .resolver
            .resolve(bearer.as_deref(), session.as_deref())
            .map(Identity)
            .map_err(|e| {
                tracing::warn!(error = %e, "Identity resolution failed");
                ApiError::unauthorized()
            })
    }
}

fn bearer_credential(parts: &Parts) -> Option<String> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, credential) = value.split_once(' ')?;

    if !scheme.eq_ignore_ascii_case(RequestSigner::SCHEME) {
        return None;
    }

    let credential = credential.trim();
    (!credential.is_empty()).then(|| credential.to_string())
}
