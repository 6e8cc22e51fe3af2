use auth::Refresh;
use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::CookieJar;

use super::ApiError;
use super::ApiSuccess;
use super::SessionData;
use crate::inbound::http::cookies::session_token;
use crate::inbound::http::router::AppState;

/// Current session, with sliding refresh of the cookie.
pub async fn get_session(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, ApiSuccess<SessionData>), ApiError> {
    let token = session_token(&jar).ok_or_else(ApiError::unauthorized)?;

    let refresh = state.authenticator.refresh_session(&token).map_err(|e| {
        tracing::warn!(error = %e, "Session rejected");
        ApiError::unauthorized()
    })?;

    match refresh {
        Refresh::Unchanged(session) => Ok((
            jar,
            ApiSuccess::new(StatusCode::OK, (&session).into()),
        )),
        Refresh::Renewed(issued) => {
            tracing::debug!(
                subject_id = %issued.session.subject(),
                expires_at = %issued.session.expires_at(),
                "Session renewed"
            );
            let data: SessionData = (&issued.session).into();
            Ok((
                jar.add(state.cookies.session(issued.token)),
                ApiSuccess::new(StatusCode::OK, data),
            ))
        }
    }
}
