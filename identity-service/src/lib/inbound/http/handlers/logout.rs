use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::CookieJar;
use serde::Serialize;

use super::ApiSuccess;
use crate::inbound::http::router::AppState;

/// Destroys the client's session by expiring its cookie. Nothing is held server-side.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, ApiSuccess<LogoutResponseData>) {
    (
        jar.add(state.cookies.removal()),
        ApiSuccess::new(
            StatusCode::OK,
            LogoutResponseData {
                signed_out: true,
            },
        ),
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogoutResponseData {
    pub signed_out: bool,
}
