use auth::Role;
use auth::Session;
use axum::http::StatusCode;
use axum::http::Uri;
use axum::Extension;
use serde::Serialize;

use super::ApiSuccess;

/// Entry point of the `/user`, `/driver` and `/admin` areas.
///
/// Pages are rendered elsewhere; reaching this handler means the guard let
/// the navigation through, and it reports the session it was admitted with.
pub async fn protected_area(
    Extension(session): Extension<Session>,
    uri: Uri,
) -> ApiSuccess<AreaResponseData> {
    ApiSuccess::new(
        StatusCode::OK,
        AreaResponseData {
            subject_id: session.subject().to_string(),
            role: session.role(),
            path: uri.path().to_string(),
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AreaResponseData {
    pub subject_id: String,
    pub role: Role,
    pub path: String,
}
