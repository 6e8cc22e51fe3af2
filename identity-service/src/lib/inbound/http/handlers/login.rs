use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::SessionData;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::ports::AccountServicePort;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequestBody>,
) -> Result<(CookieJar, ApiSuccess<SessionData>), ApiError> {
    let email = EmailAddress::new(body.email).map_err(|_| ApiError::invalid_credentials())?;

    let issued = state.account_service.login(&email, &body.password).await?;

    let jar = jar.add(state.cookies.session(issued.token));

    Ok((
        jar,
        ApiSuccess::new(StatusCode::OK, (&issued.session).into()),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    email: String,
    password: String,
}
