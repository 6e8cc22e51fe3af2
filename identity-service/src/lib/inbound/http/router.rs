use std::sync::Arc;
use std::time::Duration;

use auth::AuthorizationTable;
use auth::Authenticator;
use auth::IdentityResolver;
use auth::RouteGuard;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::cookies::SessionCookies;
use super::handlers::area::protected_area;
use super::handlers::login::login;
use super::handlers::logout::logout;
use super::handlers::me::get_me;
use super::handlers::session::get_session;
use super::middleware::authorize;
use crate::domain::account::ports::AccountServicePort;

#[derive(Clone)]
pub struct AppState {
    pub account_service: Arc<dyn AccountServicePort>,
    pub authenticator: Arc<Authenticator>,
    pub resolver: Arc<IdentityResolver>,
    pub guard: Arc<RouteGuard>,
    pub cookies: SessionCookies,
}

pub fn create_router(
    account_service: Arc<dyn AccountServicePort>,
    authenticator: Arc<Authenticator>,
    secure_cookies: bool,
) -> Router {
    let state = AppState {
        account_service,
        resolver: Arc::new(authenticator.resolver()),
        guard: Arc::new(authenticator.guard(AuthorizationTable::default())),
        cookies: SessionCookies::new(secure_cookies, authenticator.policy().max_age),
        authenticator,
    };

    let api_routes = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/session", get(get_session))
        .route("/api/me", get(get_me));

    let area_routes = Router::new()
        .route("/user", get(protected_area))
        .route("/user/*rest", get(protected_area))
        .route("/driver", get(protected_area))
        .route("/driver/*rest", get(protected_area))
        .route("/admin", get(protected_area))
        .route("/admin/*rest", get(protected_area))
        .route_layer(middleware::from_fn_with_state(state.clone(), authorize));

    // Headers are left out of the span: they carry cookies and bearer credentials.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                path = %request.uri().path(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                path = %request.uri().path(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(api_routes)
        .merge(area_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
