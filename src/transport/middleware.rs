use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderValue, StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::server::AppState;

pub const API_VERSION_HEADER: &str = "Airhorn-Api-Version";

#[derive(Debug, PartialEq, Eq)]
enum AuthFailure {
    Missing,
    Mismatch,
}

/// `Ok` when no password is configured or the header carries it verbatim.
fn authorize(expected: Option<&str>, provided: Option<&str>) -> Result<(), AuthFailure> {
    match (expected, provided) {
        (None, _) => Ok(()),
        (Some(_), None) => Err(AuthFailure::Missing),
        (Some(expected), Some(provided)) if expected == provided => Ok(()),
        (Some(_), Some(_)) => Err(AuthFailure::Mismatch),
    }
}

pub async fn check_auth(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let provided = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    match authorize(state.config.server.password.as_deref(), provided) {
        Ok(()) => Ok(next.run(req).await),
        Err(failure) => {
            warn!(
                "HTTP {} {} rejected: {:?} password",
                req.method(),
                req.uri().path(),
                failure
            );
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}

pub async fn add_response_headers(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    response
        .headers_mut()
        .insert(API_VERSION_HEADER, HeaderValue::from_static("1"));
    response
}
