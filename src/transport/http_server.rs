use std::sync::Arc;

use axum::{Router, middleware, routing::get};
use tower_http::trace::TraceLayer;

use crate::{
    server::AppState,
    transport::{
        middleware::{add_response_headers, check_auth},
        routes::{info, sounds},
    },
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/version", get(info::get_version))
        .route("/stats", get(info::get_stats))
        .route("/metrics", get(info::get_metrics))
        .route("/sounds", get(sounds::list_sounds))
        .layer(middleware::from_fn_with_state(state.clone(), check_auth))
        .layer(middleware::from_fn(add_response_headers))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
