use std::sync::Arc;

use axum::{
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Json},
};
use serde::Serialize;
use tracing::error;

use crate::{monitoring::StatsSnapshot, server::AppState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveGuild {
    pub guild: String,
    pub pending: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub uptime_ms: u64,
    #[serde(flatten)]
    pub totals: StatsSnapshot,
    pub active: Vec<ActiveGuild>,
}

/// GET /version
pub async fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// GET /stats
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    tracing::debug!("GET /stats");
    let mut active: Vec<ActiveGuild> = state
        .scheduler
        .active_guilds()
        .into_iter()
        .map(|(guild, pending)| ActiveGuild {
            guild: guild.to_string(),
            pending,
        })
        .collect();
    active.sort_by(|a, b| a.guild.cmp(&b.guild));

    Json(StatsResponse {
        uptime_ms: state.uptime_ms(),
        totals: state.stats.snapshot(),
        active,
    })
}

/// GET /metrics
pub async fn get_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.stats.render() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)],
            body,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to render metrics: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
