use std::sync::Arc;

use axum::{extract::State, response::Json};
use serde::Serialize;

use crate::server::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SoundInfo {
    pub name: String,
    pub weight: i64,
    pub frames: usize,
    pub duration_ms: u64,
}

/// GET /sounds
pub async fn list_sounds(State(state): State<Arc<AppState>>) -> Json<Vec<SoundInfo>> {
    tracing::debug!("GET /sounds");
    Json(
        state
            .catalog
            .all()
            .iter()
            .map(|sound| SoundInfo {
                name: sound.name().to_string(),
                weight: sound.weight(),
                frames: sound.frames().len(),
                duration_ms: sound.duration().as_millis() as u64,
            })
            .collect(),
    )
}
