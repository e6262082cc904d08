use std::{sync::Arc, time::Instant};

use crate::{
    audio::SoundCatalog, configs::Config, monitoring::PlayStats, playback::Scheduler,
};

/// Top-level application state shared with the HTTP handlers.
pub struct AppState {
    pub config: Config,
    pub catalog: Arc<SoundCatalog>,
    pub scheduler: Arc<Scheduler>,
    pub stats: Arc<PlayStats>,
    pub started: Instant,
}

impl AppState {
    pub fn uptime_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }
}
