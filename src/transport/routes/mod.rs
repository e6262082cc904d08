pub mod info;
pub mod sounds;

#[cfg(test)]
pub(crate) mod test_support {
    use std::{sync::Arc, time::Instant};

    use bytes::Bytes;

    use crate::{
        audio::{Sound, SoundCatalog},
        common::rng::SharedRng,
        configs::Config,
        monitoring::PlayStats,
        playback::Scheduler,
        server::AppState,
        voice::MemoryTransport,
    };

    pub(crate) fn state() -> Arc<AppState> {
        let config = Config::default();
        let catalog = Arc::new(SoundCatalog::from_sounds([
            Sound::new("airhorn_default", 1000, vec![Bytes::from_static(b"x"); 50]),
            Sound::new("airhorn_silent", 10, Vec::new()),
        ]));
        let stats = Arc::new(PlayStats::new().expect("stats"));
        let scheduler = Arc::new(Scheduler::new(
            config.playback.clone(),
            catalog.clone(),
            Arc::new(MemoryTransport::new()),
            stats.clone(),
            Arc::new(SharedRng::seeded(0)),
        ));
        Arc::new(AppState {
            config,
            catalog,
            scheduler,
            stats,
            started: Instant::now(),
        })
    }
}
