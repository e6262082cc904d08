use std::{sync::Arc, time::Instant};

use airhorn::{
    audio::{OpusFrameEncoder, SoundCatalog, constants::FRAME_DURATION_MS, decoder_from_config},
    common::{logger, rng::SharedRng, types::AnyResult},
    configs::Config,
    monitoring::PlayStats,
    playback::Scheduler,
    server::AppState,
    transport,
    trigger::{Dispatcher, VoiceStateCache, console},
    voice::{MemoryTransport, UdpTransport, VoiceTransport},
};
use tokio::io::BufReader;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> AnyResult<()> {
    let (config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    logger::init(config.logging.as_ref());
    if let Some(e) = config_error {
        warn!("Using default configuration: {}", e);
    }

    info!("Starting airhorn v{}", env!("CARGO_PKG_VERSION"));

    let decoder = decoder_from_config(&config.audio);
    let bitrate = config.audio.bitrate_kbps;
    let load_started = Instant::now();
    let catalog = Arc::new(SoundCatalog::load(&config.sounds, decoder.as_ref(), || {
        OpusFrameEncoder::new(bitrate)
    }));
    info!(
        "Loaded {}/{} playable sounds in {:?}",
        catalog.playable_count(),
        catalog.len(),
        load_started.elapsed()
    );

    let transport: Arc<dyn VoiceTransport> = if config.voice.endpoints.is_empty() {
        warn!("No voice endpoints configured, frames will not leave the process");
        Arc::new(MemoryTransport::paced(std::time::Duration::from_millis(
            FRAME_DURATION_MS,
        )))
    } else {
        let udp = UdpTransport::from_config(&config.voice);
        info!("Streaming to {} voice endpoints", udp.endpoint_count());
        Arc::new(udp)
    };

    let stats = Arc::new(
        PlayStats::new().map_err(|e| format!("failed to set up metrics: {e}"))?,
    );
    let scheduler = Arc::new(Scheduler::new(
        config.playback.clone(),
        catalog.clone(),
        transport,
        stats.clone(),
        Arc::new(SharedRng::from_entropy()),
    ));

    let voice_states = Arc::new(VoiceStateCache::new());
    let dispatcher = Dispatcher::new(
        scheduler.clone(),
        voice_states.clone(),
        stats.clone(),
        config.trigger.prefix.clone(),
    );

    let address = format!("{}:{}", config.server.host, config.server.port);
    let state = Arc::new(AppState {
        config,
        catalog,
        scheduler,
        stats,
        started: Instant::now(),
    });

    let listener = tokio::net::TcpListener::bind(address.as_str()).await?;
    info!("HTTP API listening on {}", address);
    let app = transport::http_server::router(state);
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("HTTP server stopped: {}", e);
        }
    });

    let stdin = BufReader::new(tokio::io::stdin());
    tokio::select! {
        _ = console::run(stdin, voice_states, dispatcher) => {}
        _ = tokio::signal::ctrl_c() => info!("Received Ctrl-C, shutting down"),
    }

    Ok(())
}
