use std::{sync::Arc, time::Duration};

use tokio::time::sleep;
use tracing::{Instrument, debug, error, info, info_span, warn};

use super::{
    request::PlayRequest,
    scheduler::Scheduler,
    state::{SessionEnd, SessionState},
};
use crate::{
    audio::Sound,
    common::{errors::TransportError, types::GuildId},
    voice::VoiceConnection,
};

/// One guild's run from join to release. Owns the connection for its whole
/// lifetime.
pub(super) struct PlaybackSession<'a> {
    scheduler: &'a Scheduler,
    guild: GuildId,
    state: SessionState,
    plays: usize,
}

impl<'a> PlaybackSession<'a> {
    pub(super) fn new(scheduler: &'a Scheduler, guild: GuildId) -> Self {
        Self {
            scheduler,
            guild,
            state: SessionState::Joining,
            plays: 0,
        }
    }

    pub(super) async fn run(self, first: PlayRequest) -> SessionEnd {
        let span = info_span!("playback", guild = %self.guild);
        self.drive(first).instrument(span).await
    }

    async fn drive(mut self, first: PlayRequest) -> SessionEnd {
        let mut conn = match self.join(&first).await {
            Ok(conn) => conn,
            Err(error) => return self.abort(error),
        };

        self.enter(SessionState::Jittering);
        self.jitter().await;

        let mut request = first;
        loop {
            self.enter(SessionState::Streaming);
            if let Err(error) = self.stream(conn.as_mut(), request).await {
                conn.close().await;
                return self.abort(error);
            }

            self.enter(SessionState::Draining);
            if let Some(next) = self.scheduler.next_queued(self.guild) {
                request = next;
                continue;
            }

            self.enter(SessionState::Closing);
            sleep(self.scheduler.config.grace_delay()).await;
            if let Some(next) = self.scheduler.next_queued(self.guild) {
                debug!("Request arrived during grace delay, keeping connection");
                request = next;
                continue;
            }

            // The guild stays claimed until the connection is gone.
            conn.close().await;
            match self.scheduler.next_or_release(self.guild) {
                None => {
                    info!("Session ended after {} plays", self.plays);
                    return SessionEnd::Drained { plays: self.plays };
                }
                Some(next) => {
                    debug!("Request arrived while closing, joining again");
                    self.enter(SessionState::Joining);
                    conn = match self.join(&next).await {
                        Ok(conn) => conn,
                        Err(error) => return self.abort(error),
                    };
                    request = next;
                }
            }
        }
    }

    fn enter(&mut self, state: SessionState) {
        debug!("{} -> {}", self.state, state);
        self.state = state;
    }

    async fn join(
        &self,
        request: &PlayRequest,
    ) -> Result<Box<dyn VoiceConnection>, TransportError> {
        debug!("Joining {}", request.channel);
        let mut conn = self
            .scheduler
            .transport
            .join_channel(self.guild, request.channel)
            .await?;
        if let Err(e) = conn.wait_until_ready().await {
            conn.close().await;
            return Err(e);
        }
        Ok(conn)
    }

    /// Delay the first play of the session, sometimes.
    async fn jitter(&self) {
        let config = &self.scheduler.config;
        if !self.scheduler.rng.one_in(config.jitter_chance) {
            return;
        }
        let ms = if config.jitter_max_ms > config.jitter_min_ms {
            self.scheduler
                .rng
                .below(config.jitter_min_ms..config.jitter_max_ms)
        } else {
            config.jitter_min_ms
        };
        debug!("Jitter delay of {}ms", ms);
        sleep(Duration::from_millis(ms)).await;
    }

    async fn stream(
        &mut self,
        conn: &mut dyn VoiceConnection,
        request: PlayRequest,
    ) -> Result<(), TransportError> {
        let Some(sound) = self.resolve(request.sound) else {
            warn!("No sound available to pick from, skipping request");
            return Ok(());
        };
        if !sound.is_playable() {
            warn!("Sound '{}' has no frames, skipping", sound.name());
            return Ok(());
        }

        if conn.channel_id() != request.channel {
            conn.change_channel(request.channel).await?;
            sleep(self.scheduler.config.settle_delay()).await;
        }

        self.scheduler
            .stats
            .record_play(self.guild, request.channel, sound.name());
        info!("Playing '{}' in {}", sound.name(), request.channel);

        conn.set_speaking(true).await?;
        for frame in sound.frames() {
            conn.send_frame(frame.clone()).await?;
        }
        if let Err(e) = conn.set_speaking(false).await {
            warn!("Failed to clear speaking state: {}", e);
        }

        self.plays += 1;
        Ok(())
    }

    fn resolve(&self, sound: Option<Arc<Sound>>) -> Option<Arc<Sound>> {
        sound.or_else(|| {
            self.scheduler
                .selector
                .select(self.scheduler.catalog.all())
                .cloned()
        })
    }

    fn abort(&self, error: TransportError) -> SessionEnd {
        let dropped = self.scheduler.abandon(self.guild);
        error!(
            "Voice connection failed during {}: {} ({} queued requests dropped)",
            self.state, error, dropped
        );
        SessionEnd::Aborted {
            plays: self.plays,
            dropped,
            error,
        }
    }
}
