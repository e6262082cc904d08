use std::{collections::VecDeque, sync::Arc};

use dashmap::{DashMap, mapref::entry::Entry};
use tracing::debug;

use super::{
    request::PlayRequest,
    session::PlaybackSession,
    state::SubmitOutcome,
};
use crate::{
    audio::{SoundCatalog, WeightedSelector},
    common::{rng::SharedRng, types::GuildId},
    configs::PlaybackConfig,
    monitoring::StatsSink,
    voice::VoiceTransport,
};

enum Admission {
    /// No session was active; the caller now owns the guild.
    Lead(PlayRequest),
    Queued(usize),
    Dropped,
}

/// Owns the per-guild queues.
///
/// A guild has an entry in `queues` exactly while a session for it is
/// active. The entry holds requests waiting behind the one being played.
pub struct Scheduler {
    queues: DashMap<GuildId, VecDeque<PlayRequest>>,
    pub(super) config: PlaybackConfig,
    pub(super) catalog: Arc<SoundCatalog>,
    pub(super) selector: WeightedSelector,
    pub(super) rng: Arc<SharedRng>,
    pub(super) transport: Arc<dyn VoiceTransport>,
    pub(super) stats: Arc<dyn StatsSink>,
}

impl Scheduler {
    pub fn new(
        config: PlaybackConfig,
        catalog: Arc<SoundCatalog>,
        transport: Arc<dyn VoiceTransport>,
        stats: Arc<dyn StatsSink>,
        rng: Arc<SharedRng>,
    ) -> Self {
        Self {
            queues: DashMap::new(),
            config,
            catalog,
            selector: WeightedSelector::new(rng.clone()),
            rng,
            transport,
            stats,
        }
    }

    /// Play `request` now if its guild is idle, otherwise queue it.
    ///
    /// When this call starts the session it only returns once the session
    /// has ended, which includes every request queued behind it.
    pub async fn submit(&self, request: PlayRequest) -> SubmitOutcome {
        let guild = request.guild;
        match self.admit(request) {
            Admission::Lead(request) => {
                SubmitOutcome::Ran(PlaybackSession::new(self, guild).run(request).await)
            }
            Admission::Queued(position) => {
                debug!("[{}] Request queued at position {}", guild, position);
                SubmitOutcome::Queued { position }
            }
            Admission::Dropped => {
                debug!(
                    "[{}] Queue full ({} pending), request dropped",
                    guild, self.config.max_queue_size
                );
                SubmitOutcome::Dropped
            }
        }
    }

    /// Check-then-create-or-enqueue under the shard lock.
    fn admit(&self, request: PlayRequest) -> Admission {
        match self.queues.entry(request.guild) {
            Entry::Occupied(mut entry) => {
                let queue = entry.get_mut();
                if queue.len() < self.config.max_queue_size {
                    queue.push_back(request);
                    Admission::Queued(queue.len())
                } else {
                    Admission::Dropped
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(VecDeque::with_capacity(self.config.max_queue_size));
                Admission::Lead(request)
            }
        }
    }

    /// Next waiting request, leaving the guild marked active.
    pub(super) fn next_queued(&self, guild: GuildId) -> Option<PlayRequest> {
        self.queues.get_mut(&guild)?.pop_front()
    }

    /// Pop the next request, or release the guild if nothing is waiting.
    /// Both happen under the same lock, so a request is never stranded.
    pub(super) fn next_or_release(&self, guild: GuildId) -> Option<PlayRequest> {
        match self.queues.entry(guild) {
            Entry::Occupied(mut entry) => {
                let next = entry.get_mut().pop_front();
                if next.is_none() {
                    entry.remove();
                }
                next
            }
            Entry::Vacant(_) => None,
        }
    }

    /// Release the guild and discard whatever was waiting. Returns how many
    /// requests were discarded.
    pub(super) fn abandon(&self, guild: GuildId) -> usize {
        self.queues
            .remove(&guild)
            .map_or(0, |(_, pending)| pending.len())
    }

    pub fn is_active(&self, guild: GuildId) -> bool {
        self.queues.contains_key(&guild)
    }

    /// Requests waiting behind the active session, `None` when idle.
    pub fn pending(&self, guild: GuildId) -> Option<usize> {
        self.queues.get(&guild).map(|q| q.len())
    }

    /// Active guilds with their pending counts.
    pub fn active_guilds(&self) -> Vec<(GuildId, usize)> {
        self.queues
            .iter()
            .map(|entry| (*entry.key(), entry.value().len()))
            .collect()
    }

    pub fn catalog(&self) -> &Arc<SoundCatalog> {
        &self.catalog
    }
}
