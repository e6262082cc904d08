use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{Trigger, command::parse_command, locator::ChannelLocator};
use crate::{
    common::types::{GuildId, UserId},
    monitoring::StatsSink,
    playback::{PlayRequest, Scheduler, SubmitOutcome},
};

/// What became of a trigger.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// The issuer is not in a voice channel of that guild.
    Unresolved,
    Submitted(SubmitOutcome),
}

/// Turns triggers into scheduled plays, one task per trigger.
#[derive(Clone)]
pub struct Dispatcher {
    scheduler: Arc<Scheduler>,
    locator: Arc<dyn ChannelLocator>,
    stats: Arc<dyn StatsSink>,
    prefix: String,
}

impl Dispatcher {
    pub fn new(
        scheduler: Arc<Scheduler>,
        locator: Arc<dyn ChannelLocator>,
        stats: Arc<dyn StatsSink>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            scheduler,
            locator,
            stats,
            prefix: prefix.into(),
        }
    }

    /// Dispatch `content` if it is a command. Other messages are ignored.
    pub fn handle_message(
        &self,
        guild: GuildId,
        issuer: UserId,
        content: &str,
    ) -> Option<JoinHandle<DispatchOutcome>> {
        let command = parse_command(content, &self.prefix)?;
        self.stats.record_command();
        Some(self.dispatch(Trigger {
            guild,
            issuer,
            sound: command.sound,
        }))
    }

    /// Resolve and submit on a task of its own, so a long session never
    /// blocks the caller.
    pub fn dispatch(&self, trigger: Trigger) -> JoinHandle<DispatchOutcome> {
        let this = self.clone();
        tokio::spawn(async move { this.resolve_and_submit(trigger).await })
    }

    pub async fn resolve_and_submit(&self, trigger: Trigger) -> DispatchOutcome {
        let Some(channel) = self
            .locator
            .current_channel(trigger.guild, trigger.issuer)
            .await
        else {
            warn!(
                "[{}] Failed to find a voice channel for user {}",
                trigger.guild, trigger.issuer
            );
            return DispatchOutcome::Unresolved;
        };

        let sound = trigger.sound.as_deref().and_then(|name| {
            let found = self.scheduler.catalog().lookup(name);
            if found.is_none() {
                debug!("Unknown sound '{}', picking one at random", name);
            }
            found
        });

        let request = PlayRequest::new(trigger.guild, channel, sound);
        DispatchOutcome::Submitted(self.scheduler.submit(request).await)
    }
}
