use std::collections::BTreeMap;

use prometheus::{
    Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder, core::Collector,
};
use serde::Serialize;
use tracing::warn;

use crate::common::types::{ChannelId, GuildId};

/// Fire-and-forget play counters. Implementations must never block or fail
/// the caller.
pub trait StatsSink: Send + Sync {
    /// A trigger command was recognised.
    fn record_command(&self);

    /// A sound is about to be streamed.
    fn record_play(&self, guild: GuildId, channel: ChannelId, sound: &str);
}

/// Prometheus-backed counters.
pub struct PlayStats {
    registry: Registry,
    commands: IntCounter,
    plays: IntCounter,
    sound_plays: IntCounterVec,
    guild_plays: IntCounterVec,
    channel_plays: IntCounterVec,
}

/// Totals for the `/stats` endpoint.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub commands: u64,
    pub plays: u64,
    pub sounds: BTreeMap<String, u64>,
    pub guilds: BTreeMap<String, u64>,
}

impl PlayStats {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new_custom(Some("airhorn".to_string()), None)?;

        let commands = IntCounter::new("commands_total", "Recognised trigger commands")?;
        let plays = IntCounter::new("plays_total", "Sounds streamed")?;
        let sound_plays = IntCounterVec::new(
            Opts::new("sound_plays_total", "Sounds streamed, by sound"),
            &["sound"],
        )?;
        let guild_plays = IntCounterVec::new(
            Opts::new("guild_plays_total", "Sounds streamed, by guild"),
            &["guild"],
        )?;
        let channel_plays = IntCounterVec::new(
            Opts::new("channel_plays_total", "Sounds streamed, by guild and channel"),
            &["guild", "channel"],
        )?;

        registry.register(Box::new(commands.clone()))?;
        registry.register(Box::new(plays.clone()))?;
        registry.register(Box::new(sound_plays.clone()))?;
        registry.register(Box::new(guild_plays.clone()))?;
        registry.register(Box::new(channel_plays.clone()))?;

        Ok(Self {
            registry,
            commands,
            plays,
            sound_plays,
            guild_plays,
            channel_plays,
        })
    }

    /// Prometheus text exposition of every counter.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            commands: self.commands.get(),
            plays: self.plays.get(),
            sounds: by_first_label(&self.sound_plays),
            guilds: by_first_label(&self.guild_plays),
        }
    }

    fn bump(counters: &IntCounterVec, labels: &[&str]) {
        match counters.get_metric_with_label_values(labels) {
            Ok(counter) => counter.inc(),
            Err(e) => warn!("Failed to track stats for {:?}: {}", labels, e),
        }
    }
}

fn by_first_label(counters: &IntCounterVec) -> BTreeMap<String, u64> {
    counters
        .collect()
        .iter()
        .flat_map(|family| family.get_metric())
        .filter_map(|metric| {
            let label = metric.get_label().first()?.get_value().to_string();
            Some((label, metric.get_counter().get_value() as u64))
        })
        .collect()
}

impl StatsSink for PlayStats {
    fn record_command(&self) {
        self.commands.inc();
    }

    fn record_play(&self, guild: GuildId, channel: ChannelId, sound: &str) {
        let guild = guild.to_string();
        let channel = channel.to_string();

        self.plays.inc();
        Self::bump(&self.sound_plays, &[sound]);
        Self::bump(&self.guild_plays, &[&guild]);
        Self::bump(&self.channel_plays, &[&guild, &channel]);
    }
}
