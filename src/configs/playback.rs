use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::common::types::AnyResult;

/// Scheduler and session tuning.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PlaybackConfig {
    /// Pending requests kept per guild while a session is active.
    #[serde(default = "default_max_queue_size")]
    pub max_queue_size: usize,
    /// First play of a session is delayed with probability `1 / jitter_chance`.
    /// `0` disables jitter.
    #[serde(default = "default_jitter_chance")]
    pub jitter_chance: u32,
    #[serde(default = "default_jitter_min_ms")]
    pub jitter_min_ms: u64,
    #[serde(default = "default_jitter_max_ms")]
    pub jitter_max_ms: u64,
    /// Wait after moving the connection to another channel.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    /// Wait after the queue drained, before the connection is released.
    #[serde(default = "default_grace_delay_ms")]
    pub grace_delay_ms: u64,
}

impl PlaybackConfig {
    pub fn validate(&self) -> AnyResult<()> {
        if self.jitter_chance != 0 && self.jitter_min_ms >= self.jitter_max_ms {
            return Err(format!(
                "playback.jitter_min_ms ({}) must be below jitter_max_ms ({})",
                self.jitter_min_ms, self.jitter_max_ms
            )
            .into());
        }
        Ok(())
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn grace_delay(&self) -> Duration {
        Duration::from_millis(self.grace_delay_ms)
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            max_queue_size: default_max_queue_size(),
            jitter_chance: default_jitter_chance(),
            jitter_min_ms: default_jitter_min_ms(),
            jitter_max_ms: default_jitter_max_ms(),
            settle_delay_ms: default_settle_delay_ms(),
            grace_delay_ms: default_grace_delay_ms(),
        }
    }
}

fn default_max_queue_size() -> usize {
    6
}

fn default_jitter_chance() -> u32 {
    9
}

fn default_jitter_min_ms() -> u64 {
    1_000
}

fn default_jitter_max_ms() -> u64 {
    5_000
}

fn default_settle_delay_ms() -> u64 {
    200
}

fn default_grace_delay_ms() -> u64 {
    350
}
