use async_trait::async_trait;
use dashmap::DashMap;

use crate::common::types::{ChannelId, GuildId, UserId};

/// Answers "which voice channel is this user in right now".
#[async_trait]
pub trait ChannelLocator: Send + Sync {
    async fn current_channel(&self, guild: GuildId, user: UserId) -> Option<ChannelId>;
}

/// Voice channel membership, kept current from voice state updates.
#[derive(Debug, Default)]
pub struct VoiceStateCache {
    states: DashMap<(GuildId, UserId), ChannelId>,
}

impl VoiceStateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` means the user left voice in that guild.
    pub fn update(&self, guild: GuildId, user: UserId, channel: Option<ChannelId>) {
        match channel {
            Some(channel) => {
                self.states.insert((guild, user), channel);
            }
            None => {
                self.states.remove(&(guild, user));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[async_trait]
impl ChannelLocator for VoiceStateCache {
    async fn current_channel(&self, guild: GuildId, user: UserId) -> Option<ChannelId> {
        self.states.get(&(guild, user)).map(|c| *c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn tracks_joins_moves_and_leaves() {
        let cache = VoiceStateCache::new();
        let (guild, user) = (GuildId(1), UserId(2));

        assert_eq!(cache.current_channel(guild, user).await, None);

        cache.update(guild, user, Some(ChannelId(10)));
        cache.update(guild, user, Some(ChannelId(11)));
        assert_eq!(cache.current_channel(guild, user).await, Some(ChannelId(11)));
        assert_eq!(cache.current_channel(GuildId(9), user).await, None);

        cache.update(guild, user, None);
        assert_eq!(cache.current_channel(guild, user).await, None);
        assert!(cache.is_empty());
    }
}
