use std::sync::Arc;

use crate::{
    audio::Sound,
    common::types::{ChannelId, GuildId},
};

/// A pending play in one guild.
#[derive(Debug, Clone)]
pub struct PlayRequest {
    pub guild: GuildId,
    /// Voice channel to play in, already resolved from the issuer.
    pub channel: ChannelId,
    /// `None` picks a weighted random sound right before streaming.
    pub sound: Option<Arc<Sound>>,
}

impl PlayRequest {
    pub fn new(guild: GuildId, channel: ChannelId, sound: Option<Arc<Sound>>) -> Self {
        Self {
            guild,
            channel,
            sound,
        }
    }
}
