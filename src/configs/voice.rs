use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

use crate::common::types::{ChannelId, GuildId};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct VoiceConfig {
    /// Local address the RTP sockets bind to.
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,
    #[serde(default = "default_ssrc")]
    pub ssrc: u32,
    #[serde(default)]
    pub endpoints: Vec<VoiceEndpoint>,
}

/// Where a destination's frames are sent.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct VoiceEndpoint {
    pub guild: GuildId,
    pub channel: ChannelId,
    pub address: SocketAddr,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            ssrc: default_ssrc(),
            endpoints: Vec::new(),
        }
    }
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 0))
}

fn default_ssrc() -> u32 {
    0x4149_5248
}
