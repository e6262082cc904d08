//! Voice transport seam.
//!
//! The scheduler only talks to [`VoiceTransport`] and [`VoiceConnection`];
//! [`UdpTransport`] is the concrete RTP-over-UDP implementation and
//! [`MemoryTransport`] the in-process one used for dry runs.

pub mod constants;
pub mod memory;
pub mod rtp;
pub mod udp;

use async_trait::async_trait;

pub use memory::{MemoryTransport, VoiceEvent};
pub use rtp::RtpPacketizer;
pub use udp::UdpTransport;

use crate::common::{
    errors::TransportError,
    types::{ChannelId, Frame, GuildId},
};

/// Opens connections to voice channels.
#[async_trait]
pub trait VoiceTransport: Send + Sync {
    async fn join_channel(
        &self,
        guild: GuildId,
        channel: ChannelId,
    ) -> Result<Box<dyn VoiceConnection>, TransportError>;
}

/// One live connection inside a guild. Owned by exactly one playback session.
#[async_trait]
pub trait VoiceConnection: Send {
    /// Channel the connection is currently in.
    fn channel_id(&self) -> ChannelId;

    async fn wait_until_ready(&mut self) -> Result<(), TransportError>;

    async fn change_channel(&mut self, channel: ChannelId) -> Result<(), TransportError>;

    async fn set_speaking(&mut self, speaking: bool) -> Result<(), TransportError>;

    /// Deliver one frame. Returns once the sink accepted it, which paces the
    /// caller to real time.
    async fn send_frame(&mut self, frame: Frame) -> Result<(), TransportError>;

    async fn close(self: Box<Self>);
}
