use std::{collections::HashMap, net::SocketAddr, sync::Arc, time::Duration};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::{
    net::UdpSocket,
    time::{Interval, MissedTickBehavior},
};
use tracing::{debug, trace};

use super::{
    RtpPacketizer, VoiceConnection, VoiceTransport,
    constants::{SILENCE_FRAME, TRAILING_SILENCE_FRAMES},
};
use crate::{
    audio::constants::FRAME_DURATION_MS,
    common::{
        errors::TransportError,
        types::{ChannelId, Frame, GuildId},
    },
    configs::VoiceConfig,
};

type EndpointMap = HashMap<(GuildId, ChannelId), SocketAddr>;

/// Streams frames as RTP packets to a per-channel UDP endpoint.
pub struct UdpTransport {
    bind: SocketAddr,
    ssrc: u32,
    endpoints: Arc<EndpointMap>,
}

impl UdpTransport {
    pub fn from_config(config: &VoiceConfig) -> Self {
        let endpoints = config
            .endpoints
            .iter()
            .map(|e| ((e.guild, e.channel), e.address))
            .collect();
        Self {
            bind: config.bind,
            ssrc: config.ssrc,
            endpoints: Arc::new(endpoints),
        }
    }

    pub fn endpoint_count(&self) -> usize {
        self.endpoints.len()
    }
}

fn resolve(
    endpoints: &EndpointMap,
    guild: GuildId,
    channel: ChannelId,
) -> Result<SocketAddr, TransportError> {
    endpoints
        .get(&(guild, channel))
        .copied()
        .ok_or(TransportError::UnknownDestination { guild, channel })
}

#[async_trait]
impl VoiceTransport for UdpTransport {
    async fn join_channel(
        &self,
        guild: GuildId,
        channel: ChannelId,
    ) -> Result<Box<dyn VoiceConnection>, TransportError> {
        let address = resolve(&self.endpoints, guild, channel)?;
        let socket = UdpSocket::bind(self.bind)
            .await
            .map_err(|e| TransportError::Join(channel, e.to_string()))?;
        socket
            .connect(address)
            .await
            .map_err(|e| TransportError::Join(channel, e.to_string()))?;

        debug!("[{}] Joined channel {} via {}", guild, channel, address);
        Ok(Box::new(UdpConnection {
            guild,
            channel,
            socket,
            endpoints: self.endpoints.clone(),
            rtp: RtpPacketizer::new(self.ssrc),
            pacer: None,
        }))
    }
}

struct UdpConnection {
    guild: GuildId,
    channel: ChannelId,
    socket: UdpSocket,
    endpoints: Arc<EndpointMap>,
    rtp: RtpPacketizer,
    /// 20 ms frame clock; `None` until ready.
    pacer: Option<Interval>,
}

impl UdpConnection {
    fn new_pacer() -> Interval {
        let mut pacer = tokio::time::interval(Duration::from_millis(FRAME_DURATION_MS));
        pacer.set_missed_tick_behavior(MissedTickBehavior::Skip);
        pacer
    }
}

#[async_trait]
impl VoiceConnection for UdpConnection {
    fn channel_id(&self) -> ChannelId {
        self.channel
    }

    async fn wait_until_ready(&mut self) -> Result<(), TransportError> {
        self.socket
            .peer_addr()
            .map_err(|e| TransportError::NotReady(e.to_string()))?;
        self.pacer = Some(Self::new_pacer());
        Ok(())
    }

    async fn change_channel(&mut self, channel: ChannelId) -> Result<(), TransportError> {
        let address = resolve(&self.endpoints, self.guild, channel)?;
        self.socket
            .connect(address)
            .await
            .map_err(|e| TransportError::ChangeChannel(channel, e.to_string()))?;
        debug!(
            "[{}] Moved from channel {} to {}",
            self.guild, self.channel, channel
        );
        self.channel = channel;
        Ok(())
    }

    async fn set_speaking(&mut self, speaking: bool) -> Result<(), TransportError> {
        trace!("[{}] speaking={}", self.guild, speaking);
        if speaking {
            // Restart the clock so the first frame leaves immediately.
            self.pacer = Some(Self::new_pacer());
            return Ok(());
        }

        for _ in 0..TRAILING_SILENCE_FRAMES {
            self.send_frame(Bytes::from_static(&SILENCE_FRAME)).await?;
        }
        Ok(())
    }

    async fn send_frame(&mut self, frame: Frame) -> Result<(), TransportError> {
        let pacer = self.pacer.as_mut().ok_or(TransportError::Closed)?;
        pacer.tick().await;

        let packet = self.rtp.packetize(&frame);
        self.socket.send(packet).await?;
        Ok(())
    }

    async fn close(self: Box<Self>) {
        debug!("[{}] Leaving channel {}", self.guild, self.channel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configs::VoiceEndpoint;

    async fn transport_to(receiver: &UdpSocket) -> UdpTransport {
        let address = receiver.local_addr().expect("receiver address");
        UdpTransport::from_config(&VoiceConfig {
            bind: "127.0.0.1:0".parse().expect("bind address"),
            ssrc: 7,
            endpoints: vec![VoiceEndpoint {
                guild: GuildId(1),
                channel: ChannelId(10),
                address,
            }],
        })
    }

    #[tokio::test]
    async fn unknown_destination_is_rejected() {
        let receiver = UdpSocket::bind("127.0.0.1:0").await.expect("bind");
        let transport = transport_to(&receiver).await;
        let err = transport
            .join_channel(GuildId(1), ChannelId(99))
            .await
            .err()
            .expect("no endpoint for channel 99");
        assert!(matches!(err, TransportError::UnknownDestination { .. }));
    }

    #[tokio::test]
    async fn frames_arrive_as_rtp_packets() {
        let receiver = UdpSocket::bind("127.0.0.1:0").await.expect("bind");
        let transport = transport_to(&receiver).await;

        let mut conn = transport
            .join_channel(GuildId(1), ChannelId(10))
            .await
            .expect("join");
        conn.wait_until_ready().await.expect("ready");
        conn.set_speaking(true).await.expect("speaking");
        conn.send_frame(Bytes::from_static(b"opus-0")).await.expect("send");
        conn.send_frame(Bytes::from_static(b"opus-1")).await.expect("send");

        let mut buf = [0u8; 64];
        for (seq, payload) in [(0u16, b"opus-0"), (1, b"opus-1")] {
            let n = receiver.recv(&mut buf).await.expect("recv");
            assert_eq!(u16::from_be_bytes([buf[2], buf[3]]), seq);
            assert_eq!(&buf[12..n], payload);
        }
        conn.close().await;
    }

    #[tokio::test]
    async fn frames_before_ready_are_refused() {
        let receiver = UdpSocket::bind("127.0.0.1:0").await.expect("bind");
        let transport = transport_to(&receiver).await;
        let mut conn = transport
            .join_channel(GuildId(1), ChannelId(10))
            .await
            .expect("join");
        let err = conn.send_frame(Bytes::new()).await.expect_err("not ready");
        assert!(matches!(err, TransportError::Closed));
    }
}
