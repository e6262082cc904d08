use std::{collections::HashSet, sync::Arc, time::Duration};

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{debug, trace};

use super::{VoiceConnection, VoiceTransport};
use crate::common::{
    errors::TransportError,
    types::{ChannelId, Frame, GuildId},
};

/// Something a [`MemoryConnection`] was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceEvent {
    Joined { guild: GuildId, channel: ChannelId },
    Moved { guild: GuildId, channel: ChannelId },
    Speaking { guild: GuildId, speaking: bool },
    Frame {
        guild: GuildId,
        channel: ChannelId,
        frame: Frame,
    },
    Closed { guild: GuildId },
}

#[derive(Default)]
struct Shared {
    events: Mutex<Vec<VoiceEvent>>,
    open: DashMap<GuildId, usize>,
    peak: DashMap<GuildId, usize>,
    refused: Mutex<HashSet<ChannelId>>,
}

impl Shared {
    fn push(&self, event: VoiceEvent) {
        self.events.lock().push(event);
    }
}

/// Transport that delivers frames nowhere and remembers what happened.
///
/// Used for dry runs when no voice endpoints are configured. `pace` sleeps
/// once per frame so a dry run takes as long as a real one.
#[derive(Clone, Default)]
pub struct MemoryTransport {
    shared: Arc<Shared>,
    pace: Option<Duration>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paced(frame_duration: Duration) -> Self {
        Self {
            pace: Some(frame_duration),
            ..Self::default()
        }
    }

    /// Joins and moves into `channel` fail from now on.
    pub fn refuse(&self, channel: ChannelId) {
        self.shared.refused.lock().insert(channel);
    }

    pub fn events(&self) -> Vec<VoiceEvent> {
        self.shared.events.lock().clone()
    }

    pub fn open_connections(&self, guild: GuildId) -> usize {
        self.shared.open.get(&guild).map_or(0, |n| *n)
    }

    /// Highest number of simultaneously open connections seen for `guild`.
    pub fn peak_connections(&self, guild: GuildId) -> usize {
        self.shared.peak.get(&guild).map_or(0, |n| *n)
    }

    fn is_refused(&self, channel: ChannelId) -> bool {
        self.shared.refused.lock().contains(&channel)
    }
}

#[async_trait]
impl VoiceTransport for MemoryTransport {
    async fn join_channel(
        &self,
        guild: GuildId,
        channel: ChannelId,
    ) -> Result<Box<dyn VoiceConnection>, TransportError> {
        if self.is_refused(channel) {
            return Err(TransportError::Join(channel, "refused".into()));
        }

        let open = {
            let mut open = self.shared.open.entry(guild).or_insert(0);
            *open += 1;
            *open
        };
        self.shared
            .peak
            .entry(guild)
            .and_modify(|peak| *peak = (*peak).max(open))
            .or_insert(open);
        self.shared.push(VoiceEvent::Joined { guild, channel });
        debug!("[{}] Memory connection opened in {}", guild, channel);

        Ok(Box::new(MemoryConnection {
            transport: self.clone(),
            guild,
            channel,
        }))
    }
}

pub struct MemoryConnection {
    transport: MemoryTransport,
    guild: GuildId,
    channel: ChannelId,
}

#[async_trait]
impl VoiceConnection for MemoryConnection {
    fn channel_id(&self) -> ChannelId {
        self.channel
    }

    async fn wait_until_ready(&mut self) -> Result<(), TransportError> {
        Ok(())
    }

    async fn change_channel(&mut self, channel: ChannelId) -> Result<(), TransportError> {
        if self.transport.is_refused(channel) {
            return Err(TransportError::ChangeChannel(channel, "refused".into()));
        }
        self.channel = channel;
        self.transport.shared.push(VoiceEvent::Moved {
            guild: self.guild,
            channel,
        });
        Ok(())
    }

    async fn set_speaking(&mut self, speaking: bool) -> Result<(), TransportError> {
        self.transport.shared.push(VoiceEvent::Speaking {
            guild: self.guild,
            speaking,
        });
        Ok(())
    }

    async fn send_frame(&mut self, frame: Frame) -> Result<(), TransportError> {
        if self.transport.is_refused(self.channel) {
            return Err(TransportError::Closed);
        }
        if let Some(pace) = self.transport.pace {
            tokio::time::sleep(pace).await;
        }
        trace!("[{}] Frame of {} bytes", self.guild, frame.len());
        self.transport.shared.push(VoiceEvent::Frame {
            guild: self.guild,
            channel: self.channel,
            frame,
        });
        Ok(())
    }

    async fn close(self: Box<Self>) {
        if let Some(mut open) = self.transport.shared.open.get_mut(&self.guild) {
            *open = open.saturating_sub(1);
        }
        self.transport
            .shared
            .push(VoiceEvent::Closed { guild: self.guild });
        debug!("[{}] Memory connection closed", self.guild);
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;

    #[tokio::test]
    async fn records_connection_lifecycle() {
        let transport = MemoryTransport::new();
        let mut conn = transport
            .join_channel(GuildId(1), ChannelId(2))
            .await
            .expect("join");
        assert_eq!(transport.open_connections(GuildId(1)), 1);

        conn.change_channel(ChannelId(3)).await.expect("move");
        conn.send_frame(Bytes::from_static(b"x")).await.expect("send");
        conn.close().await;

        assert_eq!(transport.open_connections(GuildId(1)), 0);
        assert_eq!(transport.peak_connections(GuildId(1)), 1);
        assert_eq!(
            transport.events(),
            vec![
                VoiceEvent::Joined {
                    guild: GuildId(1),
                    channel: ChannelId(2),
                },
                VoiceEvent::Moved {
                    guild: GuildId(1),
                    channel: ChannelId(3),
                },
                VoiceEvent::Frame {
                    guild: GuildId(1),
                    channel: ChannelId(3),
                    frame: Bytes::from_static(b"x"),
                },
                VoiceEvent::Closed { guild: GuildId(1) },
            ]
        );
    }

    #[tokio::test]
    async fn refused_channel_fails_join() {
        let transport = MemoryTransport::new();
        transport.refuse(ChannelId(9));
        let err = transport
            .join_channel(GuildId(1), ChannelId(9))
            .await
            .err()
            .expect("refused");
        assert!(matches!(err, TransportError::Join(ChannelId(9), _)));
        assert_eq!(transport.peak_connections(GuildId(1)), 0);
    }
}
