use thiserror::Error;

use crate::common::types::{ChannelId, Frame, GuildId};

/// Failure while turning a raw asset into frames. Fatal to one sound only.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("asset not found: {0}")]
    AssetNotFound(String),

    #[error("failed to spawn decoder: {0}")]
    DecoderSpawn(#[source] std::io::Error),

    #[error("decoder produced no output stream")]
    MissingOutput,

    #[error("failed to read PCM chunk: {0}")]
    ChunkRead(#[source] std::io::Error),

    #[error("unsupported asset: {0}")]
    Unsupported(String),

    #[error("encoder initialization failed: {0}")]
    EncoderInit(String),

    #[error("encoding failed: {0}")]
    Encode(String),

    #[error("failed to start encode worker: {0}")]
    WorkerSpawn(#[source] std::io::Error),

    #[error("encode worker panicked")]
    WorkerPanicked,
}

/// Transcoding stopped early. Frames produced before the failure are kept.
#[derive(Error, Debug)]
#[error("transcode aborted after {} frames: {source}", frames.len())]
pub struct PartialTranscode {
    pub frames: Vec<Frame>,
    #[source]
    pub source: LoadError,
}

/// Failure of the voice transport. Fatal to the playback session.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("no voice endpoint configured for guild {guild} channel {channel}")]
    UnknownDestination { guild: GuildId, channel: ChannelId },

    #[error("failed to join channel {0}: {1}")]
    Join(ChannelId, String),

    #[error("connection never became ready: {0}")]
    NotReady(String),

    #[error("failed to move to channel {0}: {1}")]
    ChangeChannel(ChannelId, String),

    #[error("frame delivery failed: {0}")]
    Send(#[from] std::io::Error),

    #[error("connection closed")]
    Closed,
}
