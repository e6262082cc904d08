use audiopus::{Application, Bitrate, Channels, SampleRate, coder::Encoder as OpusEncoder};
use bytes::Bytes;

use super::FrameEncoder;
use crate::{
    audio::constants::MAX_OPUS_PACKET_SIZE,
    common::{errors::LoadError, types::Frame},
};

/// PCM i16 → Opus packet encoder.
/// Encodes 960-sample (20 ms) stereo frames at 48 kHz.
pub struct OpusFrameEncoder {
    encoder: OpusEncoder,
    out: Vec<u8>,
}

impl OpusFrameEncoder {
    /// 48 kHz stereo, AUDIO application profile, fixed bitrate.
    pub fn new(bitrate_kbps: u32) -> Result<Self, LoadError> {
        let mut encoder =
            OpusEncoder::new(SampleRate::Hz48000, Channels::Stereo, Application::Audio)
                .map_err(|e| LoadError::EncoderInit(e.to_string()))?;
        let bits = i32::try_from(bitrate_kbps.saturating_mul(1000))
            .map_err(|_| LoadError::EncoderInit(format!("bitrate {bitrate_kbps} kbps")))?;
        encoder
            .set_bitrate(Bitrate::BitsPerSecond(bits))
            .map_err(|e| LoadError::EncoderInit(e.to_string()))?;

        Ok(Self {
            encoder,
            out: vec![0u8; MAX_OPUS_PACKET_SIZE],
        })
    }
}

impl FrameEncoder for OpusFrameEncoder {
    fn encode(&mut self, pcm: &[i16]) -> Result<Frame, LoadError> {
        let size = self
            .encoder
            .encode(pcm, &mut self.out)
            .map_err(|e| LoadError::Encode(e.to_string()))?;
        Ok(Bytes::copy_from_slice(&self.out[..size]))
    }
}
