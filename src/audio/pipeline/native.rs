use std::{
    fs::File,
    io::{self, Read},
    path::PathBuf,
};

use symphonia::core::{
    audio::SampleBuffer,
    codecs::{CODEC_TYPE_NULL, Decoder, DecoderOptions},
    errors::Error,
    formats::{FormatOptions, FormatReader},
    io::MediaSourceStream,
    meta::MetadataOptions,
    probe::Hint,
};
use tracing::{debug, warn};

use super::decoder::{PcmDecoder, PcmStream, asset_path};
use crate::{
    audio::{
        constants::{CHANNELS, TARGET_SAMPLE_RATE},
        resample::LinearResampler,
    },
    common::errors::LoadError,
    configs::AudioConfig,
};

/// Decodes assets in-process and converts them to 48 kHz stereo.
pub struct SymphoniaDecoder {
    asset_dir: PathBuf,
    extension: String,
}

impl SymphoniaDecoder {
    pub fn from_config(config: &AudioConfig) -> Self {
        Self {
            asset_dir: PathBuf::from(&config.asset_dir),
            extension: config.extension.clone(),
        }
    }
}

impl PcmDecoder for SymphoniaDecoder {
    fn open(&self, name: &str) -> Result<PcmStream, LoadError> {
        let path = asset_path(&self.asset_dir, name, &self.extension);
        let file = File::open(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => LoadError::AssetNotFound(path.display().to_string()),
            _ => LoadError::DecoderSpawn(e),
        })?;

        let mss = MediaSourceStream::new(Box::new(file), Default::default());
        let mut hint = Hint::new();
        hint.with_extension(&self.extension);

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| LoadError::Unsupported(format!("{}: {e}", path.display())))?;

        let format = probed.format;
        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| LoadError::Unsupported(format!("{}: no audio track", path.display())))?;

        let track_id = track.id;
        let source_rate = track.codec_params.sample_rate.unwrap_or(TARGET_SAMPLE_RATE);
        let decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| LoadError::Unsupported(format!("{}: {e}", path.display())))?;

        debug!(
            "{}: {} Hz source, resampling to {} Hz",
            path.display(),
            source_rate,
            TARGET_SAMPLE_RATE
        );

        Ok(Box::new(NativePcmStream {
            format,
            decoder,
            track_id,
            resampler: LinearResampler::new(source_rate, TARGET_SAMPLE_RATE, CHANNELS),
            stereo: Vec::new(),
            resampled: Vec::new(),
            pending: Vec::new(),
            offset: 0,
            finished: false,
        }))
    }
}

/// Pulls packets on demand and serves them as s16le bytes.
struct NativePcmStream {
    format: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,
    resampler: LinearResampler,
    stereo: Vec<i16>,
    resampled: Vec<i16>,
    pending: Vec<u8>,
    offset: usize,
    finished: bool,
}

impl NativePcmStream {
    /// Decode the next packet of our track into `pending`.
    /// Returns `false` at end of stream.
    fn refill(&mut self) -> io::Result<bool> {
        loop {
            let packet = match self.format.next_packet() {
                Ok(packet) => packet,
                Err(Error::IoError(e)) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    return Ok(false);
                }
                Err(Error::ResetRequired) => return Ok(false),
                Err(Error::IoError(e)) => return Err(e),
                Err(e) => return Err(io::Error::other(e)),
            };

            if packet.track_id() != self.track_id {
                continue;
            }

            let decoded = match self.decoder.decode(&packet) {
                Ok(decoded) => decoded,
                Err(Error::DecodeError(e)) => {
                    warn!("Skipping corrupt packet: {}", e);
                    continue;
                }
                Err(Error::IoError(e)) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    return Ok(false);
                }
                Err(e) => return Err(io::Error::other(e)),
            };

            let spec = *decoded.spec();
            let channels = spec.channels.count().max(1);
            let mut samples = SampleBuffer::<i16>::new(decoded.capacity() as u64, spec);
            samples.copy_interleaved_ref(decoded);

            to_stereo(samples.samples(), channels, &mut self.stereo);
            self.resampled.clear();
            self.resampler.process(&self.stereo, &mut self.resampled);

            self.pending.clear();
            self.offset = 0;
            for s in &self.resampled {
                self.pending.extend_from_slice(&s.to_le_bytes());
            }

            if !self.pending.is_empty() {
                return Ok(true);
            }
        }
    }
}

impl Read for NativePcmStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        while self.offset >= self.pending.len() {
            if self.finished || !self.refill()? {
                self.finished = true;
                return Ok(0);
            }
        }

        let n = buf.len().min(self.pending.len() - self.offset);
        buf[..n].copy_from_slice(&self.pending[self.offset..self.offset + n]);
        self.offset += n;
        Ok(n)
    }
}

/// Mono is duplicated, surround keeps the front pair.
fn to_stereo(input: &[i16], channels: usize, out: &mut Vec<i16>) {
    out.clear();
    match channels {
        1 => out.extend(input.iter().flat_map(|&s| [s, s])),
        2 => out.extend_from_slice(input),
        n => out.extend(input.chunks_exact(n).flat_map(|f| [f[0], f[1]])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mono_is_duplicated() {
        let mut out = Vec::new();
        to_stereo(&[1, 2, 3], 1, &mut out);
        assert_eq!(out, [1, 1, 2, 2, 3, 3]);
    }

    #[test]
    fn surround_keeps_front_pair() {
        let mut out = Vec::new();
        to_stereo(&[1, 2, 9, 9, 9, 9, 3, 4, 9, 9, 9, 9], 6, &mut out);
        assert_eq!(out, [1, 2, 3, 4]);
    }

    #[test]
    fn decodes_generated_wav() {
        // 0.1 s of 44.1 kHz mono 16-bit PCM
        let dir = std::env::temp_dir().join(format!("airhorn-wav-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("temp dir");
        let frames = 4_410u32;
        let mut wav = Vec::new();
        wav.extend_from_slice(b"RIFF");
        wav.extend_from_slice(&(36 + frames * 2).to_le_bytes());
        wav.extend_from_slice(b"WAVEfmt ");
        wav.extend_from_slice(&16u32.to_le_bytes());
        wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
        wav.extend_from_slice(&1u16.to_le_bytes()); // mono
        wav.extend_from_slice(&44_100u32.to_le_bytes());
        wav.extend_from_slice(&(44_100u32 * 2).to_le_bytes());
        wav.extend_from_slice(&2u16.to_le_bytes());
        wav.extend_from_slice(&16u16.to_le_bytes());
        wav.extend_from_slice(b"data");
        wav.extend_from_slice(&(frames * 2).to_le_bytes());
        for _ in 0..frames {
            wav.extend_from_slice(&1_000i16.to_le_bytes());
        }
        std::fs::write(dir.join("tone.wav"), &wav).expect("write wav");

        let decoder = SymphoniaDecoder::from_config(&AudioConfig {
            asset_dir: dir.to_string_lossy().to_string(),
            ..AudioConfig::default()
        });
        let mut pcm = Vec::new();
        decoder
            .open("tone")
            .expect("open wav")
            .read_to_end(&mut pcm)
            .expect("read pcm");

        // 0.1 s at 48 kHz stereo s16le ≈ 4_800 × 4 bytes
        let target_frames = pcm.len() / 4;
        assert!((4_790..=4_810).contains(&target_frames), "frames = {target_frames}");
        let _ = std::fs::remove_dir_all(&dir);
    }
}
