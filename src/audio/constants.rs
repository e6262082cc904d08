//! Central constants for the audio pipeline.

// ── Sample / PCM ─────────────────────────────────────────────────────────────

/// Output sample rate of every frame (Hz).
pub const TARGET_SAMPLE_RATE: u32 = 48_000;

/// Interleaved channel count of decoded PCM.
pub const CHANNELS: usize = 2;

/// Samples per channel in one frame (20 ms at 48 kHz).
pub const FRAME_SAMPLES_PER_CHANNEL: usize = 960;

/// Interleaved i16 samples in one frame chunk (960 × 2 channels).
pub const FRAME_SIZE_SAMPLES: usize = FRAME_SAMPLES_PER_CHANNEL * CHANNELS;

/// Bytes of s16le PCM in one frame chunk.
pub const FRAME_SIZE_BYTES: usize = FRAME_SIZE_SAMPLES * 2;

/// Duration of one frame (ms).
pub const FRAME_DURATION_MS: u64 = 20;

// ── Codec ─────────────────────────────────────────────────────────────────────

/// Upper bound for one encoded Opus packet.
pub const MAX_OPUS_PACKET_SIZE: usize = 4_000;

// ── Transcoding ──────────────────────────────────────────────────────────────

/// Capacity of the chunk hand-off between the reader and the encode worker.
pub const ENCODE_QUEUE_CAPACITY: usize = 10;
