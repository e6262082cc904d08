/// RTP version 2, no padding, no extension, no CSRC.
pub const RTP_VERSION_BYTE: u8 = 0x80;

/// Dynamic payload type conventionally used for Opus.
pub const RTP_OPUS_PAYLOAD_TYPE: u8 = 0x78;

/// RTP header length in bytes.
pub const RTP_HEADER_LEN: usize = 12;

/// Timestamp advance per 20 ms frame at the 48 kHz Opus clock.
pub const RTP_TIMESTAMP_STEP: u32 = 960;

/// Reusable packet buffer capacity.
pub const UDP_PACKET_BUF_CAPACITY: usize = 1_460;

/// Opus DTX silence frame.
pub const SILENCE_FRAME: [u8; 3] = [0xF8, 0xFF, 0xFE];

/// Silence frames sent when speaking stops, so decoders don't interpolate.
pub const TRAILING_SILENCE_FRAMES: usize = 5;
