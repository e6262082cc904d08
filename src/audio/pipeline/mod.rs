//! Asset → frames transcoding.
//!
//! A [`PcmDecoder`] turns a named asset into a stream of raw s16le 48 kHz
//! stereo PCM; [`transcode`] cuts that stream into 20 ms chunks and hands them
//! to an encode worker which produces one frame per chunk, in read order.

pub mod decoder;
pub mod native;
pub mod transcode;

pub use decoder::{FfmpegDecoder, PcmDecoder, PcmStream, decoder_from_config};
pub use native::SymphoniaDecoder;
pub use transcode::transcode;
