pub mod opus_encoder;

pub use opus_encoder::OpusFrameEncoder;

use crate::common::{errors::LoadError, types::Frame};

/// Compresses one PCM chunk into one opaque frame.
///
/// Chunks are encoded independently, one call per 20 ms chunk, in order.
pub trait FrameEncoder: Send + 'static {
    fn encode(&mut self, pcm: &[i16]) -> Result<Frame, LoadError>;
}
