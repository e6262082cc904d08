pub mod catalog;
pub mod codec;
pub mod constants;
pub mod pipeline;
pub mod resample;
pub mod selector;

pub use catalog::{Sound, SoundCatalog};
pub use codec::{FrameEncoder, OpusFrameEncoder};
pub use pipeline::{PcmDecoder, decoder_from_config};
pub use selector::WeightedSelector;
