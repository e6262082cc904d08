pub mod audio;
pub mod common;
pub mod configs;
pub mod monitoring;
pub mod playback;
pub mod server;
pub mod transport;
pub mod trigger;
pub mod voice;
