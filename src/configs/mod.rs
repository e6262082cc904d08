pub mod audio;
pub mod base;
pub mod logging;
pub mod playback;
pub mod server;
pub mod sounds;
pub mod trigger;
pub mod voice;

pub use audio::*;
pub use base::*;
pub use logging::*;
pub use playback::*;
pub use server::*;
pub use sounds::*;
pub use trigger::*;
pub use voice::*;
