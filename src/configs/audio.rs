use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DecoderKind {
    /// External `ffmpeg` process writing raw PCM to a pipe.
    #[default]
    Ffmpeg,
    /// In-process decoding.
    Symphonia,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AudioConfig {
    #[serde(default = "default_asset_dir")]
    pub asset_dir: String,
    #[serde(default = "default_extension")]
    pub extension: String,
    #[serde(default = "default_bitrate_kbps")]
    pub bitrate_kbps: u32,
    #[serde(default)]
    pub decoder: DecoderKind,
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: String,
    /// ffmpeg `-vol` gain, 256 is unity.
    #[serde(default = "default_volume")]
    pub volume: u32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            asset_dir: default_asset_dir(),
            extension: default_extension(),
            bitrate_kbps: default_bitrate_kbps(),
            decoder: DecoderKind::default(),
            ffmpeg_path: default_ffmpeg_path(),
            volume: default_volume(),
        }
    }
}

fn default_asset_dir() -> String {
    "audio".to_string()
}

fn default_extension() -> String {
    "wav".to_string()
}

fn default_bitrate_kbps() -> u32 {
    128
}

fn default_ffmpeg_path() -> String {
    "ffmpeg".to_string()
}

fn default_volume() -> u32 {
    256
}
