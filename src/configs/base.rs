use serde::{Deserialize, Serialize};

use crate::{common::types::AnyResult, configs::*};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default = "default_sounds")]
    pub sounds: Vec<SoundConfig>,
    #[serde(default)]
    pub voice: VoiceConfig,
    #[serde(default)]
    pub trigger: TriggerConfig,
    pub logging: Option<LoggingConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            playback: PlaybackConfig::default(),
            audio: AudioConfig::default(),
            sounds: default_sounds(),
            voice: VoiceConfig::default(),
            trigger: TriggerConfig::default(),
            logging: None,
        }
    }
}

impl Config {
    pub fn load() -> AnyResult<Self> {
        let config_path = if std::path::Path::new("config.toml").exists() {
            "config.toml"
        } else if std::path::Path::new("config.default.toml").exists() {
            "config.default.toml"
        } else {
            return Err("config.toml or config.default.toml not found".into());
        };

        // Logging is not up yet.
        println!("Loading configuration from: {config_path}");

        let config_str = std::fs::read_to_string(config_path)?;
        Self::parse(&config_str)
    }

    pub fn parse(config_str: &str) -> AnyResult<Self> {
        let config: Config = toml::from_str(config_str)?;
        config.playback.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = Config::parse("").expect("empty config is valid");
        assert_eq!(config.playback.max_queue_size, 6);
        assert_eq!(config.audio.bitrate_kbps, 128);
        assert_eq!(config.sounds.len(), 11);
        assert_eq!(config.sounds[0].name, "airhorn1");
        assert_eq!(config.trigger.prefix, "!airhorn");
    }

    #[test]
    fn sections_override_defaults() {
        let config = Config::parse(
            r#"
            [playback]
            max_queue_size = 2
            jitter_chance = 0

            [audio]
            decoder = "symphonia"
            bitrate_kbps = 96

            [[sounds]]
            name = "horn"
            weight = 5

            [[voice.endpoints]]
            guild = 1
            channel = 2
            address = "127.0.0.1:5004"
            "#,
        )
        .expect("valid config");

        assert_eq!(config.playback.max_queue_size, 2);
        assert_eq!(config.playback.jitter_chance, 0);
        assert_eq!(config.audio.decoder, DecoderKind::Symphonia);
        assert_eq!(config.sounds.len(), 1);
        assert_eq!(config.voice.endpoints.len(), 1);
    }

    #[test]
    fn inverted_jitter_range_is_rejected() {
        let err = Config::parse(
            r#"
            [playback]
            jitter_min_ms = 5000
            jitter_max_ms = 1000
            "#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn shipped_default_config_matches_builtin_defaults() {
        let config = Config::parse(include_str!("../../config.default.toml"))
            .expect("config.default.toml parses");
        let builtin = default_sounds();
        assert_eq!(config.sounds.len(), builtin.len());
        for (shipped, builtin) in config.sounds.iter().zip(&builtin) {
            assert_eq!(shipped.name, builtin.name);
            assert_eq!(shipped.weight, builtin.weight);
        }
        assert!(config.voice.endpoints.is_empty());
    }
}
