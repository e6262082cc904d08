use std::{collections::HashSet, fmt, sync::Arc, time::Duration};

use tracing::{error, info, warn};

use crate::{
    audio::{
        codec::FrameEncoder,
        constants::FRAME_DURATION_MS,
        pipeline::{PcmDecoder, transcode},
    },
    common::{
        errors::LoadError,
        types::{Frame, FrameBuffer},
    },
    configs::SoundConfig,
};

/// A named clip and its pre-encoded frames. Immutable once loaded.
pub struct Sound {
    name: String,
    weight: i64,
    frames: FrameBuffer,
}

impl Sound {
    pub fn new(name: impl Into<String>, weight: i64, frames: Vec<Frame>) -> Self {
        Self {
            name: name.into(),
            weight,
            frames: frames.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weight(&self) -> i64 {
        self.weight
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// A sound whose transcoding produced nothing can never be heard.
    pub fn is_playable(&self) -> bool {
        !self.frames.is_empty()
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.frames.len() as u64 * FRAME_DURATION_MS)
    }
}

impl fmt::Debug for Sound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sound")
            .field("name", &self.name)
            .field("weight", &self.weight)
            .field("frames", &self.frames.len())
            .finish()
    }
}

/// The preloaded set of sounds, in configuration order.
#[derive(Debug, Default)]
pub struct SoundCatalog {
    sounds: Vec<Arc<Sound>>,
}

impl SoundCatalog {
    /// Transcode every configured sound, one after another.
    ///
    /// A sound that fails to load is logged and kept with whatever frames were
    /// produced before the failure (usually none); the remaining sounds still
    /// load. Duplicate names keep the first definition.
    pub fn load<F, E>(defs: &[SoundConfig], decoder: &dyn PcmDecoder, make_encoder: F) -> Self
    where
        F: Fn() -> Result<E, LoadError>,
        E: FrameEncoder,
    {
        let mut seen = HashSet::new();
        let mut sounds = Vec::with_capacity(defs.len());

        for def in defs {
            if !seen.insert(def.name.as_str()) {
                warn!("Duplicate sound '{}' ignored", def.name);
                continue;
            }

            let frames = match load_frames(&def.name, decoder, &make_encoder) {
                Ok(frames) => frames,
                Err((frames, e)) => {
                    error!(
                        "Failed to load sound '{}' ({} frames kept): {}",
                        def.name,
                        frames.len(),
                        e
                    );
                    frames
                }
            };

            let sound = Sound::new(def.name.clone(), def.weight, frames);
            if !sound.is_playable() {
                warn!("Sound '{}' produced no frames and will never play", sound.name());
                sounds.push(Arc::new(sound));
                continue;
            }
            info!(
                "Loaded sound '{}' (weight {}, {} frames, {:?})",
                sound.name(),
                sound.weight(),
                sound.frames().len(),
                sound.duration()
            );
            sounds.push(Arc::new(sound));
        }

        Self { sounds }
    }

    pub fn from_sounds(sounds: impl IntoIterator<Item = Sound>) -> Self {
        Self {
            sounds: sounds.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<Arc<Sound>> {
        self.sounds.iter().find(|s| s.name() == name).cloned()
    }

    pub fn all(&self) -> &[Arc<Sound>] {
        &self.sounds
    }

    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }

    pub fn playable_count(&self) -> usize {
        self.sounds.iter().filter(|s| s.is_playable()).count()
    }
}

fn load_frames<F, E>(
    name: &str,
    decoder: &dyn PcmDecoder,
    make_encoder: &F,
) -> Result<Vec<Frame>, (Vec<Frame>, LoadError)>
where
    F: Fn() -> Result<E, LoadError>,
    E: FrameEncoder,
{
    let encoder = make_encoder().map_err(|e| (Vec::new(), e))?;
    let pcm = decoder.open(name).map_err(|e| (Vec::new(), e))?;
    transcode(pcm, encoder).map_err(|partial| (partial.frames, partial.source))
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, io::Cursor};

    use super::*;
    use crate::audio::pipeline::{
        PcmStream,
        transcode::tests::{MarkerEncoder, marker_pcm},
    };

    struct MemoryDecoder {
        assets: HashMap<&'static str, Vec<u8>>,
    }

    impl PcmDecoder for MemoryDecoder {
        fn open(&self, name: &str) -> Result<PcmStream, LoadError> {
            self.assets
                .get(name)
                .map(|pcm| Box::new(Cursor::new(pcm.clone())) as PcmStream)
                .ok_or_else(|| LoadError::AssetNotFound(name.to_string()))
        }
    }

    fn decoder() -> MemoryDecoder {
        MemoryDecoder {
            assets: HashMap::from([
                ("airhorn1", marker_pcm(25)),
                ("airhorn_empty", Vec::new()),
                ("airhorn_truncated", vec![0u8; 1_000]),
                ("airhorn_truck", marker_pcm(40)),
            ]),
        }
    }

    #[test]
    fn failed_sounds_do_not_stop_the_batch() {
        let defs = [
            SoundConfig::new("airhorn1", 1000),
            SoundConfig::new("airhorn_missing", 800),
            SoundConfig::new("airhorn_empty", 500),
            SoundConfig::new("airhorn_truncated", 200),
            SoundConfig::new("airhorn_truck", 10),
        ];
        let catalog = SoundCatalog::load(&defs, &decoder(), || Ok(MarkerEncoder::new()));

        assert_eq!(catalog.len(), 5);
        assert_eq!(catalog.playable_count(), 2);
        assert_eq!(catalog.lookup("airhorn1").map(|s| s.frames().len()), Some(25));
        assert_eq!(
            catalog.lookup("airhorn_truck").map(|s| s.duration()),
            Some(Duration::from_millis(800))
        );
        for name in ["airhorn_missing", "airhorn_empty", "airhorn_truncated"] {
            let sound = catalog.lookup(name).expect("failed sounds stay listed");
            assert!(!sound.is_playable(), "{name} should be unplayable");
        }
    }

    #[test]
    fn encoder_init_failure_leaves_sound_empty() {
        let defs = [SoundConfig::new("airhorn1", 1000)];
        let catalog = SoundCatalog::load(&defs, &decoder(), || {
            Err::<MarkerEncoder, _>(LoadError::EncoderInit("no opus".into()))
        });
        assert_eq!(catalog.playable_count(), 0);
    }

    #[test]
    fn duplicate_names_keep_first_definition() {
        let defs = [
            SoundConfig::new("airhorn1", 1000),
            SoundConfig::new("airhorn1", 1),
        ];
        let catalog = SoundCatalog::load(&defs, &decoder(), || Ok(MarkerEncoder::new()));
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.all()[0].weight(), 1000);
    }

    #[test]
    fn lookup_is_exact() {
        let catalog = SoundCatalog::from_sounds([Sound::new("airhorn1", 1, Vec::new())]);
        assert!(catalog.lookup("airhorn1").is_some());
        assert!(catalog.lookup("airhorn").is_none());
    }
}
