use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SoundConfig {
    pub name: String,
    /// Relative selection weight. Zero or negative makes the sound unreachable
    /// for random selection; it can still be requested by name.
    pub weight: i64,
}

impl SoundConfig {
    pub fn new(name: impl Into<String>, weight: i64) -> Self {
        Self {
            name: name.into(),
            weight,
        }
    }
}

pub fn default_sounds() -> Vec<SoundConfig> {
    [
        ("airhorn1", 1000),
        ("airhorn_reverb", 800),
        ("airhorn_spam", 800),
        ("airhorn_tripletap", 800),
        ("airhorn_fourtap", 800),
        ("airhorn_distant", 500),
        ("airhorn_echo", 500),
        ("airhorn_highfartlong", 200),
        ("airhorn_highfartshort", 200),
        ("airhorn_midshort", 100),
        ("airhorn_truck", 10),
    ]
    .into_iter()
    .map(|(name, weight)| SoundConfig::new(name, weight))
    .collect()
}
