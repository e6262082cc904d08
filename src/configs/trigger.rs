use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TriggerConfig {
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
        }
    }
}

fn default_prefix() -> String {
    "!airhorn".to_string()
}
