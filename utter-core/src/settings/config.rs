use serde::{Deserialize, Serialize};

use crate::speech::markup::{DEFAULT_PITCH, DEFAULT_RATE};
use crate::speech::tts::gemini::DEFAULT_MODEL;

/// Environment variable that overrides the stored API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Gemini API key. Left out of the default file; most users supply it
    /// via the environment instead.
    pub api_key: Option<String>,

    /// Synthesis model id.
    pub model: String,

    /// Voice preselected on startup.
    pub default_voice: String,

    /// Startup rate percentage.
    pub rate: u16,

    /// Startup pitch offset percentage.
    pub pitch: i16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            default_voice: "Zephyr".to_string(),
            rate: DEFAULT_RATE,
            pitch: DEFAULT_PITCH,
        }
    }
}

impl Settings {
    /// API key with the environment taking precedence over the file.
    pub fn resolve_api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| self.api_key.clone())
    }
}
