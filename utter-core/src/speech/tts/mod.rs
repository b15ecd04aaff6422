pub mod gemini;
pub mod mock;
pub mod provider;
pub mod types;

pub use gemini::{GeminiConfig, GeminiTts};
pub use provider::TextToSpeech;
pub use types::{find_voice, AudioData, Gender, Voice, SOURCE_SAMPLE_RATE, VOICES};
