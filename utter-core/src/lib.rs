pub mod settings;
pub mod speech;

// Public library API - the CLI consumes these directly; everything else is
// reachable through the module tree.
pub use settings::{Settings, SettingsManager};
pub use speech::error::SpeechError;
pub use speech::markup::{build_payload, Prosody};
pub use speech::tts::provider::TextToSpeech;
