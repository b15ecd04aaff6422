use async_trait::async_trait;

use super::types::Voice;
use crate::speech::error::SpeechError;

/// Trait for text-to-speech backends.
///
/// `payload` is the already-formatted text (see [`crate::speech::markup`]);
/// the result is the service's base64-encoded PCM blob, kept encoded so the
/// caller can retain it for export without re-encoding.
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    async fn synthesize(&self, payload: &str, voice: &Voice) -> Result<String, SpeechError>;
}
