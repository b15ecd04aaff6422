//! Gemini text-to-speech client.
//!
//! One `generateContent` call per request, configured for an audio-only
//! response. The service returns linear PCM as a base64 `inlineData` blob
//! inside the first candidate.

use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::provider::TextToSpeech;
use super::types::Voice;
use crate::speech::error::SpeechError;

/// Default synthesis model.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-tts";

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
}

impl GeminiConfig {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

pub struct GeminiTts {
    client: Client,
    config: GeminiConfig,
}

impl GeminiTts {
    pub fn new(config: GeminiConfig) -> Result<Self, SpeechError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| SpeechError::Service(anyhow!(e)))?;

        Ok(Self { client, config })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<TextPart>,
}

#[derive(Serialize)]
struct TextPart {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<String>,
    speech_config: SpeechConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SpeechConfig {
    voice_config: VoiceConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceConfig {
    prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PrebuiltVoiceConfig {
    voice_name: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CandidatePart {
    inline_data: Option<InlineData>,
}

#[derive(Deserialize)]
struct InlineData {
    data: String,
}

impl GenerateResponse {
    /// First base64 audio blob in the response, if any.
    fn first_audio(self) -> Option<String> {
        self.candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .find_map(|p| p.inline_data)
            .map(|d| d.data)
    }
}

fn build_request(payload: &str, voice: &Voice) -> GenerateRequest {
    GenerateRequest {
        contents: vec![Content {
            parts: vec![TextPart {
                text: payload.to_string(),
            }],
        }],
        generation_config: GenerationConfig {
            response_modalities: vec!["AUDIO".to_string()],
            speech_config: SpeechConfig {
                voice_config: VoiceConfig {
                    prebuilt_voice_config: PrebuiltVoiceConfig {
                        voice_name: voice.name.to_string(),
                    },
                },
            },
        },
    }
}

#[async_trait]
impl TextToSpeech for GeminiTts {
    async fn synthesize(&self, payload: &str, voice: &Voice) -> Result<String, SpeechError> {
        let url = format!("{BASE_URL}/models/{}:generateContent", self.config.model);

        debug!(
            voice = voice.name,
            payload_len = payload.len(),
            model = %self.config.model,
            "requesting speech synthesis"
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&build_request(payload, voice))
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "speech service request failed");
                SpeechError::Service(anyhow!(e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(%status, body, "speech service returned an error");
            return Err(SpeechError::Service(anyhow!(
                "speech service returned {status}"
            )));
        }

        let parsed: GenerateResponse = response.json().await.map_err(|e| {
            warn!(error = %e, "failed to parse speech service response");
            SpeechError::Service(anyhow!(e))
        })?;

        match parsed.first_audio() {
            Some(data) => {
                debug!(encoded_len = data.len(), "received audio blob");
                Ok(data)
            }
            None => {
                warn!(voice = voice.name, "speech service response carried no audio");
                Err(SpeechError::EmptyResult)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::tts::types::VOICES;

    #[test]
    fn extracts_first_audio_blob_from_response() {
        let json = r#"{
            "candidates": [{
                "content": {
                    "parts": [
                        { "inlineData": { "data": "QUJD" } },
                        { "inlineData": { "data": "ignored" } }
                    ]
                }
            }]
        }"#;
        let parsed: GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.first_audio().as_deref(), Some("QUJD"));
    }

    #[test]
    fn response_without_audio_yields_none() {
        let json = r#"{ "candidates": [{ "content": { "parts": [{}] } }] }"#;
        let parsed: GenerateResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.first_audio().is_none());

        let empty: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.first_audio().is_none());
    }

    #[test]
    fn request_body_selects_audio_modality_and_voice() {
        let request = build_request("Hi", &VOICES[0]);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["contents"][0]["parts"][0]["text"], "Hi");
        assert_eq!(json["generationConfig"]["responseModalities"][0], "AUDIO");
        assert_eq!(
            json["generationConfig"]["speechConfig"]["voiceConfig"]["prebuiltVoiceConfig"]
                ["voiceName"],
            "Kore"
        );
    }

    #[tokio::test]
    #[ignore] // Requires a GEMINI_API_KEY and network access
    async fn synthesize_against_live_service() {
        let api_key = std::env::var("GEMINI_API_KEY").expect("GEMINI_API_KEY not set");
        let tts = GeminiTts::new(GeminiConfig::new(api_key)).unwrap();

        let blob = tts.synthesize("Hi", &VOICES[0]).await.unwrap();
        assert!(!blob.is_empty());
    }
}
