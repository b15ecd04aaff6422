//! Non-interactive mode: synthesize once, write a WAV, exit.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::Local;
use tracing::info;

use utter_core::speech::audio::{decode, wav};
use utter_core::speech::tts::types::{find_voice, Voice, VOICES};
use utter_core::{build_payload, Prosody, Settings, TextToSpeech};

pub struct Request {
    pub text: String,
    pub voice: Option<String>,
    pub rate: Option<u16>,
    pub pitch: Option<i16>,
    pub output: Option<PathBuf>,
}

/// Synthesize `request.text` and write it as a WAV file, returning the
/// path written. Empty input is rejected before the service is contacted.
pub async fn run(
    tts: &dyn TextToSpeech,
    settings: &Settings,
    request: Request,
) -> Result<PathBuf> {
    if request.text.trim().is_empty() {
        bail!("no text to synthesize");
    }

    let voice = resolve_voice(request.voice.as_deref(), settings)?;
    let prosody = Prosody::new(
        request.rate.unwrap_or(settings.rate),
        request.pitch.unwrap_or(settings.pitch),
    );

    let payload = build_payload(&request.text, &prosody);
    let encoded = tts.synthesize(&payload, voice).await?;
    let audio = decode::decode_audio(&encoded)?;

    let path = request
        .output
        .unwrap_or_else(|| PathBuf::from(wav::export_file_name(voice.name, Local::now())));
    wav::write_wav(&path, &audio.pcm_data, audio.sample_rate)
        .with_context(|| format!("failed to write {path:?}"))?;

    info!(path = ?path, voice = voice.name, bytes = audio.pcm_data.len(), "wrote WAV");
    Ok(path)
}

fn resolve_voice(requested: Option<&str>, settings: &Settings) -> Result<&'static Voice> {
    match requested {
        Some(name) => find_voice(name)
            .with_context(|| format!("unknown voice {name:?}; expected one of Kore, Puck, Charon, Fenrir, Zephyr")),
        None => Ok(find_voice(&settings.default_voice).unwrap_or(&VOICES[0])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose, Engine as _};
    use tempfile::TempDir;
    use utter_core::speech::tts::mock::{MockBehavior, MockTts};
    use utter_core::SpeechError;

    fn request(text: &str, output: Option<PathBuf>) -> Request {
        Request {
            text: text.to_string(),
            voice: None,
            rate: None,
            pitch: None,
            output,
        }
    }

    #[tokio::test]
    async fn empty_text_never_reaches_the_service() {
        let mock = MockTts::new(MockBehavior::default());
        let settings = Settings::default();

        let result = run(&mock, &settings, request("   \n\t", None)).await;

        assert!(result.is_err());
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn synthesized_audio_lands_in_a_playable_wav() {
        let samples: Vec<i16> = vec![0, 42, -42, 1000];
        let pcm: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        let mock = MockTts::new(MockBehavior::Audio(general_purpose::STANDARD.encode(&pcm)));
        let settings = Settings::default();

        let dir = TempDir::new().unwrap();
        let out = dir.path().join("voice.wav");
        let path = run(&mock, &settings, request("Hi", Some(out.clone())))
            .await
            .unwrap();

        assert_eq!(path, out);
        assert_eq!(mock.call_count(), 1);

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().sample_rate, 24_000);
        let read_back: Vec<i16> = reader.into_samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(read_back, samples);
    }

    #[tokio::test]
    async fn service_failure_writes_no_file() {
        let mock = MockTts::new(MockBehavior::ServiceFailure);
        let settings = Settings::default();

        let dir = TempDir::new().unwrap();
        let out = dir.path().join("voice.wav");
        let result = run(&mock, &settings, request("Hi", Some(out.clone()))).await;

        let err = result.unwrap_err();
        assert!(err.downcast_ref::<SpeechError>().is_some());
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn unknown_voice_is_rejected_before_synthesis() {
        let mock = MockTts::new(MockBehavior::default());
        let settings = Settings::default();

        let result = run(
            &mock,
            &settings,
            Request {
                text: "Hi".to_string(),
                voice: Some("Nova".to_string()),
                rate: None,
                pitch: None,
                output: None,
            },
        )
        .await;

        assert!(result.is_err());
        assert_eq!(mock.call_count(), 0);
    }
}
