//! Scripted in-memory provider for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::provider::TextToSpeech;
use super::types::Voice;
use crate::speech::error::SpeechError;

/// What the mock returns on each call.
#[derive(Debug, Clone, Default)]
pub enum MockBehavior {
    /// Return the given base64 blob.
    Audio(String),
    /// Return a well-formed but audio-less response.
    #[default]
    EmptyResult,
    /// Fail with a service communication error.
    ServiceFailure,
}

pub struct MockTts {
    behavior: Mutex<MockBehavior>,
    calls: AtomicUsize,
}

impl MockTts {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior: Mutex::new(behavior),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of synthesize calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextToSpeech for MockTts {
    async fn synthesize(&self, _payload: &str, _voice: &Voice) -> Result<String, SpeechError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let behavior = self.behavior.lock().expect("mock behavior lock poisoned");
        match &*behavior {
            MockBehavior::Audio(data) => Ok(data.clone()),
            MockBehavior::EmptyResult => Err(SpeechError::EmptyResult),
            MockBehavior::ServiceFailure => Err(SpeechError::Service(anyhow::anyhow!(
                "mock transport failure"
            ))),
        }
    }
}
