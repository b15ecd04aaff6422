use thiserror::Error;

/// Errors surfaced by the speech pipeline. Each variant's display text is
/// what the user sees; transport details stay in the source chain and the
/// trace log.
#[derive(Error, Debug)]
pub enum SpeechError {
    /// Any transport or service-level failure. Deliberately generic in its
    /// user-facing text; the cause is attached for logging only.
    #[error("Failed to communicate with the speech service. Please check your connection or API key.")]
    Service(#[source] anyhow::Error),

    /// The service accepted the request but its response carried no audio
    /// blob. Distinct from a transport failure so the user knows the
    /// request itself went through.
    #[error("The speech service returned no audio for this request.")]
    EmptyResult,

    /// The audio payload was not valid base64.
    #[error("The speech service returned malformed audio data.")]
    InvalidAudio(#[from] base64::DecodeError),

    /// Export requested before any generation succeeded.
    #[error("No generated audio to save yet. Generate speech first.")]
    NoAudio,
}
