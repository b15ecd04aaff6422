pub mod audio;
pub mod error;
pub mod markup;
pub mod tts;
