//! Base64 and PCM decoding.
//!
//! The service returns base64-wrapped signed 16-bit little-endian PCM,
//! mono, at 24 kHz. Decoding is a pure transform and never resamples;
//! rate conversion belongs to the playback layer.

use base64::{engine::general_purpose, Engine as _};

use crate::speech::error::SpeechError;
use crate::speech::tts::types::{AudioData, SOURCE_SAMPLE_RATE};

/// Decode a base64 payload into raw bytes. Malformed input is an explicit
/// error; well-formed input cannot fail.
pub fn decode_base64(data: &str) -> Result<Vec<u8>, SpeechError> {
    Ok(general_purpose::STANDARD.decode(data)?)
}

/// Decode a base64 payload into service-format audio.
pub fn decode_audio(data: &str) -> Result<AudioData, SpeechError> {
    let pcm_data = decode_base64(data)?;
    Ok(AudioData {
        pcm_data,
        sample_rate: SOURCE_SAMPLE_RATE,
        channels: 1,
    })
}

/// Convert 16-bit little-endian PCM bytes to normalized f32 samples in
/// [-1, 1]. A trailing odd byte is ignored.
pub fn pcm_to_f32(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(2)
        .map(|chunk| {
            let sample = i16::from_le_bytes([chunk[0], chunk[1]]);
            sample as f32 / 32768.0
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose, Engine as _};

    #[test]
    fn byte_length_halves_into_sample_count() {
        let pcm: Vec<u8> = (0..64u8).collect();
        let encoded = general_purpose::STANDARD.encode(&pcm);

        let decoded = decode_audio(&encoded).unwrap();
        assert_eq!(decoded.pcm_data.len(), 64);
        assert_eq!(decoded.sample_rate, SOURCE_SAMPLE_RATE);
        assert_eq!(decoded.channels, 1);

        let samples = pcm_to_f32(&decoded.pcm_data);
        assert_eq!(samples.len(), 32);
        assert!(samples.iter().all(|s| (-1.0..=1.0).contains(s)));
    }

    #[test]
    fn known_frames_decode_to_expected_values() {
        // 0, i16::MAX, i16::MIN as little-endian frames.
        let bytes = [0x00, 0x00, 0xFF, 0x7F, 0x00, 0x80];
        let samples = pcm_to_f32(&bytes);
        assert_eq!(samples, vec![0.0, 32767.0 / 32768.0, -1.0]);
    }

    #[test]
    fn trailing_odd_byte_is_ignored() {
        let samples = pcm_to_f32(&[0x00, 0x00, 0x42]);
        assert_eq!(samples.len(), 1);
    }

    #[test]
    fn malformed_base64_is_an_explicit_error() {
        let err = decode_base64("not valid base64!!").unwrap_err();
        assert!(matches!(err, SpeechError::InvalidAudio(_)));
    }
}
