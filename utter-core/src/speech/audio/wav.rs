//! WAV export for generated audio.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};

/// Wrap raw 16-bit mono PCM in a WAV container at the given rate.
pub fn write_wav(path: &Path, pcm_data: &[u8], sample_rate: u32) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer =
        hound::WavWriter::create(path, spec).with_context(|| format!("failed to create {path:?}"))?;

    for frame in pcm_data.chunks_exact(2) {
        let sample = i16::from_le_bytes([frame[0], frame[1]]);
        writer
            .write_sample(sample)
            .context("failed to write sample")?;
    }

    writer.finalize().context("failed to finalize WAV file")?;
    Ok(())
}

/// Export file name: voice plus generation timestamp.
pub fn export_file_name(voice: &str, generated_at: DateTime<Local>) -> String {
    format!(
        "{}-{}.wav",
        voice.to_lowercase(),
        generated_at.format("%Y%m%d-%H%M%S")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn written_wav_round_trips_samples_and_format() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.wav");

        let samples: Vec<i16> = vec![0, 1000, -1000, i16::MAX, i16::MIN];
        let pcm: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();

        write_wav(&path, &pcm, 24_000).unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 24_000);
        assert_eq!(spec.bits_per_sample, 16);

        let read_back: Vec<i16> = reader.into_samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(read_back, samples);
    }

    #[test]
    fn export_name_combines_voice_and_timestamp() {
        let at = Local.with_ymd_and_hms(2026, 8, 30, 14, 5, 9).unwrap();
        assert_eq!(export_file_name("Kore", at), "kore-20260830-140509.wav");
    }
}
