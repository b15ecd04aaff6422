//! Audio playback through the default output device.
//!
//! The decoder hands over 24 kHz mono PCM; this layer resamples to the
//! device-native rate and channel count before streaming. At most one
//! playback session is live at a time: the session controller owns the
//! single handle and replaces it on every `play`, which stops the prior
//! stream before the new one opens.

use anyhow::{Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{
    Device, FromSample, SampleFormat, SizedSample, Stream, StreamConfig, SupportedStreamConfig,
};
use rubato::{FftFixedIn, Resampler};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use super::decode::pcm_to_f32;
use crate::speech::tts::types::AudioData;

/// Output device plus its preferred stream configuration.
pub struct AudioPlayer {
    device: Device,
    supported_config: SupportedStreamConfig,
}

/// One playback session over one decoded buffer. Dropping the handle stops
/// the stream (RAII); `is_finished` flips exactly once when the buffer is
/// exhausted, and never flips for a manually dropped session.
pub struct PlaybackHandle {
    _stream: Stream,
    finished: Arc<AtomicBool>,
}

impl PlaybackHandle {
    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }

    /// Wait for natural completion.
    pub async fn wait(&self) {
        while !self.is_finished() {
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }
    }
}

impl AudioPlayer {
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .context("no audio output device available")?;
        let supported_config = device
            .default_output_config()
            .context("failed to get default output config")?;

        Ok(Self {
            device,
            supported_config,
        })
    }

    /// Start playing from sample 0, returning the session handle.
    pub fn play(&self, audio: &AudioData) -> Result<PlaybackHandle> {
        let native_rate = self.supported_config.sample_rate().0;
        let native_channels = self.supported_config.channels() as usize;
        let sample_format = self.supported_config.sample_format();
        let config: StreamConfig = self.supported_config.clone().into();

        let mono = pcm_to_f32(&audio.pcm_data);
        let resampled = if audio.sample_rate == native_rate {
            mono
        } else {
            resample(&mono, audio.sample_rate, native_rate)?
        };

        let samples = if audio.channels == 1 && native_channels > 1 {
            expand_to_channels(&resampled, native_channels)
        } else {
            resampled
        };

        let samples = Arc::new(samples);
        let position = Arc::new(AtomicUsize::new(0));
        let finished = Arc::new(AtomicBool::new(false));

        let stream = match sample_format {
            SampleFormat::F32 => {
                self.build_stream::<f32>(&config, samples, position, finished.clone())?
            }
            SampleFormat::I16 => {
                self.build_stream::<i16>(&config, samples, position, finished.clone())?
            }
            format => anyhow::bail!("unsupported output sample format: {format:?}"),
        };

        stream.play().context("failed to start playback stream")?;

        Ok(PlaybackHandle {
            _stream: stream,
            finished,
        })
    }

    fn build_stream<T>(
        &self,
        config: &StreamConfig,
        samples: Arc<Vec<f32>>,
        position: Arc<AtomicUsize>,
        finished: Arc<AtomicBool>,
    ) -> Result<Stream>
    where
        T: SizedSample + FromSample<f32> + Default + Send + 'static,
    {
        self.device
            .build_output_stream(
                config,
                move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                    let pos = position.load(Ordering::SeqCst);
                    let remaining = samples.len().saturating_sub(pos);

                    if remaining == 0 {
                        data.fill(T::default());
                        finished.store(true, Ordering::SeqCst);
                        return;
                    }

                    let to_copy = remaining.min(data.len());
                    for (i, &sample) in samples[pos..pos + to_copy].iter().enumerate() {
                        data[i] = T::from_sample(sample);
                    }

                    if to_copy < data.len() {
                        data[to_copy..].fill(T::default());
                    }

                    position.store(pos + to_copy, Ordering::SeqCst);
                },
                move |err| {
                    tracing::error!(error = ?err, "playback stream error");
                },
                None,
            )
            .context("failed to build output stream")
    }
}

/// Exclusive owner of the playback device and the single live session.
///
/// The device is opened lazily on the first `play` and reused afterwards.
#[derive(Default)]
pub struct SessionController {
    player: Option<AudioPlayer>,
    active: Option<PlaybackHandle>,
}

impl SessionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop and discard any live session, then start a new one from
    /// sample 0.
    pub fn play(&mut self, audio: &AudioData) -> Result<()> {
        // Tear down the old stream before the new one opens so the two
        // never overlap on the device.
        self.active = None;

        if self.player.is_none() {
            self.player = Some(AudioPlayer::new()?);
        }
        if let Some(player) = self.player.as_ref() {
            self.active = Some(player.play(audio)?);
        }
        Ok(())
    }

    /// Stop the live session. No-op when nothing is playing.
    pub fn stop(&mut self) {
        self.active = None;
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// True exactly once, when the live session has drained naturally.
    /// The drained session is discarded in the same call.
    pub fn poll_finished(&mut self) -> bool {
        if self.active.as_ref().is_some_and(|h| h.is_finished()) {
            self.active = None;
            return true;
        }
        false
    }
}

fn resample(samples: &[f32], source_rate: u32, target_rate: u32) -> Result<Vec<f32>> {
    let chunk_size = 1024;
    let mut resampler =
        FftFixedIn::<f32>::new(source_rate as usize, target_rate as usize, chunk_size, 2, 1)
            .context("failed to create resampler")?;

    let mut output = Vec::new();
    let mut pos = 0;

    while pos < samples.len() {
        let frames_needed = resampler.input_frames_next();
        let end = (pos + frames_needed).min(samples.len());

        let mut input_chunk = samples[pos..end].to_vec();
        if input_chunk.len() < frames_needed {
            input_chunk.resize(frames_needed, 0.0);
        }

        let resampled = resampler
            .process(&[input_chunk], None)
            .map_err(|e| anyhow::anyhow!("resampling failed: {e:?}"))?;
        if let Some(chunk) = resampled.into_iter().next() {
            output.extend(chunk);
        }

        pos = end;
    }

    Ok(output)
}

fn expand_to_channels(samples: &[f32], channels: usize) -> Vec<f32> {
    let mut output = Vec::with_capacity(samples.len() * channels);
    for &sample in samples {
        for _ in 0..channels {
            output.push(sample);
        }
    }
    output
}
