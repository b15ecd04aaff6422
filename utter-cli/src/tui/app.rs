use anyhow::Result;
use chrono::Local;
use crossterm::{
    event::{Event as CrosstermEvent, EventStream},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;
use tui_textarea::TextArea;

use utter_core::speech::audio::{decode, wav, SessionController};
use utter_core::speech::tts::types::Voice;
use utter_core::{build_payload, Prosody, Settings, SpeechError, TextToSpeech};

use super::input_handler::{configure_textarea, handle_key_event, TuiAction};
use super::state::{LastAudio, TuiState};
use super::ui::draw_ui;

const DEFAULT_TEXT: &str =
    "Hello! This is a demonstration of text-to-speech using the Gemini API.";

/// Result of a synthesis task, delivered back into the event loop.
enum SpeechEvent {
    Generated { base64: String, voice: &'static str },
    PreviewReady { base64: String },
    Failed { message: String },
}

pub struct TuiApp {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    state: TuiState,
    tts: Arc<dyn TextToSpeech>,
    session: SessionController,
    event_tx: mpsc::UnboundedSender<SpeechEvent>,
    event_rx: mpsc::UnboundedReceiver<SpeechEvent>,
}

impl TuiApp {
    pub fn new(settings: Settings, tts: impl TextToSpeech + 'static) -> Result<Self> {
        let state = TuiState::new(&settings);
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            state,
            tts: Arc::new(tts),
            session: SessionController::new(),
            event_tx,
            event_rx,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Install panic hook to restore terminal on panic
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            original_hook(panic_info);
        }));

        let mut textarea = TextArea::from(DEFAULT_TEXT.lines());
        configure_textarea(&mut textarea);

        let tick_rate = Duration::from_millis(50);
        let mut crossterm_reader = EventStream::new();

        loop {
            let state = &mut self.state;
            let ta = &textarea;
            self.terminal.draw(|frame| {
                draw_ui(frame, state, ta);
            })?;

            if self.state.should_quit {
                break;
            }

            tokio::select! {
                // Results from synthesis tasks
                Some(event) = self.event_rx.recv() => {
                    self.handle_speech_event(event);
                }

                // Terminal input (async)
                Some(Ok(crossterm_event)) = crossterm_reader.next() => {
                    if let CrosstermEvent::Key(key) = crossterm_event {
                        match handle_key_event(key, &mut textarea, &mut self.state) {
                            TuiAction::GenerateOrStop => {
                                let text = textarea.lines().join("\n");
                                self.generate_or_stop(&text);
                            }
                            TuiAction::Preview => self.preview(),
                            TuiAction::Export => self.export(),
                            TuiAction::Stop => {
                                self.session.stop();
                                self.state.playback_done();
                            }
                            TuiAction::Quit => {
                                self.state.should_quit = true;
                            }
                            TuiAction::None => {}
                        }
                    }
                    // Resize re-renders on the next loop iteration.
                }

                // Tick: spinner animation and completion polling
                _ = tokio::time::sleep(tick_rate) => {
                    if self.state.is_spinning() {
                        self.state.spinner_frame += 1;
                    }
                    // Natural completion resets the playing/previewing
                    // flag; manual stop already did its own reset.
                    if self.session.poll_finished() {
                        self.state.playback_done();
                    }
                }
            }
        }

        self.restore_terminal()?;
        Ok(())
    }

    /// Generate speech for the given text, or stop if audio is playing.
    /// The toggle mirrors the single generate/stop control.
    fn generate_or_stop(&mut self, text: &str) {
        if self.session.is_active() {
            self.session.stop();
            self.state.playback_done();
            return;
        }

        if !self.state.begin_generation(text) {
            return;
        }

        let voice = self.state.selected();
        let payload = build_payload(text, &self.state.prosody());
        self.spawn_synthesis(payload, voice, false);
    }

    fn preview(&mut self) {
        let Some(voice) = self.state.begin_preview() else {
            return;
        };
        // Previews always use default prosody.
        let payload = build_payload(voice.preview_text, &Prosody::default());
        self.spawn_synthesis(payload, voice, true);
    }

    fn spawn_synthesis(&self, payload: String, voice: &'static Voice, is_preview: bool) {
        let tts = Arc::clone(&self.tts);
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let event = match tts.synthesize(&payload, voice).await {
                Ok(base64) if is_preview => SpeechEvent::PreviewReady { base64 },
                Ok(base64) => SpeechEvent::Generated {
                    base64,
                    voice: voice.name,
                },
                Err(err) => SpeechEvent::Failed {
                    message: err.to_string(),
                },
            };
            let _ = tx.send(event);
        });
    }

    fn handle_speech_event(&mut self, event: SpeechEvent) {
        match event {
            SpeechEvent::Generated { base64, voice } => {
                match self.start_playback(&base64) {
                    Ok(()) => {
                        self.state.playback_started();
                        self.state.last_audio = Some(LastAudio { base64, voice });
                    }
                    Err(message) => self.state.fail(message),
                }
            }
            SpeechEvent::PreviewReady { base64 } => {
                if let Err(message) = self.start_playback(&base64) {
                    self.state.fail(message);
                }
                // On success the previewing flag stays set until the
                // session drains.
            }
            SpeechEvent::Failed { message } => self.state.fail(message),
        }
    }

    fn start_playback(&mut self, base64: &str) -> Result<(), String> {
        let audio = decode::decode_audio(base64).map_err(|e| e.to_string())?;
        self.session.play(&audio).map_err(|e| {
            tracing::warn!(error = ?e, "failed to start playback");
            "Failed to play audio on this device.".to_string()
        })
    }

    fn export(&mut self) {
        match export_audio(self.state.last_audio.as_ref(), Path::new(".")) {
            Ok(path) => {
                info!(path = ?path, "exported WAV");
                self.state.error = None;
                self.state.notice = Some(format!("Saved {}", path.display()));
            }
            Err(message) => self.state.error = Some(message),
        }
    }

    fn restore_terminal(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for TuiApp {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Write the last generation to `<voice>-<timestamp>.wav` under `dir`.
/// Without a prior generation this is an error and nothing touches disk.
fn export_audio(last: Option<&LastAudio>, dir: &Path) -> Result<PathBuf, String> {
    let Some(last) = last else {
        return Err(SpeechError::NoAudio.to_string());
    };

    let audio = decode::decode_audio(&last.base64).map_err(|e| e.to_string())?;
    let path = dir.join(wav::export_file_name(last.voice, Local::now()));
    wav::write_wav(&path, &audio.pcm_data, audio.sample_rate)
        .map(|()| path)
        .map_err(|e| {
            tracing::warn!(error = ?e, "failed to write WAV");
            "Failed to save the WAV file.".to_string()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose, Engine as _};
    use tempfile::TempDir;

    #[test]
    fn export_without_a_generation_errors_and_writes_nothing() {
        let dir = TempDir::new().unwrap();

        let err = export_audio(None, dir.path()).unwrap_err();

        assert_eq!(err, SpeechError::NoAudio.to_string());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn export_writes_the_retained_generation_as_a_wav() {
        let dir = TempDir::new().unwrap();
        let samples: Vec<i16> = vec![0, 500, -500];
        let pcm: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        let last = LastAudio {
            base64: general_purpose::STANDARD.encode(&pcm),
            voice: "Kore",
        };

        let path = export_audio(Some(&last), dir.path()).unwrap();

        assert!(path.starts_with(dir.path()));
        assert!(path.file_name().unwrap().to_string_lossy().starts_with("kore-"));
        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().sample_rate, 24_000);
        let read_back: Vec<i16> = reader.into_samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(read_back, samples);
    }
}
