use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tui_textarea::TextArea;

use super::state::{Activity, TuiState};

pub enum TuiAction {
    /// Generate speech from the text, or stop if already playing.
    GenerateOrStop,
    /// Preview the selected voice.
    Preview,
    /// Export the last generated audio to a WAV file.
    Export,
    /// Stop playback without quitting.
    Stop,
    /// Quit the application.
    Quit,
    /// No action needed.
    None,
}

pub fn handle_key_event(
    key: KeyEvent,
    textarea: &mut TextArea,
    state: &mut TuiState,
) -> TuiAction {
    match (key.code, key.modifiers) {
        // Ctrl+C: stop if audio is playing, quit when idle
        (KeyCode::Char('c'), m) if m.contains(KeyModifiers::CONTROL) => {
            if matches!(state.activity, Activity::Playing | Activity::Previewing(_)) {
                TuiAction::Stop
            } else {
                TuiAction::Quit
            }
        }

        // Ctrl+D: quit
        (KeyCode::Char('d'), m) if m.contains(KeyModifiers::CONTROL) => TuiAction::Quit,

        // Ctrl+G: generate & play (toggles to stop while playing)
        (KeyCode::Char('g'), m) if m.contains(KeyModifiers::CONTROL) => TuiAction::GenerateOrStop,

        // Ctrl+P: preview the selected voice
        (KeyCode::Char('p'), m) if m.contains(KeyModifiers::CONTROL) => TuiAction::Preview,

        // Ctrl+S: save the last generation as a WAV
        (KeyCode::Char('s'), m) if m.contains(KeyModifiers::CONTROL) => TuiAction::Export,

        // Tab: cycle through voices
        (KeyCode::Tab, _) => {
            state.cycle_voice();
            TuiAction::None
        }

        // Ctrl+Left/Right: speaking rate in 5% steps
        (KeyCode::Left, m) if m.contains(KeyModifiers::CONTROL) => {
            state.adjust_rate(-5);
            TuiAction::None
        }
        (KeyCode::Right, m) if m.contains(KeyModifiers::CONTROL) => {
            state.adjust_rate(5);
            TuiAction::None
        }

        // Ctrl+Up/Down: pitch offset in 1% steps
        (KeyCode::Up, m) if m.contains(KeyModifiers::CONTROL) => {
            state.adjust_pitch(1);
            TuiAction::None
        }
        (KeyCode::Down, m) if m.contains(KeyModifiers::CONTROL) => {
            state.adjust_pitch(-1);
            TuiAction::None
        }

        // Escape: dismiss the error line first, then clear the input
        (KeyCode::Esc, _) => {
            if state.error.take().is_none() && state.notice.take().is_none() {
                *textarea = TextArea::default();
                configure_textarea(textarea);
            }
            TuiAction::None
        }

        // All other keys: forward to the textarea
        _ => {
            textarea.input(key);
            TuiAction::None
        }
    }
}

pub fn configure_textarea(textarea: &mut TextArea) {
    textarea.set_placeholder_text("Type or paste your text here...");
    textarea.set_cursor_line_style(ratatui::style::Style::default());
    textarea.set_style(ratatui::style::Style::default().fg(ratatui::style::Color::White));
}
