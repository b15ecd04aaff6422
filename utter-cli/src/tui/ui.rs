use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};
use tui_textarea::TextArea;

use super::state::TuiState;
use super::widgets::{controls, input_area, status_bar, voice_panel};

pub fn draw_ui(frame: &mut Frame, state: &mut TuiState, textarea: &TextArea) {
    // Input height: textarea lines + 2 for top/bottom borders, min 3, max 12
    let textarea_lines = textarea.lines().len().clamp(1, 10) as u16;
    let input_height = textarea_lines + 2;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(input_height), // Text input (dynamic, with borders)
            Constraint::Min(7),               // Voice list and prosody controls
            Constraint::Length(1),            // Empty line gap
            Constraint::Length(1),            // Status bar
        ])
        .split(frame.area());

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(chunks[1]);

    input_area::render(frame, chunks[0], textarea);
    voice_panel::render(frame, middle[0], state);
    controls::render(frame, middle[1], state);
    // chunks[2] is the empty gap line - just leave it blank
    status_bar::render(frame, chunks[3], state);
}
