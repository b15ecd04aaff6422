use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::state::{Activity, TuiState};

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

pub fn render(frame: &mut Frame, area: Rect, state: &TuiState) {
    let spinner = SPINNER_CHARS[state.spinner_frame % SPINNER_CHARS.len()];
    let (status, status_style) = match &state.activity {
        Activity::Idle => ("Ready".to_string(), Style::default().fg(Color::Green)),
        Activity::Loading => (
            format!("{spinner} Generating..."),
            Style::default().fg(Color::Yellow),
        ),
        Activity::Playing => (
            format!("{spinner} Playing"),
            Style::default().fg(Color::Cyan),
        ),
        Activity::Previewing(name) => (
            format!("{spinner} Previewing {name}"),
            Style::default().fg(Color::Cyan),
        ),
    };

    let sep = Span::styled(" | ", Style::default().fg(Color::DarkGray));

    let mut parts: Vec<Span<'static>> = vec![
        Span::styled(" ", Style::default()),
        Span::styled(
            state.selected().name,
            Style::default().fg(Color::Yellow),
        ),
        sep.clone(),
        Span::styled(status, status_style),
    ];

    if let Some(error) = &state.error {
        parts.push(sep.clone());
        parts.push(Span::styled(error.clone(), Style::default().fg(Color::Red)));
    } else if let Some(notice) = &state.notice {
        parts.push(sep);
        parts.push(Span::styled(
            notice.clone(),
            Style::default().fg(Color::Green),
        ));
    }

    let bar = Paragraph::new(Line::from(parts)).style(Style::default().bg(Color::Rgb(30, 30, 30)));

    frame.render_widget(bar, area);
}
