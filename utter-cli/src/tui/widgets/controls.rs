use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use utter_core::speech::markup::{MAX_PITCH, MAX_RATE, MIN_PITCH, MIN_RATE};

use crate::tui::state::TuiState;

const SLIDER_WIDTH: usize = 20;

pub fn render(frame: &mut Frame, area: Rect, state: &TuiState) {
    let rate_bar = slider(
        (state.rate - MIN_RATE) as f64 / (MAX_RATE - MIN_RATE) as f64,
    );
    let pitch_bar = slider(
        (state.pitch - MIN_PITCH) as f64 / (MAX_PITCH - MIN_PITCH) as f64,
    );

    let label_style = Style::default().fg(Color::White);
    let value_style = Style::default().fg(Color::Cyan);
    let bar_style = Style::default().fg(Color::DarkGray);
    let hint_style = Style::default().fg(Color::DarkGray);

    let lines = vec![
        Line::from(vec![
            Span::styled(" Rate  ", label_style),
            Span::styled(rate_bar, bar_style),
            Span::styled(format!(" {:>4}%", state.rate), value_style),
            Span::styled("  Ctrl+←/→", hint_style),
        ]),
        Line::from(vec![
            Span::styled(" Pitch ", label_style),
            Span::styled(pitch_bar, bar_style),
            Span::styled(format!(" {:>+4}%", state.pitch), value_style),
            Span::styled("  Ctrl+↑/↓", hint_style),
        ]),
        Line::default(),
        Line::from(Span::styled(
            " Ctrl+G generate/stop   Ctrl+S save WAV   Ctrl+C quit",
            hint_style,
        )),
    ];

    let panel = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Delivery "),
    );

    frame.render_widget(panel, area);
}

fn slider(fraction: f64) -> String {
    let pos = (fraction.clamp(0.0, 1.0) * (SLIDER_WIDTH - 1) as f64).round() as usize;
    let mut bar = String::with_capacity(SLIDER_WIDTH * 3);
    for i in 0..SLIDER_WIDTH {
        bar.push(if i == pos { '█' } else { '─' });
    }
    bar
}
