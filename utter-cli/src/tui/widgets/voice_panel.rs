use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

use utter_core::speech::tts::types::VOICES;

use crate::tui::state::{Activity, TuiState};

pub fn render(frame: &mut Frame, area: Rect, state: &TuiState) {
    let items: Vec<ListItem> = VOICES
        .iter()
        .enumerate()
        .map(|(i, voice)| {
            let selected = i == state.selected_voice;
            let previewing = matches!(state.activity, Activity::Previewing(name) if name == voice.name);

            let marker = if selected { "▸ " } else { "  " };
            let name_style = if selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };

            let mut spans = vec![
                Span::styled(marker, Style::default().fg(Color::Yellow)),
                Span::styled(format!("{:<8}", voice.name), name_style),
                Span::styled(
                    format!("({})", voice.gender.label()),
                    Style::default().fg(Color::DarkGray),
                ),
            ];
            if previewing {
                spans.push(Span::styled(" ♪", Style::default().fg(Color::Green)));
            }

            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Voice (Tab: next, Ctrl+P: preview) "),
    );

    frame.render_widget(list, area);
}
