use crate::app::App;
use overlay_core::state::LoadStatus;
use overlay_core::DatasetId;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use throbber_widgets_tui::{Throbber, BRAILLE_SIX};

pub fn render_layer_menu(app: &App, f: &mut Frame<'_>, area: Rect) {
    let throbber = Throbber::default().throbber_set(BRAILLE_SIX);

    let lines: Vec<TextLine<'_>> = DatasetId::ALL
        .iter()
        .enumerate()
        .map(|(index, &id)| {
            let selected = index == app.menu_index;
            let active = app.map.active().contains(&id);

            let status = match app.map.load_status(id) {
                Some(LoadStatus::Loaded) if active => {
                    Span::styled("●", Style::default().fg(Color::Green))
                }
                Some(LoadStatus::Loaded) => Span::styled("○", Style::default().fg(Color::Gray)),
                Some(LoadStatus::Failed(_)) => Span::styled("✗", Style::default().fg(Color::Red)),
                Some(LoadStatus::Loading) | None => throbber.to_symbol_span(&app.throbber),
            };

            let label_style = if selected {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else if active {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };

            let mut spans = vec![
                Span::styled(
                    format!("{} ", index + 1),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
                status,
                Span::raw(" "),
                Span::styled(id.label(), label_style),
            ];
            if app.map.pending() == Some(id) {
                spans.push(Span::styled(" (loading)", Style::default().fg(Color::Yellow)));
            }
            if matches!(app.map.load_status(id), Some(LoadStatus::Failed(_))) {
                spans.push(Span::styled(" unavailable", Style::default().fg(Color::Red)));
            }
            TextLine::from(spans)
        })
        .collect();

    let block = Block::default()
        .title(" Layers ")
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    f.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
}
