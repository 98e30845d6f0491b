use crate::app::{App, InputMode};
use overlay_core::distance::MeasurePhase;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

/// Search box on the left, distance readout in the middle, status on the right.
pub fn render_bottom_bar(app: &App, f: &mut Frame<'_>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Length(28),
            Constraint::Min(10),
        ])
        .split(area);

    render_search_box(app, f, chunks[0]);
    render_distance(app, f, chunks[1]);
    render_status(app, f, chunks[2]);
}

fn render_search_box(app: &App, f: &mut Frame<'_>, area: Rect) {
    let searching = app.input_mode == InputMode::Search;
    let color = if searching { Color::Yellow } else { Color::Gray };
    let block = Block::default()
        .title(" Search ")
        .title_style(Style::default().fg(color))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));

    let line = if searching {
        TextLine::from(vec![
            Span::raw(app.search_input.as_str()),
            Span::styled("▏", Style::default().fg(Color::Yellow)),
        ])
    } else {
        TextLine::from(Span::styled(
            "press / to search for a place",
            Style::default().fg(Color::DarkGray),
        ))
    };

    f.render_widget(Paragraph::new(line).block(block), area);
}

fn render_distance(app: &App, f: &mut Frame<'_>, area: Rect) {
    let armed = app.map.distance().is_armed();
    let color = if armed { Color::Yellow } else { Color::Cyan };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));

    f.render_widget(
        Paragraph::new(Span::styled(
            app.map.distance_readout(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
        .block(block),
        area,
    );
}

fn render_status(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(" Status ")
        .title_style(Style::default().fg(Color::Yellow))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let text = status_text(app);
    f.render_widget(
        Paragraph::new(Span::styled(text, Style::default().fg(Color::Green))).block(block),
        area,
    );
}

fn status_text(app: &App) -> String {
    if !app.status_message.is_empty() {
        return app.status_message.clone();
    }

    if app.map.distance().is_armed() {
        return match app.map.distance().phase() {
            MeasurePhase::OneSelected(_) => "Click the second point".to_string(),
            MeasurePhase::Idle | MeasurePhase::Done { .. } => {
                "Click the first point".to_string()
            }
        };
    }

    let loading = app.loading_count();
    if loading > 0 {
        return format!("Loading {loading} datasets...");
    }

    "F1 help | q quit".to_string()
}
