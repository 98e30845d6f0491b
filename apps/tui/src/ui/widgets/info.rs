use crate::app::App;
use overlay_core::{DatasetId, LoadedLayer};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

const fn description(id: DatasetId) -> &'static str {
    match id {
        DatasetId::Slope => "Terrain slope bands, one class per DN value.",
        DatasetId::Elevation => "Elevation bands, one class per DN value.",
        DatasetId::DevelopableLand => "Land classed by development suitability (DN).",
        DatasetId::Roads
        | DatasetId::Schools
        | DatasetId::Training
        | DatasetId::Hospitals => "",
    }
}

pub fn render_info_panel(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(" Layer Info ")
        .title_style(Style::default().fg(Color::Magenta))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));

    let lines = app
        .map
        .active_layer()
        .map(info_lines)
        .unwrap_or_default();

    f.render_widget(
        Paragraph::new(Text::from(lines))
            .block(block)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn info_lines(layer: &LoadedLayer) -> Vec<TextLine<'static>> {
    let mut lines = vec![
        TextLine::from(Span::styled(
            layer.id.label(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        TextLine::from(Span::styled(
            description(layer.id),
            Style::default().fg(Color::Gray),
        )),
        TextLine::from(format!(
            "{} features in {} classes",
            layer.features.len(),
            layer.categories.len()
        )),
    ];

    if let Some(bounds) = layer.bounds {
        lines.push(TextLine::from(format!(
            "{:.3}°N-{:.3}°N {:.3}°E-{:.3}°E",
            bounds.min().y,
            bounds.max().y,
            bounds.min().x,
            bounds.max().x
        )));
    }

    lines
}
