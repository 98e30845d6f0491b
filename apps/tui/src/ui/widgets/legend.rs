use crate::app::App;
use crate::ui::rgb;
use overlay_core::legend::Legend;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

pub fn render_legend(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(" Legend ")
        .title_style(Style::default().fg(Color::Green))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let visible_rows = usize::from(area.height.saturating_sub(3));
    let lines = app.map.legend().map_or_else(
        || {
            vec![TextLine::from(Span::styled(
                "Select a layer to see its legend",
                Style::default().fg(Color::Gray),
            ))]
        },
        |legend| legend_lines(legend, visible_rows),
    );

    f.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
}

/// Title plus as many rows as fit; the last line counts what was cut.
fn legend_lines(legend: &Legend, visible_rows: usize) -> Vec<TextLine<'_>> {
    let mut lines = vec![TextLine::from(Span::styled(
        legend.title(),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    ))];

    let overflow = legend.rows.len() > visible_rows;
    let shown = if overflow {
        visible_rows.saturating_sub(1)
    } else {
        legend.rows.len()
    };

    lines.extend(legend.rows.iter().take(shown).map(|row| {
        TextLine::from(vec![
            Span::styled(row.swatch.glyph(), Style::default().fg(rgb(row.color.to_rgb()))),
            Span::raw(" "),
            Span::raw(row.label()),
        ])
    }));

    if overflow {
        lines.push(TextLine::from(Span::styled(
            format!("+{} more", legend.rows.len() - shown),
            Style::default().fg(Color::Gray),
        )));
    }

    lines
}
