use crate::app::App;
use crate::ui::layout::MapProjection;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

const POPUP_MIN_WIDTH: u16 = 16;
const POPUP_MAX_WIDTH: u16 = 48;

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// A `width` x `height` box beside an anchor cell, flipped to stay inside `bounds`.
pub fn anchored_rect(bounds: Rect, column: u16, row: u16, width: u16, height: u16) -> Rect {
    let width = width.min(bounds.width);
    let height = height.min(bounds.height);
    let right = bounds.x + bounds.width;
    let bottom = bounds.y + bounds.height;

    let x = if column + 1 + width <= right {
        column + 1
    } else {
        column.saturating_sub(width).max(bounds.x)
    };
    let y = if row + 1 + height <= bottom {
        row + 1
    } else {
        row.saturating_sub(height).max(bounds.y)
    };

    Rect::new(x, y, width, height)
}

/// Property list of the feature under the pointer.
pub fn render_feature_popup(app: &App, f: &mut Frame<'_>, projection: &MapProjection) {
    let Some(popup) = app.map.popup() else {
        return;
    };
    let Some((column, row)) = projection.latlng_to_cell(popup.anchor) else {
        return;
    };

    let lines: Vec<TextLine<'_>> = if popup.rows.is_empty() {
        vec![TextLine::from(Span::styled(
            "(no properties)",
            Style::default().fg(Color::Gray),
        ))]
    } else {
        popup
            .rows
            .iter()
            .map(|(key, value)| {
                TextLine::from(vec![
                    Span::styled(
                        format!("{key}: "),
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(value.as_str()),
                ])
            })
            .collect()
    };

    let content_width = popup
        .rows
        .iter()
        .map(|(key, value)| key.chars().count() + value.chars().count() + 2)
        .max()
        .unwrap_or(0);
    let width = u16::try_from(content_width + 2)
        .unwrap_or(u16::MAX)
        .clamp(POPUP_MIN_WIDTH, POPUP_MAX_WIDTH);
    let height = u16::try_from(lines.len() + 2).unwrap_or(u16::MAX);
    let area = anchored_rect(projection.area, column, row, width, height);

    let block = Block::default()
        .title(format!(" {} ", popup.dataset.label()))
        .title_style(Style::default().fg(Color::Cyan))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(Text::from(lines))
            .block(block)
            .wrap(Wrap { trim: true }),
        area,
    );
}

/// Blocking message; keys are swallowed until it is dismissed.
pub fn render_notice(message: &str, f: &mut Frame<'_>, area: Rect) {
    let popup_area = centered_rect(50, 24, area);
    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Notice ")
        .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let text = Text::from(vec![
        TextLine::from(Span::styled(
            message,
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        TextLine::from(""),
        TextLine::from(Span::styled(
            "Press Enter to dismiss",
            Style::default().fg(Color::Gray),
        )),
    ]);

    f.render_widget(
        Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        popup_area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opens_below_right_of_the_anchor() {
        let bounds = Rect::new(35, 1, 84, 35);
        assert_eq!(anchored_rect(bounds, 50, 10, 20, 5), Rect::new(51, 11, 20, 5));
    }

    #[test]
    fn flips_near_the_far_edges() {
        let bounds = Rect::new(35, 1, 84, 35);
        assert_eq!(anchored_rect(bounds, 115, 33, 20, 5), Rect::new(95, 28, 20, 5));
    }

    #[test]
    fn never_larger_than_the_map() {
        let bounds = Rect::new(0, 0, 10, 4);
        let rect = anchored_rect(bounds, 5, 2, 30, 12);
        assert_eq!(rect, Rect::new(0, 0, 10, 4));
    }

    #[test]
    fn centered_rect_is_centered() {
        let rect = centered_rect(50, 50, Rect::new(0, 0, 100, 40));
        assert_eq!(rect, Rect::new(25, 10, 50, 20));
    }
}
