use crate::app::{WebApp, BOTTOM_BAR_HEIGHT, SIDEBAR_WIDTH};
use geo::{Coord, Geometry, Point, Polygon};
use overlay_core::color::Rgb;
use overlay_core::distance::{Cursor, MeasurePhase};
use overlay_core::state::LoadStatus;
use overlay_core::style::{Rendering, MEASURE_LINE_COLOR};
use overlay_core::view::Viewport;
use overlay_core::{DatasetId, LatLng, LoadedLayer};
use ratzilla::ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line as TextLine, Span, Text},
    widgets::{
        canvas::{Canvas, Context, Line as CanvasLine, Map as WorldMap, MapResolution},
        Block, Borders, Clear, Paragraph, Wrap,
    },
    Frame,
};

const BACKGROUND: Rgb = Rgb::BLACK;
const POPUP_WIDTH: u16 = 32;

const fn rgb(color: Rgb) -> Color {
    Color::Rgb(color.0, color.1, color.2)
}

pub fn render(app: &WebApp, f: &mut Frame<'_>) {
    let area = f.area();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(BOTTOM_BAR_HEIGHT)])
        .split(area);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
        .split(rows[0]);

    render_sidebar(app, f, columns[0]);
    render_map(app, f, columns[1]);
    render_bottom_bar(app, f, rows[1]);

    if let Some(message) = app.map.notice() {
        render_notice(message, f, area);
    }
}

fn bordered(title: &str, color: Color) -> Block<'_> {
    Block::default()
        .title(title)
        .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
}

fn render_sidebar(app: &WebApp, f: &mut Frame<'_>, area: Rect) {
    let info_height = if app.map.info_visible() { 7 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(9),
            Constraint::Min(4),
            Constraint::Length(info_height),
        ])
        .split(area);

    f.render_widget(
        Paragraph::new(Text::from(menu_lines(app))).block(bordered(" Layers ", Color::Cyan)),
        chunks[0],
    );

    let legend = app.map.legend().map_or_else(
        || vec![TextLine::from(Span::styled("No layer selected", Style::default().fg(Color::Gray)))],
        |legend| {
            std::iter::once(TextLine::from(Span::styled(
                legend.title(),
                Style::default().add_modifier(Modifier::BOLD),
            )))
            .chain(legend.rows.iter().map(|row| {
                TextLine::from(vec![
                    Span::styled(row.swatch.glyph(), Style::default().fg(rgb(row.color.to_rgb()))),
                    Span::raw(" "),
                    Span::raw(row.label().to_string()),
                ])
            }))
            .collect()
        },
    );
    f.render_widget(
        Paragraph::new(Text::from(legend)).block(bordered(" Legend ", Color::Green)),
        chunks[1],
    );

    if let Some(layer) = app.map.active_layer().filter(|_| app.map.info_visible()) {
        f.render_widget(
            Paragraph::new(Text::from(vec![
                TextLine::from(Span::styled(
                    layer.id.label(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                TextLine::from(format!(
                    "{} features, {} classes",
                    layer.features.len(),
                    layer.categories.len()
                )),
                TextLine::from(Span::styled(
                    format!("Classed by {}", layer.id.category_field()),
                    Style::default().fg(Color::Gray),
                )),
            ]))
            .block(bordered(" Layer Info ", Color::Magenta))
            .wrap(Wrap { trim: true }),
            chunks[2],
        );
    }
}

fn menu_lines(app: &WebApp) -> Vec<TextLine<'static>> {
    DatasetId::ALL
        .iter()
        .enumerate()
        .map(|(index, &id)| {
            let active = app.map.active().contains(&id);
            let status = match app.map.load_status(id) {
                Some(LoadStatus::Loaded) if active => Span::styled("●", Style::default().fg(Color::Green)),
                Some(LoadStatus::Loaded) => Span::styled("○", Style::default().fg(Color::Gray)),
                Some(LoadStatus::Failed(_)) => Span::styled("✗", Style::default().fg(Color::Red)),
                Some(LoadStatus::Loading) | None => Span::styled("…", Style::default().fg(Color::Yellow)),
            };
            let label_style = if index == app.menu_index {
                Style::default().fg(Color::Black).bg(Color::Yellow)
            } else if active {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };

            let mut spans = vec![
                Span::styled(format!("{} ", index + 1), Style::default().fg(Color::Yellow)),
                status,
                Span::raw(" "),
                Span::styled(id.label(), label_style),
            ];
            if app.map.pending() == Some(id) {
                spans.push(Span::styled(" (loading)", Style::default().fg(Color::Yellow)));
            }
            TextLine::from(spans)
        })
        .collect()
}

fn render_map(app: &WebApp, f: &mut Frame<'_>, area: Rect) {
    let armed = app.map.cursor() == Cursor::Crosshair;
    let accent = if armed { Color::Yellow } else { Color::Cyan };
    let block = bordered(" Map ", accent);
    let inner = block.inner(area);
    let viewport = app.map.view().viewport(
        f64::from(inner.width) * crate::pointer::CELL_WIDTH_PX,
        f64::from(inner.height) * crate::pointer::CELL_HEIGHT_PX,
    );
    let pointer = app.pointer_position();

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([viewport.west, viewport.east])
        .y_bounds([viewport.south, viewport.north])
        .paint(|ctx| {
            ctx.draw(&WorldMap {
                color: Color::DarkGray,
                resolution: MapResolution::High,
            });
            ctx.layer();

            if let Some(layer) = app.map.active_layer() {
                draw_layer(ctx, layer, &viewport);
            }
            ctx.layer();

            if let Some(line) = app.map.measure_line() {
                let coords: Vec<Coord<f64>> = line.points.iter().map(|at| at.to_point().0).collect();
                draw_path(ctx, &coords, rgb(line.color));
            }
            for marker in app.map.measure_markers() {
                print_at(ctx, *marker, "◆", rgb(MEASURE_LINE_COLOR));
            }
            if let Some(marker) = app.map.search_marker() {
                ctx.print(
                    marker.position.lon,
                    marker.position.lat,
                    TextLine::from(vec![
                        Span::styled("▼", Style::default().fg(Color::LightBlue)),
                        Span::raw(format!(" {}", marker.label)),
                    ]),
                );
            }
            if let Some(at) = pointer {
                print_at(ctx, at, if armed { "+" } else { "·" }, Color::Yellow);
            }
        });

    f.render_widget(canvas, area);
    render_popup(app, f, inner);
}

fn draw_layer(ctx: &mut Context<'_>, layer: &LoadedLayer, viewport: &Viewport) {
    for feature in &layer.features {
        if feature.bounds.is_some_and(|bounds| !viewport.intersects(&bounds)) {
            continue;
        }
        draw_geometry(ctx, &feature.geometry, &feature.rendering);
    }
}

fn path_color(rendering: &Rendering, polygon: bool) -> Color {
    match rendering {
        Rendering::Path(style) if polygon => {
            rgb(style.fill_color.to_rgb().over(BACKGROUND, style.fill_opacity))
        }
        Rendering::Path(style) => rgb(style.color.to_rgb()),
        Rendering::CircleMarker(_) | Rendering::DefaultMarker => Color::Gray,
    }
}

fn draw_geometry(ctx: &mut Context<'_>, geometry: &Geometry<f64>, rendering: &Rendering) {
    match geometry {
        Geometry::Point(point) => draw_point(ctx, *point, rendering),
        Geometry::MultiPoint(points) => {
            for point in &points.0 {
                draw_point(ctx, *point, rendering);
            }
        }
        Geometry::Line(line) => draw_path(ctx, &[line.start, line.end], path_color(rendering, false)),
        Geometry::LineString(line) => draw_path(ctx, &line.0, path_color(rendering, false)),
        Geometry::MultiLineString(lines) => {
            for line in &lines.0 {
                draw_path(ctx, &line.0, path_color(rendering, false));
            }
        }
        Geometry::Polygon(polygon) => draw_polygon(ctx, polygon, rendering),
        Geometry::MultiPolygon(polygons) => {
            for polygon in &polygons.0 {
                draw_polygon(ctx, polygon, rendering);
            }
        }
        Geometry::Rect(rect) => draw_polygon(ctx, &rect.to_polygon(), rendering),
        Geometry::Triangle(triangle) => draw_polygon(ctx, &triangle.to_polygon(), rendering),
        Geometry::GeometryCollection(collection) => {
            for member in &collection.0 {
                draw_geometry(ctx, member, rendering);
            }
        }
    }
}

fn draw_point(ctx: &mut Context<'_>, point: Point<f64>, rendering: &Rendering) {
    let at = LatLng::from_point(point);
    match rendering {
        Rendering::CircleMarker(style) => {
            let fill = style.fill_color.to_rgb().over(BACKGROUND, style.fill_opacity);
            print_at(ctx, at, "●", rgb(fill));
        }
        Rendering::DefaultMarker | Rendering::Path(_) => print_at(ctx, at, "▼", Color::LightBlue),
    }
}

fn draw_polygon(ctx: &mut Context<'_>, polygon: &Polygon<f64>, rendering: &Rendering) {
    let color = path_color(rendering, true);
    draw_path(ctx, &polygon.exterior().0, color);
    for ring in polygon.interiors() {
        draw_path(ctx, &ring.0, color);
    }
}

fn draw_path(ctx: &mut Context<'_>, coords: &[Coord<f64>], color: Color) {
    for pair in coords.windows(2) {
        ctx.draw(&CanvasLine {
            x1: pair[0].x,
            y1: pair[0].y,
            x2: pair[1].x,
            y2: pair[1].y,
            color,
        });
    }
}

fn print_at(ctx: &mut Context<'_>, at: LatLng, symbol: &'static str, color: Color) {
    ctx.print(
        at.lon,
        at.lat,
        Span::styled(symbol, Style::default().fg(color).add_modifier(Modifier::BOLD)),
    );
}

/// Feature properties, shown beside the pointer that opened them.
fn render_popup(app: &WebApp, f: &mut Frame<'_>, canvas: Rect) {
    let Some(popup) = app.map.popup() else {
        return;
    };

    let lines: Vec<TextLine<'_>> = if popup.rows.is_empty() {
        vec![TextLine::from(Span::styled("(no properties)", Style::default().fg(Color::Gray)))]
    } else {
        popup
            .rows
            .iter()
            .map(|(key, value)| {
                TextLine::from(vec![
                    Span::styled(format!("{key}: "), Style::default().fg(Color::Yellow)),
                    Span::raw(value.as_str()),
                ])
            })
            .collect()
    };

    let width = POPUP_WIDTH.min(canvas.width);
    let height = u16::try_from(lines.len() + 2).unwrap_or(u16::MAX).min(canvas.height);
    let column = canvas.x + app.pointer.column;
    let row = canvas.y + app.pointer.row;
    let x = if column + 1 + width <= canvas.right() {
        column + 1
    } else {
        column.saturating_sub(width).max(canvas.x)
    };
    let y = if row + 1 + height <= canvas.bottom() {
        row + 1
    } else {
        row.saturating_sub(height).max(canvas.y)
    };
    let area = Rect::new(x, y, width, height);

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(Text::from(lines))
            .block(bordered(popup.dataset.label(), Color::Cyan))
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn render_bottom_bar(app: &WebApp, f: &mut Frame<'_>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Length(28),
            Constraint::Min(10),
        ])
        .split(area);

    let search = if app.searching {
        TextLine::from(vec![
            Span::raw(app.search_input.as_str()),
            Span::styled("▏", Style::default().fg(Color::Yellow)),
        ])
    } else {
        TextLine::from(Span::styled("press / to search", Style::default().fg(Color::DarkGray)))
    };
    let search_color = if app.searching { Color::Yellow } else { Color::Gray };
    f.render_widget(
        Paragraph::new(search).block(bordered(" Search ", search_color)),
        chunks[0],
    );

    f.render_widget(
        Paragraph::new(app.map.distance_readout()).block(bordered("", Color::Cyan)),
        chunks[1],
    );

    f.render_widget(
        Paragraph::new(Span::styled(status_text(app), Style::default().fg(Color::Green)))
            .block(bordered(" Status ", Color::Yellow)),
        chunks[2],
    );
}

fn status_text(app: &WebApp) -> String {
    if !app.status.is_empty() {
        return app.status.clone();
    }
    if app.map.distance().is_armed() {
        return match app.map.distance().phase() {
            MeasurePhase::OneSelected(_) => "Space on the second point".to_string(),
            MeasurePhase::Idle | MeasurePhase::Done { .. } => "Space on the first point".to_string(),
        };
    }
    "1-7 layers | arrows pointer | m measure".to_string()
}

fn render_notice(message: &str, f: &mut Frame<'_>, area: Rect) {
    let width = 44.min(area.width);
    let height = 5.min(area.height);
    let rect = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );

    f.render_widget(Clear, rect);
    f.render_widget(
        Paragraph::new(Text::from(vec![
            TextLine::from(message.to_string()),
            TextLine::from(Span::styled("Enter to dismiss", Style::default().fg(Color::Gray))),
        ]))
        .alignment(Alignment::Center)
        .block(bordered(" Notice ", Color::Red))
        .wrap(Wrap { trim: true }),
        rect,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use overlay_core::color::Hsl;
    use overlay_core::domain::ShapeKind;
    use overlay_core::style::FeatureStyle;
    use overlay_core::MapEvent;

    #[test]
    fn area_outlines_blend_over_the_background() {
        let hsl = Hsl {
            hue: 0.0,
            saturation: 70.0,
            lightness: 60.0,
        };
        let rendering = Rendering::Path(FeatureStyle::new(hsl, ShapeKind::Area));
        assert_eq!(path_color(&rendering, true), Color::Rgb(134, 49, 49));
        assert_eq!(path_color(&rendering, false), rgb(hsl.to_rgb()));
    }

    #[test]
    fn status_walks_through_the_measurement() {
        let mut app = WebApp::new();
        assert_eq!(status_text(&app), "1-7 layers | arrows pointer | m measure");

        app.dispatch(MapEvent::ActivateMeasure);
        assert_eq!(status_text(&app), "Space on the first point");

        app.click_pointer();
        assert_eq!(status_text(&app), "Space on the second point");
    }
}
