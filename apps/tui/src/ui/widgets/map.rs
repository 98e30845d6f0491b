use crate::app::App;
use crate::ui::layout::MapProjection;
use crate::ui::rgb;
use crate::ui::widgets::popup::render_feature_popup;
use geo::{Coord, Geometry, Point, Polygon};
use overlay_core::color::Rgb;
use overlay_core::distance::Cursor;
use overlay_core::state::Polyline;
use overlay_core::style::{Rendering, MEASURE_LINE_COLOR};
use overlay_core::{LatLng, LoadedLayer};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::canvas::{Canvas, Context, Line as CanvasLine, Map as WorldMap, MapResolution};
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;

/// Strokes at least this heavy are drawn twice, one braille dot apart.
const DOUBLE_STROKE_WEIGHT: f64 = 3.0;
const BACKGROUND: Rgb = Rgb::BLACK;
const SEARCH_LABEL_MAX: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Pen {
    color: Color,
    doubled: bool,
}

impl Pen {
    fn for_path(rendering: &Rendering, polygon: bool) -> Self {
        match rendering {
            Rendering::Path(style) => Self {
                color: if polygon {
                    rgb(style.fill_color.to_rgb().over(BACKGROUND, style.fill_opacity))
                } else {
                    rgb(style.color.to_rgb())
                },
                doubled: style.weight >= DOUBLE_STROKE_WEIGHT,
            },
            Rendering::CircleMarker(_) | Rendering::DefaultMarker => Self {
                color: Color::Gray,
                doubled: false,
            },
        }
    }

    fn for_polyline(line: &Polyline) -> Self {
        Self {
            color: rgb(line.color),
            doubled: line.weight >= DOUBLE_STROKE_WEIGHT,
        }
    }
}

pub fn render_map(app: &App, f: &mut Frame<'_>, area: Rect) {
    let armed = app.map.cursor() == Cursor::Crosshair;
    let accent = if armed { Color::Yellow } else { Color::Cyan };
    let title = app.map.active_layer().map_or_else(
        || " Map ".to_string(),
        |layer| format!(" Map - {} ", layer.id.label()),
    );
    let block = Block::default()
        .title(title)
        .title_style(Style::default().fg(accent).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent));

    let projection = MapProjection::new(app.map.view(), block.inner(area));
    let viewport = projection.viewport;
    let crosshair = armed.then(|| {
        app.hover
            .and_then(|(column, row)| projection.cell_to_latlng(column, row))
            .unwrap_or(app.map.view().center)
    });

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
                draw_layer(ctx, layer, &projection);
            }
            ctx.layer();

            if let Some(line) = app.map.measure_line() {
                let pen = Pen::for_polyline(line);
                let coords: Vec<Coord<f64>> =
                    line.points.iter().map(|at| at.to_point().0).collect();
                draw_path(ctx, &coords, pen, projection.dot_height());
            }
            for marker in app.map.measure_markers() {
                print_at(ctx, *marker, Span::styled("◆", marker_style(rgb(MEASURE_LINE_COLOR))));
            }

            if let Some(marker) = app.map.search_marker() {
                ctx.print(
                    marker.position.lon,
                    marker.position.lat,
                    TextLine::from(vec![
                        Span::styled("▼", marker_style(Color::LightBlue)),
                        Span::styled(
                            format!(" {}", truncate(&marker.label, SEARCH_LABEL_MAX)),
                            Style::default().fg(Color::White),
                        ),
                    ]),
                );
            }

            if let Some(at) = crosshair {
                print_at(ctx, at, Span::styled("+", marker_style(Color::Yellow)));
            }
        });

    f.render_widget(canvas, area);
    render_feature_popup(app, f, &projection);
}

fn draw_layer(ctx: &mut Context<'_>, layer: &LoadedLayer, projection: &MapProjection) {
    for feature in &layer.features {
        if feature
            .bounds
            .is_some_and(|bounds| !projection.viewport.intersects(&bounds))
        {
            continue;
        }
        draw_geometry(ctx, &feature.geometry, &feature.rendering, projection);
    }
}

fn draw_geometry(
    ctx: &mut Context<'_>,
    geometry: &Geometry<f64>,
    rendering: &Rendering,
    projection: &MapProjection,
) {
    let dot = projection.dot_height();
    match geometry {
        Geometry::Point(point) => draw_point(ctx, *point, rendering),
        Geometry::MultiPoint(points) => {
            for point in &points.0 {
                draw_point(ctx, *point, rendering);
            }
        }
        Geometry::Line(line) => {
            draw_path(ctx, &[line.start, line.end], Pen::for_path(rendering, false), dot);
        }
        Geometry::LineString(line) => {
            draw_path(ctx, &line.0, Pen::for_path(rendering, false), dot);
        }
        Geometry::MultiLineString(lines) => {
            for line in &lines.0 {
                draw_path(ctx, &line.0, Pen::for_path(rendering, false), dot);
            }
        }
        Geometry::Polygon(polygon) => draw_polygon(ctx, polygon, rendering, dot),
        Geometry::MultiPolygon(polygons) => {
            for polygon in &polygons.0 {
                draw_polygon(ctx, polygon, rendering, dot);
            }
        }
        Geometry::Rect(rect) => draw_polygon(ctx, &rect.to_polygon(), rendering, dot),
        Geometry::Triangle(triangle) => {
            draw_polygon(ctx, &triangle.to_polygon(), rendering, dot);
        }
        Geometry::GeometryCollection(collection) => {
            for member in &collection.0 {
                draw_geometry(ctx, member, rendering, projection);
            }
        }
    }
}

fn draw_point(ctx: &mut Context<'_>, point: Point<f64>, rendering: &Rendering) {
    let at = LatLng::from_point(point);
    match rendering {
        Rendering::CircleMarker(style) => {
            let fill = style.fill_color.to_rgb().over(BACKGROUND, style.fill_opacity);
            print_at(ctx, at, Span::styled("●", marker_style(rgb(fill))));
        }
        Rendering::DefaultMarker | Rendering::Path(_) => {
            print_at(ctx, at, Span::styled("▼", marker_style(Color::LightBlue)));
        }
    }
}

fn draw_polygon(ctx: &mut Context<'_>, polygon: &Polygon<f64>, rendering: &Rendering, dot: f64) {
    let pen = Pen::for_path(rendering, true);
    draw_path(ctx, &polygon.exterior().0, pen, dot);
    for ring in polygon.interiors() {
        draw_path(ctx, &ring.0, pen, dot);
    }
}

fn draw_path(ctx: &mut Context<'_>, coords: &[Coord<f64>], pen: Pen, dot: f64) {
    for pair in coords.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        ctx.draw(&CanvasLine {
            x1: from.x,
            y1: from.y,
            x2: to.x,
            y2: to.y,
            color: pen.color,
        });
        if pen.doubled {
            ctx.draw(&CanvasLine {
                x1: from.x,
                y1: from.y - dot,
                x2: to.x,
                y2: to.y - dot,
                color: pen.color,
            });
        }
    }
}

fn print_at(ctx: &mut Context<'_>, at: LatLng, span: Span<'static>) {
    ctx.print(at.lon, at.lat, span);
}

fn marker_style(color: Color) -> Style {
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut short: String = text.chars().take(max.saturating_sub(1)).collect();
    short.push('…');
    short
}

#[cfg(test)]
mod tests {
    use super::*;
    use overlay_core::color::Hsl;
    use overlay_core::domain::ShapeKind;
    use overlay_core::style::{FeatureStyle, MEASURE_LINE_WEIGHT};

    fn hsl(hue: f64) -> Hsl {
        Hsl {
            hue,
            saturation: 70.0,
            lightness: 60.0,
        }
    }

    #[test]
    fn area_outlines_are_blended_by_fill_opacity() {
        let rendering = Rendering::Path(FeatureStyle::new(hsl(0.0), ShapeKind::Area));
        let pen = Pen::for_path(&rendering, true);
        // rgb(224, 82, 82) at 60% over black
        assert_eq!(pen.color, Color::Rgb(134, 49, 49));
        assert!(!pen.doubled);
    }

    #[test]
    fn roads_are_drawn_doubled_at_full_color() {
        let rendering = Rendering::Path(FeatureStyle::new(hsl(0.0), ShapeKind::Line));
        let pen = Pen::for_path(&rendering, false);
        assert_eq!(pen.color, Color::Rgb(224, 82, 82));
        assert!(pen.doubled);
    }

    #[test]
    fn measurement_line_uses_its_own_color() {
        let line = Polyline {
            points: vec![LatLng::new(7.8, 80.7), LatLng::new(7.9, 80.8)],
            color: MEASURE_LINE_COLOR,
            weight: MEASURE_LINE_WEIGHT,
        };
        let pen = Pen::for_polyline(&line);
        assert_eq!(pen.color, Color::Rgb(0x17, 0x6b, 0x87));
        assert!(pen.doubled);
    }

    #[test]
    fn long_labels_are_shortened() {
        assert_eq!(truncate("Kandy", 32), "Kandy");
        assert_eq!(truncate("Sri Jayawardenepura Kotte", 10), "Sri Jayaw…");
    }
}
