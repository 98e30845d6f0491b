use crate::color::{Hsl, Rgb};
use crate::domain::ShapeKind;

pub const POINT_MARKER_RADIUS: f64 = 6.0;
pub const POINT_MARKER_OUTLINE: Rgb = Rgb::from_hex(0x0033_3333);
pub const POINT_MARKER_WEIGHT: f64 = 1.0;
pub const POINT_MARKER_FILL_OPACITY: f64 = 0.9;

pub const MEASURE_LINE_COLOR: Rgb = Rgb::from_hex(0x0017_6b87);
pub const MEASURE_LINE_WEIGHT: f64 = 4.0;

/// Path style shared by lines and polygons of one dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureStyle {
    pub fill_color: Hsl,
    pub color: Hsl,
    pub weight: f64,
    pub fill_opacity: f64,
}

impl FeatureStyle {
    pub fn new(color: Hsl, shape: ShapeKind) -> Self {
        Self {
            fill_color: color,
            color,
            weight: stroke_weight(shape),
            fill_opacity: fill_opacity(shape),
        }
    }
}

pub const fn stroke_weight(shape: ShapeKind) -> f64 {
    match shape {
        ShapeKind::Line => 3.0,
        ShapeKind::Point => 1.0,
        ShapeKind::Area => 1.5,
    }
}

pub const fn fill_opacity(shape: ShapeKind) -> f64 {
    match shape {
        ShapeKind::Point => 1.0,
        ShapeKind::Line | ShapeKind::Area => 0.6,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleMarkerStyle {
    pub radius: f64,
    pub fill_color: Hsl,
    pub color: Rgb,
    pub weight: f64,
    pub fill_opacity: f64,
}

impl CircleMarkerStyle {
    pub const fn new(fill_color: Hsl) -> Self {
        Self {
            radius: POINT_MARKER_RADIUS,
            fill_color,
            color: POINT_MARKER_OUTLINE,
            weight: POINT_MARKER_WEIGHT,
            fill_opacity: POINT_MARKER_FILL_OPACITY,
        }
    }
}

/// How a single feature is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rendering {
    /// Lines and polygons.
    Path(FeatureStyle),
    /// Point geometry in a point-shaped dataset.
    CircleMarker(CircleMarkerStyle),
    /// Point geometry in any other dataset.
    DefaultMarker,
}

impl Rendering {
    pub const fn fill_color(&self) -> Option<Hsl> {
        match self {
            Self::Path(style) => Some(style.fill_color),
            Self::CircleMarker(style) => Some(style.fill_color),
            Self::DefaultMarker => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Hsl = Hsl {
        hue: 0.0,
        saturation: 70.0,
        lightness: 60.0,
    };

    #[test]
    fn weights_and_opacity_depend_on_shape() {
        let line = FeatureStyle::new(RED, ShapeKind::Line);
        assert!((line.weight - 3.0).abs() < f64::EPSILON);
        assert!((line.fill_opacity - 0.6).abs() < f64::EPSILON);

        let point = FeatureStyle::new(RED, ShapeKind::Point);
        assert!((point.weight - 1.0).abs() < f64::EPSILON);
        assert!((point.fill_opacity - 1.0).abs() < f64::EPSILON);

        let area = FeatureStyle::new(RED, ShapeKind::Area);
        assert!((area.weight - 1.5).abs() < f64::EPSILON);
        assert!((area.fill_opacity - 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn fill_and_stroke_share_the_category_color() {
        let style = FeatureStyle::new(RED, ShapeKind::Area);
        assert_eq!(style.fill_color, style.color);
    }

    #[test]
    fn circle_markers_use_fixed_style() {
        let marker = CircleMarkerStyle::new(RED);
        assert!((marker.radius - 6.0).abs() < f64::EPSILON);
        assert!((marker.fill_opacity - 0.9).abs() < f64::EPSILON);
        assert_eq!(marker.color, Rgb(0x33, 0x33, 0x33));
        assert_eq!(Rendering::CircleMarker(marker).fill_color(), Some(RED));
        assert_eq!(Rendering::DefaultMarker.fill_color(), None);
    }
}
