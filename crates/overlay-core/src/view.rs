use geo::{Point, Rect};
use serde::Serialize;

pub const INITIAL_CENTER: LatLng = LatLng {
    lat: 7.8731,
    lon: 80.7718,
};
pub const INITIAL_ZOOM: f64 = 8.0;
pub const SEARCH_ZOOM: f64 = 13.0;
pub const MIN_ZOOM: f64 = 2.0;
pub const MAX_ZOOM: f64 = 18.0;
const TILE_SIZE: f64 = 256.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLng {
    pub lat: f64,
    pub lon: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn to_point(self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }

    pub fn from_point(point: Point<f64>) -> Self {
        Self::new(point.y(), point.x())
    }
}

/// Degrees of longitude covered by one screen pixel at `zoom`.
pub fn degrees_per_pixel(zoom: f64) -> f64 {
    360.0 / (TILE_SIZE * 2f64.powf(zoom))
}

/// Visible geographic extent for a screen of a given pixel size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub west: f64,
    pub east: f64,
    pub south: f64,
    pub north: f64,
}

impl Viewport {
    pub fn contains(&self, position: LatLng) -> bool {
        (self.west..=self.east).contains(&position.lon)
            && (self.south..=self.north).contains(&position.lat)
    }

    pub fn intersects(&self, rect: &Rect<f64>) -> bool {
        rect.max().x >= self.west
            && rect.min().x <= self.east
            && rect.max().y >= self.south
            && rect.min().y <= self.north
    }

    /// Geographic position at fractional screen coordinates, `(0, 0)` being top-left.
    pub fn unproject(&self, fx: f64, fy: f64) -> LatLng {
        LatLng::new(
            (self.north - self.south).mul_add(-fy, self.north),
            (self.east - self.west).mul_add(fx, self.west),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub center: LatLng,
    pub zoom: f64,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: INITIAL_CENTER,
            zoom: INITIAL_ZOOM,
        }
    }
}

impl MapView {
    pub fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.center = center;
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn viewport(&self, width_px: f64, height_px: f64) -> Viewport {
        let step = degrees_per_pixel(self.zoom);
        let half_w = width_px * step / 2.0;
        let half_h = height_px * step / 2.0;
        Viewport {
            west: self.center.lon - half_w,
            east: self.center.lon + half_w,
            south: self.center.lat - half_h,
            north: self.center.lat + half_h,
        }
    }

    /// Centers on `bounds` at the largest whole zoom that still shows all of it.
    pub fn fit_bounds(&mut self, bounds: Rect<f64>, width_px: f64, height_px: f64) {
        let center = LatLng::from_point(bounds.center().into());
        let span_x = bounds.width();
        let span_y = bounds.height();

        let zoom_for = |span: f64, pixels: f64| {
            if span <= 0.0 {
                MAX_ZOOM
            } else {
                (360.0 * pixels / (TILE_SIZE * span)).log2()
            }
        };
        let zoom = zoom_for(span_x, width_px)
            .min(zoom_for(span_y, height_px))
            .floor();

        self.set_view(center, zoom);
    }

    pub fn zoom_by(&mut self, delta: f64) {
        self.zoom = (self.zoom + delta).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Moves the center by a number of screen pixels; positive `dy` moves north.
    pub fn pan_pixels(&mut self, dx: f64, dy: f64) {
        let step = degrees_per_pixel(self.zoom);
        self.center.lon = dx.mul_add(step, self.center.lon);
        self.center.lat = dy.mul_add(step, self.center.lat).clamp(-85.0, 85.0);
    }
}
