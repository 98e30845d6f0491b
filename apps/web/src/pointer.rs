use overlay_core::view::{degrees_per_pixel, MapView};
use overlay_core::LatLng;

/// Nominal pixel size of one DOM grid cell.
pub const CELL_WIDTH_PX: f64 = 8.0;
pub const CELL_HEIGHT_PX: f64 = 16.0;

/// Keyboard-driven pointer over the map canvas, in cells from its top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pointer {
    pub column: u16,
    pub row: u16,
}

impl Pointer {
    pub const fn centered(width: u16, height: u16) -> Self {
        Self {
            column: width / 2,
            row: height / 2,
        }
    }

    /// Moves by whole cells, staying on a `width` x `height` canvas.
    pub fn moved(self, dx: i32, dy: i32, width: u16, height: u16) -> Self {
        let clamp = |value: u16, delta: i32, len: u16| {
            let max = i32::from(len.saturating_sub(1));
            u16::try_from((i32::from(value) + delta).clamp(0, max)).unwrap_or(0)
        };
        Self {
            column: clamp(self.column, dx, width),
            row: clamp(self.row, dy, height),
        }
    }

    /// Geographic position under the middle of the pointer's cell.
    pub fn position(self, view: &MapView, width: u16, height: u16) -> Option<LatLng> {
        if width == 0 || height == 0 {
            return None;
        }
        let viewport = view.viewport(
            f64::from(width) * CELL_WIDTH_PX,
            f64::from(height) * CELL_HEIGHT_PX,
        );
        let fx = (f64::from(self.column.min(width - 1)) + 0.5) / f64::from(width);
        let fy = (f64::from(self.row.min(height - 1)) + 0.5) / f64::from(height);
        Some(viewport.unproject(fx, fy))
    }
}

/// Hit-test slack of about one cell, in degrees.
pub fn cell_tolerance(zoom: f64) -> f64 {
    degrees_per_pixel(zoom) * CELL_WIDTH_PX
}
