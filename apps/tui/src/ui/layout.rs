use overlay_core::view::{degrees_per_pixel, MapView, Viewport};
use overlay_core::{DatasetId, LatLng};
use ratatui::layout::{Constraint, Direction, Layout, Margin, Rect};

/// Nominal pixel size of one terminal cell, used to map cells onto map scale.
pub const CELL_WIDTH_PX: f64 = 8.0;
pub const CELL_HEIGHT_PX: f64 = 16.0;

const SIDEBAR_WIDTH: u16 = 34;
const BOTTOM_BAR_HEIGHT: u16 = 3;
const MENU_HEIGHT: u16 = DatasetId::ALL.len() as u16 + 2;
const INFO_HEIGHT: u16 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MainLayout {
    pub menu: Rect,
    pub legend: Rect,
    pub info: Option<Rect>,
    pub map: Rect,
    pub bottom_bar: Rect,
}

pub fn main_layout(area: Rect, info_visible: bool) -> MainLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(BOTTOM_BAR_HEIGHT)])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(10)])
        .split(rows[0]);

    let sidebar = if info_visible {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(MENU_HEIGHT),
                Constraint::Min(3),
                Constraint::Length(INFO_HEIGHT),
            ])
            .split(columns[0])
            .to_vec()
    } else {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(MENU_HEIGHT), Constraint::Min(3)])
            .split(columns[0])
            .to_vec()
    };

    MainLayout {
        menu: sidebar[0],
        legend: sidebar[1],
        info: sidebar.get(2).copied(),
        map: columns[1],
        bottom_bar: rows[1],
    }
}

/// Drawable area of the map, inside its border.
pub fn map_canvas_area(screen: Rect) -> Rect {
    main_layout(screen, false).map.inner(Margin::new(1, 1))
}

/// Menu entry under a screen cell, if any.
pub fn menu_row_at(screen: Rect, column: u16, row: u16) -> Option<usize> {
    let inner = main_layout(screen, false).menu.inner(Margin::new(1, 1));
    if !contains(inner, column, row) {
        return None;
    }
    let index = usize::from(row - inner.y);
    (index < DatasetId::ALL.len()).then_some(index)
}

const fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}

/// Maps between terminal cells and geographic positions for the map canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapProjection {
    pub area: Rect,
    pub viewport: Viewport,
    pub zoom: f64,
}

impl MapProjection {
    pub fn new(view: &MapView, area: Rect) -> Self {
        let viewport = view.viewport(
            f64::from(area.width) * CELL_WIDTH_PX,
            f64::from(area.height) * CELL_HEIGHT_PX,
        );
        Self {
            area,
            viewport,
            zoom: view.zoom,
        }
    }

    /// Position under the middle of a cell; `None` off the canvas.
    pub fn cell_to_latlng(&self, column: u16, row: u16) -> Option<LatLng> {
        if !contains(self.area, column, row) {
            return None;
        }
        let fx = (f64::from(column - self.area.x) + 0.5) / f64::from(self.area.width);
        let fy = (f64::from(row - self.area.y) + 0.5) / f64::from(self.area.height);
        Some(self.viewport.unproject(fx, fy))
    }

    pub fn latlng_to_cell(&self, at: LatLng) -> Option<(u16, u16)> {
        if !self.viewport.contains(at) || self.area.width == 0 || self.area.height == 0 {
            return None;
        }
        let vp = &self.viewport;
        let fx = (at.lon - vp.west) / (vp.east - vp.west);
        let fy = (vp.north - at.lat) / (vp.north - vp.south);
        let column = (fx * f64::from(self.area.width)).floor() as u16;
        let row = (fy * f64::from(self.area.height)).floor() as u16;
        Some((
            self.area.x + column.min(self.area.width - 1),
            self.area.y + row.min(self.area.height - 1),
        ))
    }

    /// Hit-test slack in degrees: about one cell.
    pub fn tolerance(&self) -> f64 {
        degrees_per_pixel(self.zoom) * CELL_WIDTH_PX
    }

    /// Degrees spanned by a single point on the map canvas, one of a 2x4 braille grid per cell.
    pub fn dot_height(&self) -> f64 {
        (self.viewport.north - self.viewport.south) / (f64::from(self.area.height.max(1)) * 4.0)
    }
}
