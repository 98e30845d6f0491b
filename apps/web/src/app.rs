use crate::pointer::{cell_tolerance, Pointer, CELL_HEIGHT_PX, CELL_WIDTH_PX};
use overlay_core::search::normalize_query;
use overlay_core::view::MapView;
use overlay_core::{DatasetId, Effect, MapEvent, MapState};
use ratzilla::ratatui::layout::Rect;

pub const SIDEBAR_WIDTH: u16 = 30;
pub const BOTTOM_BAR_HEIGHT: u16 = 3;
const PAN_STEP_CELLS: f64 = 4.0;

/// Inner canvas of the map block for a page of `area` cells.
pub const fn map_canvas(area: Rect) -> Rect {
    let left = area.x + SIDEBAR_WIDTH + 1;
    Rect {
        x: left,
        y: area.y + 1,
        width: area.width.saturating_sub(SIDEBAR_WIDTH + 2),
        height: area.height.saturating_sub(BOTTOM_BAR_HEIGHT + 2),
    }
}

/// Browser-side viewer state, shared between the key handler, the renderer
/// and the fetch tasks.
#[derive(Debug)]
pub struct WebApp {
    pub map: MapState,
    pub menu_index: usize,
    pub searching: bool,
    pub search_input: String,
    pub status: String,
    pub pointer: Pointer,
    pub canvas: Rect,
    effects: Vec<Effect>,
}

impl WebApp {
    pub fn new() -> Self {
        let canvas = map_canvas(Rect::new(0, 0, 120, 40));
        Self {
            map: MapState::new(),
            menu_index: 0,
            searching: false,
            search_input: String::new(),
            status: String::new(),
            pointer: Pointer::centered(canvas.width, canvas.height),
            canvas,
            effects: Vec::new(),
        }
    }

    /// Called every frame with the page size; recenters the pointer when the
    /// canvas changes shape.
    pub fn resize(&mut self, area: Rect) {
        let canvas = map_canvas(area);
        if canvas == self.canvas {
            return;
        }
        self.canvas = canvas;
        self.pointer = Pointer::centered(canvas.width, canvas.height);
        self.map.set_screen_px(
            f64::from(canvas.width) * CELL_WIDTH_PX,
            f64::from(canvas.height) * CELL_HEIGHT_PX,
        );
    }

    pub fn dispatch(&mut self, event: MapEvent) {
        if let Some(effect) = self.map.handle(event) {
            self.effects.push(effect);
        }
    }

    pub fn receive(&mut self, event: MapEvent) {
        if matches!(event, MapEvent::SearchResolved(_)) {
            self.status.clear();
        }
        self.dispatch(event);
    }

    pub fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    pub fn select_menu(&mut self, index: usize) {
        if let Some(id) = DatasetId::from_index(index) {
            self.menu_index = index;
            self.dispatch(MapEvent::SelectLayer(id));
        }
    }

    pub fn next_menu(&mut self) {
        self.menu_index = (self.menu_index + 1) % DatasetId::ALL.len();
    }

    pub fn begin_search(&mut self) {
        self.searching = true;
        self.search_input.clear();
    }

    pub fn cancel_search(&mut self) {
        self.searching = false;
        self.search_input.clear();
    }

    pub fn submit_search(&mut self) {
        let query = std::mem::take(&mut self.search_input);
        self.searching = false;
        if let Some(trimmed) = normalize_query(&query) {
            self.status = format!("Searching for \"{trimmed}\"...");
        }
        self.dispatch(MapEvent::SubmitSearch(query));
    }

    /// Moves the pointer and reports the new position as a hover.
    pub fn move_pointer(&mut self, dx: i32, dy: i32) {
        self.pointer = self
            .pointer
            .moved(dx, dy, self.canvas.width, self.canvas.height);
        if let Some(at) = self.pointer_position() {
            self.dispatch(MapEvent::PointerMoved {
                at,
                tolerance: self.tolerance(),
            });
        }
    }

    pub fn click_pointer(&mut self) {
        if let Some(at) = self.pointer_position() {
            self.dispatch(MapEvent::MapClicked {
                at,
                tolerance: self.tolerance(),
            });
        }
    }

    pub fn pointer_left(&mut self) {
        self.dispatch(MapEvent::PointerLeft);
    }

    pub fn pointer_position(&self) -> Option<overlay_core::LatLng> {
        self.pointer
            .position(self.map.view(), self.canvas.width, self.canvas.height)
    }

    pub fn tolerance(&self) -> f64 {
        cell_tolerance(self.map.view().zoom)
    }

    /// Pans by whole steps; positive `dy` moves north.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.map.view_mut().pan_pixels(
            dx * PAN_STEP_CELLS * CELL_WIDTH_PX,
            dy * PAN_STEP_CELLS * CELL_HEIGHT_PX,
        );
    }

    pub fn zoom(&mut self, delta: f64) {
        self.map.view_mut().zoom_by(delta);
    }

    pub fn reset_view(&mut self) {
        *self.map.view_mut() = MapView::default();
    }
}

impl Default for WebApp {
    fn default() -> Self {
        Self::new()
    }
}
