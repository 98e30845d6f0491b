use crate::ui::layout::{map_canvas_area, menu_row_at, MapProjection, CELL_HEIGHT_PX, CELL_WIDTH_PX};
use overlay_core::search::normalize_query;
use overlay_core::state::LoadStatus;
use overlay_core::view::MapView;
use overlay_core::{DatasetId, Effect, MapEvent, MapState};
use ratatui::layout::Rect;
use std::time::{Duration, Instant};
use throbber_widgets_tui::ThrobberState;

const THROBBER_INTERVAL: Duration = Duration::from_millis(120);
/// Cells moved per pan keystroke.
pub const PAN_STEP_CELLS: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Browse,
    Search,
}

#[derive(Debug)]
pub struct App {
    pub running: bool,
    pub map: MapState,
    pub menu_index: usize,
    pub input_mode: InputMode,
    pub search_input: String,
    pub status_message: String,
    pub show_help: bool,
    pub throbber: ThrobberState,
    pub last_tick: Instant,
    /// Terminal area the UI was last laid out in.
    pub screen: Rect,
    /// Last mouse position over the map canvas.
    pub hover: Option<(u16, u16)>,
    effects: Vec<Effect>,
}

impl App {
    pub fn new() -> Self {
        Self {
            running: true,
            map: MapState::new(),
            menu_index: 0,
            input_mode: InputMode::Browse,
            search_input: String::new(),
            status_message: String::new(),
            show_help: false,
            throbber: ThrobberState::default(),
            last_tick: Instant::now(),
            screen: Rect::new(0, 0, 80, 24),
            hover: None,
            effects: Vec::new(),
        }
    }

    /// Advances the loading spinner.
    pub fn update(&mut self) {
        if self.last_tick.elapsed() >= THROBBER_INTERVAL {
            self.throbber.calc_next();
            self.last_tick = Instant::now();
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.screen = Rect::new(0, 0, width, height);
        let canvas = map_canvas_area(self.screen);
        self.map.set_screen_px(
            f64::from(canvas.width) * CELL_WIDTH_PX,
            f64::from(canvas.height) * CELL_HEIGHT_PX,
        );
    }

    pub fn projection(&self) -> MapProjection {
        MapProjection::new(self.map.view(), map_canvas_area(self.screen))
    }

    /// Feeds a user action to the map and queues any work it asks for.
    pub fn dispatch(&mut self, event: MapEvent) {
        if let Some(effect) = self.map.handle(event) {
            self.effects.push(effect);
        }
    }

    /// Applies a background completion.
    pub fn receive(&mut self, event: MapEvent) {
        if matches!(event, MapEvent::SearchResolved(_)) {
            self.status_message.clear();
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

    pub fn menu_row_at(&self, column: u16, row: u16) -> Option<usize> {
        menu_row_at(self.screen, column, row)
    }

    pub fn submit_search(&mut self) {
        let query = std::mem::take(&mut self.search_input);
        self.input_mode = InputMode::Browse;
        if let Some(trimmed) = normalize_query(&query) {
            self.status_message = format!("Searching for \"{trimmed}\"...");
        }
        self.dispatch(MapEvent::SubmitSearch(query));
    }

    pub fn pan(&mut self, dx_cells: f64, dy_cells: f64) {
        self.map
            .view_mut()
            .pan_pixels(dx_cells * CELL_WIDTH_PX, dy_cells * CELL_HEIGHT_PX);
    }

    pub fn zoom(&mut self, delta: f64) {
        self.map.view_mut().zoom_by(delta);
    }

    pub fn reset_view(&mut self) {
        *self.map.view_mut() = MapView::default();
    }

    /// Keyboard stand-in for a mouse click at the middle of the map.
    pub fn click_center(&mut self) {
        let tolerance = self.projection().tolerance();
        let at = self.map.view().center;
        self.dispatch(MapEvent::MapClicked { at, tolerance });
    }

    pub fn click_cell(&mut self, column: u16, row: u16) {
        let projection = self.projection();
        if let Some(at) = projection.cell_to_latlng(column, row) {
            self.dispatch(MapEvent::MapClicked {
                at,
                tolerance: projection.tolerance(),
            });
        }
    }

    pub fn hover_cell(&mut self, column: u16, row: u16) {
        let projection = self.projection();
        match projection.cell_to_latlng(column, row) {
            Some(at) => {
                self.hover = Some((column, row));
                self.dispatch(MapEvent::PointerMoved {
                    at,
                    tolerance: projection.tolerance(),
                });
            }
            None => {
                self.hover = None;
                if self.map.popup().is_some() {
                    self.dispatch(MapEvent::PointerLeft);
                }
            }
        }
    }

    pub fn loading_count(&self) -> usize {
        DatasetId::ALL
            .iter()
            .filter(|id| matches!(self.map.load_status(**id), Some(LoadStatus::Loading)))
            .count()
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use overlay_core::search::GeocodeResult;

    fn app() -> App {
        let mut app = App::new();
        app.resize(120, 40);
        app
    }

    #[test]
    fn search_submission_queues_a_geocode() {
        let mut app = app();
        app.search_input = "  Kandy ".to_string();
        app.input_mode = InputMode::Search;

        app.submit_search();

        assert_eq!(app.input_mode, InputMode::Browse);
        assert!(app.search_input.is_empty());
        assert_eq!(app.take_effects(), vec![Effect::Geocode("Kandy".to_string())]);
        assert!(app.take_effects().is_empty());
        assert_eq!(app.status_message, "Searching for \"Kandy\"...");
    }

    #[test]
    fn blank_search_does_nothing() {
        let mut app = app();
        app.search_input = "   ".to_string();
        app.submit_search();
        assert!(app.take_effects().is_empty());
        assert!(app.status_message.is_empty());
    }

    #[test]
    fn search_result_clears_status_and_moves_view() {
        let mut app = app();
        app.status_message = "Searching".to_string();
        app.receive(MapEvent::SearchResolved(Ok(vec![GeocodeResult {
            lat: "6.9271".to_string(),
            lon: "79.8612".to_string(),
            display_name: "Colombo".to_string(),
        }])));

        assert!(app.status_message.is_empty());
        assert!((app.map.view().zoom - 13.0).abs() < f64::EPSILON);
        assert!(app.map.search_marker().is_some());
    }

    #[test]
    fn menu_selection_tracks_index_and_queues_layer() {
        let mut app = app();
        app.select_menu(3);
        assert_eq!(app.menu_index, 3);
        assert_eq!(app.map.pending(), Some(DatasetId::Schools));

        app.select_menu(42);
        assert_eq!(app.menu_index, 3);
    }

    #[test]
    fn center_click_measures_when_armed() {
        let mut app = app();
        app.dispatch(MapEvent::ActivateMeasure);
        app.click_center();
        assert_eq!(app.map.measure_markers().len(), 1);
    }

    #[test]
    fn hovering_outside_the_map_clears_hover() {
        let mut app = app();
        app.hover = Some((60, 10));
        app.hover_cell(0, 0);
        assert_eq!(app.hover, None);
    }

    #[test]
    fn panning_and_zooming_move_the_view() {
        let mut app = app();
        let before = app.map.view().center;
        app.pan(PAN_STEP_CELLS, 0.0);
        assert!(app.map.view().center.lon > before.lon);

        app.zoom(20.0);
        assert!((app.map.view().zoom - 18.0).abs() < f64::EPSILON);

        app.reset_view();
        assert_eq!(*app.map.view(), MapView::default());
    }
}
