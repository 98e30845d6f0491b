use crate::color::Rgb;
use crate::distance::{Cursor, DistanceTool, MeasureStep};
use crate::domain::DatasetId;
use crate::layer::LoadedLayer;
use crate::legend::Legend;
use crate::search::{GeocodeResult, SearchMarker, NOT_FOUND_NOTICE};
use crate::style::{MEASURE_LINE_COLOR, MEASURE_LINE_WEIGHT};
use crate::view::{LatLng, MapView, SEARCH_ZOOM};
use std::collections::{BTreeMap, BTreeSet};

/// Fallback screen size used for view fitting until the shell reports one.
const DEFAULT_SCREEN_PX: (f64, f64) = (1024.0, 768.0);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Loading,
    Loaded,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub dataset: DatasetId,
    pub feature: usize,
    pub anchor: LatLng,
    pub rows: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub points: Vec<LatLng>,
    pub color: Rgb,
    pub weight: f64,
}

/// Everything the viewer shows, owned in one place and changed only through
/// the controller methods below.
#[derive(Debug, Default)]
pub struct MapState {
    layers: BTreeMap<DatasetId, LoadedLayer>,
    status: BTreeMap<DatasetId, LoadStatus>,
    active: BTreeSet<DatasetId>,
    pending: Option<DatasetId>,
    legend: Option<Legend>,
    info_visible: bool,
    view: MapView,
    screen_px: Option<(f64, f64)>,
    distance: DistanceTool,
    measure_markers: Vec<LatLng>,
    measure_line: Option<Polyline>,
    search_marker: Option<SearchMarker>,
    popup: Option<Popup>,
    notice: Option<String>,
}

impl MapState {
    pub fn new() -> Self {
        Self::default()
    }

    // Accessors

    pub fn layer(&self, id: DatasetId) -> Option<&LoadedLayer> {
        self.layers.get(&id)
    }

    pub fn load_status(&self, id: DatasetId) -> Option<&LoadStatus> {
        self.status.get(&id)
    }

    pub const fn active(&self) -> &BTreeSet<DatasetId> {
        &self.active
    }

    pub fn active_layer(&self) -> Option<&LoadedLayer> {
        self.active.iter().find_map(|id| self.layers.get(id))
    }

    pub const fn pending(&self) -> Option<DatasetId> {
        self.pending
    }

    pub const fn legend(&self) -> Option<&Legend> {
        self.legend.as_ref()
    }

    pub const fn info_visible(&self) -> bool {
        self.info_visible
    }

    pub const fn view(&self) -> &MapView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut MapView {
        &mut self.view
    }

    pub fn set_screen_px(&mut self, width: f64, height: f64) {
        if width > 0.0 && height > 0.0 {
            self.screen_px = Some((width, height));
        }
    }

    pub const fn distance(&self) -> &DistanceTool {
        &self.distance
    }

    pub fn distance_readout(&self) -> String {
        self.distance.readout()
    }

    pub const fn cursor(&self) -> Cursor {
        self.distance.cursor()
    }

    pub fn measure_markers(&self) -> &[LatLng] {
        &self.measure_markers
    }

    pub const fn measure_line(&self) -> Option<&Polyline> {
        self.measure_line.as_ref()
    }

    pub const fn search_marker(&self) -> Option<&SearchMarker> {
        self.search_marker.as_ref()
    }

    pub const fn popup(&self) -> Option<&Popup> {
        self.popup.as_ref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    // Layer loading

    /// Marks `id` as loading. Returns `false` when a load was already started,
    /// so each dataset is requested at most once.
    pub fn begin_load(&mut self, id: DatasetId) -> bool {
        if self.status.contains_key(&id) {
            return false;
        }
        self.status.insert(id, LoadStatus::Loading);
        true
    }

    pub fn layer_loaded(&mut self, layer: LoadedLayer) {
        let id = layer.id;
        tracing::info!(dataset = %id, features = layer.features.len(), "Layer loaded");
        self.layers.insert(id, layer);
        self.status.insert(id, LoadStatus::Loaded);

        if self.pending == Some(id) {
            self.pending = None;
            self.show(id);
        }
    }

    pub fn layer_failed(&mut self, id: DatasetId, reason: String) {
        tracing::warn!(dataset = %id, "Layer failed to load: {reason}");
        self.status.insert(id, LoadStatus::Failed(reason));

        if self.pending == Some(id) {
            self.pending = None;
            self.notice = Some(failure_notice(id));
        }
    }

    // Layer toggling

    /// Shows `id` as the only overlay, or queues it until its load finishes.
    pub fn select_layer(&mut self, id: DatasetId) {
        self.active.clear();
        self.popup = None;
        self.pending = None;

        match self.status.get(&id) {
            Some(LoadStatus::Loaded) if self.layers.contains_key(&id) => self.show(id),
            Some(LoadStatus::Failed(_)) => {
                self.notice = Some(failure_notice(id));
            }
            _ => {
                tracing::debug!(dataset = %id, "Layer not loaded yet, queued");
                self.pending = Some(id);
            }
        }

        self.refresh_info_panel();
    }

    fn show(&mut self, id: DatasetId) {
        let Some(layer) = self.layers.get(&id) else {
            return;
        };
        self.active.insert(id);
        self.legend = Some(Legend::for_layer(layer));
        self.refresh_info_panel();
    }

    fn refresh_info_panel(&mut self) {
        self.info_visible = self.active.iter().any(|id| id.is_info_bearing());
    }

    // Feature interaction

    pub fn pointer_moved(&mut self, at: LatLng, tolerance: f64) {
        let hit = self
            .active_layer()
            .and_then(|layer| Some((layer.id, layer.feature_at(at, tolerance)?)));

        let Some((dataset, feature)) = hit else {
            self.popup = None;
            return;
        };

        let already_open = self
            .popup
            .as_ref()
            .is_some_and(|open| open.dataset == dataset && open.feature == feature);
        if already_open {
            return;
        }

        let rows = self
            .layers
            .get(&dataset)
            .and_then(|layer| layer.feature(feature))
            .map(|overlay| overlay.properties.clone())
            .unwrap_or_default();
        self.popup = Some(Popup {
            dataset,
            feature,
            anchor: at,
            rows,
        });
    }

    pub fn pointer_left(&mut self) {
        self.popup = None;
    }

    /// Routes a map click to the distance tool when armed, otherwise frames
    /// the clicked feature.
    pub fn map_clicked(&mut self, at: LatLng, tolerance: f64) {
        if self.distance.is_armed() {
            self.measure_click(at);
            return;
        }

        let bounds = self.active_layer().and_then(|layer| {
            layer
                .feature_at(at, tolerance)
                .and_then(|index| layer.features[index].bounds)
        });
        if let Some(bounds) = bounds {
            let (width, height) = self.screen_px.unwrap_or(DEFAULT_SCREEN_PX);
            self.view.fit_bounds(bounds, width, height);
        }
    }

    // Search

    pub fn search_resolved(&mut self, results: Result<Vec<GeocodeResult>, String>) {
        let results = match results {
            Ok(results) => results,
            Err(err) => {
                tracing::error!("Search error: {err}");
                return;
            }
        };

        let Some(first) = results.first() else {
            self.notice = Some(NOT_FOUND_NOTICE.to_string());
            return;
        };

        match first.position() {
            Ok(position) => {
                self.search_marker = Some(SearchMarker {
                    position,
                    label: first.display_name.clone(),
                });
                self.view.set_view(position, SEARCH_ZOOM);
            }
            Err(err) => tracing::error!("Search error: {err}"),
        }
    }

    // Distance measurement

    pub fn activate_measure(&mut self) {
        self.distance.activate();
    }

    fn measure_click(&mut self, at: LatLng) {
        match self.distance.click(at) {
            MeasureStep::Ignored => {}
            MeasureStep::Started(point) => self.measure_markers.push(point),
            MeasureStep::Restarted(point) => {
                self.clear_measurement();
                self.measure_markers.push(point);
            }
            MeasureStep::Finished { from, to, km } => {
                tracing::debug!(km, "Measured distance");
                self.measure_markers.push(to);
                self.measure_line = Some(Polyline {
                    points: vec![from, to],
                    color: MEASURE_LINE_COLOR,
                    weight: MEASURE_LINE_WEIGHT,
                });
            }
        }
    }

    /// Clears the measurement and its artifacts; the search marker stays.
    pub fn reset_distance(&mut self) {
        self.distance.reset();
        self.clear_measurement();
    }

    fn clear_measurement(&mut self) {
        self.measure_markers.clear();
        self.measure_line = None;
    }
}

fn failure_notice(id: DatasetId) -> String {
    format!("{} failed to load", id.label())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DISTANCE_PLACEHOLDER;
    use crate::layer::tests::{load, ROADS, SCHOOLS, SLOPE};

    fn state_with(loaded: &[(DatasetId, &str)]) -> MapState {
        let mut state = MapState::new();
        for id in DatasetId::ALL {
            state.begin_load(id);
        }
        for (id, text) in loaded {
            state.layer_loaded(load(*id, text));
        }
        state
    }

    fn geocode(lat: &str, lon: &str, name: &str) -> GeocodeResult {
        GeocodeResult {
            lat: lat.to_string(),
            lon: lon.to_string(),
            display_name: name.to_string(),
        }
    }

    #[test]
    fn loads_are_started_once_per_dataset() {
        let mut state = MapState::new();
        assert!(state.begin_load(DatasetId::Roads));
        assert!(!state.begin_load(DatasetId::Roads));
        assert_eq!(state.load_status(DatasetId::Roads), Some(&LoadStatus::Loading));
    }

    #[test]
    fn selecting_a_loaded_layer_shows_it_with_legend() {
        let mut state = state_with(&[(DatasetId::Roads, ROADS)]);
        state.select_layer(DatasetId::Roads);

        assert_eq!(state.active().iter().copied().collect::<Vec<_>>(), vec![DatasetId::Roads]);
        assert_eq!(state.legend().map(|l| l.dataset), Some(DatasetId::Roads));
        assert!(!state.info_visible());
        assert_eq!(state.pending(), None);
    }

    #[test]
    fn at_most_one_layer_is_active_after_any_toggle_sequence() {
        let mut state = state_with(&[
            (DatasetId::Roads, ROADS),
            (DatasetId::Schools, SCHOOLS),
            (DatasetId::Slope, SLOPE),
        ]);
        let sequence = [
            DatasetId::Roads,
            DatasetId::Schools,
            DatasetId::Schools,
            DatasetId::Hospitals,
            DatasetId::Slope,
            DatasetId::Elevation,
            DatasetId::Roads,
        ];
        for id in sequence {
            state.select_layer(id);
            assert!(state.active().len() <= 1);
        }
        state.layer_loaded(load(DatasetId::Elevation, SLOPE));
        assert!(state.active().len() <= 1);
    }

    #[test]
    fn reselecting_the_active_layer_keeps_it_shown() {
        let mut state = state_with(&[(DatasetId::Slope, SLOPE)]);
        state.select_layer(DatasetId::Slope);
        state.select_layer(DatasetId::Slope);
        assert!(state.active().contains(&DatasetId::Slope));
        assert!(state.info_visible());
    }

    #[test]
    fn unloaded_layer_becomes_pending_until_its_load_completes() {
        let mut state = state_with(&[(DatasetId::Roads, ROADS)]);
        state.select_layer(DatasetId::Roads);
        state.select_layer(DatasetId::Schools);

        assert!(state.active().is_empty());
        assert_eq!(state.pending(), Some(DatasetId::Schools));

        state.layer_loaded(load(DatasetId::Slope, SLOPE));
        assert!(state.active().is_empty());
        assert_eq!(state.pending(), Some(DatasetId::Schools));

        state.layer_loaded(load(DatasetId::Schools, SCHOOLS));
        assert_eq!(state.pending(), None);
        assert!(state.active().contains(&DatasetId::Schools));
        assert_eq!(state.legend().map(|l| l.dataset), Some(DatasetId::Schools));
    }

    #[test]
    fn last_toggle_wins_the_pending_slot() {
        let mut state = state_with(&[]);
        state.select_layer(DatasetId::Schools);
        state.select_layer(DatasetId::Hospitals);
        assert_eq!(state.pending(), Some(DatasetId::Hospitals));

        state.layer_loaded(load(DatasetId::Schools, SCHOOLS));
        assert!(state.active().is_empty());
    }

    #[test]
    fn selecting_a_loaded_layer_drops_an_older_pending_request() {
        let mut state = state_with(&[(DatasetId::Roads, ROADS)]);
        state.select_layer(DatasetId::Schools);
        state.select_layer(DatasetId::Roads);
        state.layer_loaded(load(DatasetId::Schools, SCHOOLS));

        assert_eq!(state.active().iter().copied().collect::<Vec<_>>(), vec![DatasetId::Roads]);
    }

    #[test]
    fn info_panel_tracks_info_bearing_layers() {
        let mut state = state_with(&[
            (DatasetId::Slope, SLOPE),
            (DatasetId::Roads, ROADS),
            (DatasetId::DevelopableLand, SLOPE),
        ]);
        state.select_layer(DatasetId::Slope);
        assert!(state.info_visible());
        state.select_layer(DatasetId::Roads);
        assert!(!state.info_visible());
        state.select_layer(DatasetId::DevelopableLand);
        assert!(state.info_visible());
        state.select_layer(DatasetId::Hospitals);
        assert!(!state.info_visible());
    }

    #[test]
    fn failed_layer_is_never_pending_and_raises_notice() {
        let mut state = state_with(&[(DatasetId::Roads, ROADS)]);
        state.select_layer(DatasetId::Roads);
        state.layer_failed(DatasetId::Hospitals, "404".to_string());
        state.select_layer(DatasetId::Hospitals);

        assert!(state.active().is_empty());
        assert_eq!(state.pending(), None);
        assert_eq!(state.notice(), Some("Hospitals failed to load"));
        assert!(matches!(
            state.load_status(DatasetId::Hospitals),
            Some(LoadStatus::Failed(_))
        ));
    }

    #[test]
    fn failure_of_the_pending_layer_clears_the_slot() {
        let mut state = state_with(&[]);
        state.select_layer(DatasetId::Training);
        state.layer_failed(DatasetId::Training, "timeout".to_string());
        assert_eq!(state.pending(), None);
        assert_eq!(state.notice(), Some("Training Centers failed to load"));
        state.dismiss_notice();
        assert_eq!(state.notice(), None);
    }

    #[test]
    fn hover_opens_popup_with_all_properties_and_leave_closes_it() {
        let mut state = state_with(&[(DatasetId::Roads, ROADS)]);
        state.select_layer(DatasetId::Roads);

        state.pointer_moved(LatLng::new(6.9, 79.9), 0.01);
        let popup = state.popup().cloned().unwrap_or_else(|| panic!("popup should open"));
        assert_eq!(popup.rows.len(), 2);
        assert_eq!(popup.anchor, LatLng::new(6.9, 79.9));

        state.pointer_moved(LatLng::new(6.9001, 79.9002), 0.01);
        assert_eq!(state.popup().map(|p| p.anchor), Some(LatLng::new(6.9, 79.9)));

        state.pointer_moved(LatLng::new(9.0, 82.0), 0.01);
        assert!(state.popup().is_none());

        state.pointer_moved(LatLng::new(6.9, 79.9), 0.01);
        state.pointer_left();
        assert!(state.popup().is_none());
    }

    #[test]
    fn hover_ignores_inactive_layers() {
        let mut state = state_with(&[(DatasetId::Roads, ROADS)]);
        state.pointer_moved(LatLng::new(6.9, 79.9), 0.01);
        assert!(state.popup().is_none());
    }

    #[test]
    fn clicking_a_feature_fits_the_view_to_it() {
        let mut state = state_with(&[(DatasetId::Slope, SLOPE)]);
        state.set_screen_px(800.0, 600.0);
        state.select_layer(DatasetId::Slope);
        state.map_clicked(LatLng::new(7.3, 80.3), 0.0);

        let view = state.view();
        assert!((view.center.lat - 7.3).abs() < 1e-9);
        assert!((view.center.lon - 80.3).abs() < 1e-9);
        assert!(view.zoom > 8.0);
    }

    #[test]
    fn empty_search_result_keeps_view_and_marker_and_raises_notice() {
        let mut state = state_with(&[]);
        state.search_resolved(Ok(vec![geocode("7.29", "80.63", "Kandy")]));
        let view_before = *state.view();
        let marker_before = state.search_marker().cloned();

        state.search_resolved(Ok(Vec::new()));

        assert_eq!(state.notice(), Some(NOT_FOUND_NOTICE));
        assert_eq!(*state.view(), view_before);
        assert_eq!(state.search_marker().cloned(), marker_before);
    }

    #[test]
    fn search_result_replaces_previous_marker_and_centers_view() {
        let mut state = state_with(&[]);
        state.search_resolved(Ok(vec![geocode("7.29", "80.63", "Kandy")]));
        state.search_resolved(Ok(vec![
            geocode("6.9271", "79.8612", "Colombo"),
            geocode("0", "0", "ignored"),
        ]));

        let marker = state.search_marker().cloned().unwrap_or_else(|| panic!("marker expected"));
        assert_eq!(marker.position, LatLng::new(6.9271, 79.8612));
        assert_eq!(marker.label, "Colombo");
        assert_eq!(state.view().center, LatLng::new(6.9271, 79.8612));
        assert!((state.view().zoom - SEARCH_ZOOM).abs() < f64::EPSILON);
    }

    #[test]
    fn failed_search_leaves_everything_unchanged() {
        let mut state = state_with(&[]);
        let view_before = *state.view();
        state.search_resolved(Err("connection refused".to_string()));
        state.search_resolved(Ok(vec![geocode("abc", "80", "Broken")]));

        assert_eq!(*state.view(), view_before);
        assert!(state.search_marker().is_none());
        assert!(state.notice().is_none());
    }

    #[test]
    fn two_clicks_draw_one_line_and_report_distance() {
        let mut state = state_with(&[]);
        state.activate_measure();
        assert_eq!(state.cursor(), Cursor::Crosshair);
        state.map_clicked(LatLng::new(7.80, 80.70), 0.0);
        state.map_clicked(LatLng::new(7.90, 80.80), 0.0);

        assert_eq!(state.measure_markers().len(), 2);
        assert!(state.measure_line().is_some());
        assert_eq!(state.distance_readout(), "Distance: 15.65 km");
        assert_eq!(state.cursor(), Cursor::Default);
    }

    #[test]
    fn third_click_after_reactivation_starts_a_new_session() {
        let mut state = state_with(&[]);
        state.search_resolved(Ok(vec![geocode("7.29", "80.63", "Kandy")]));
        state.activate_measure();
        state.map_clicked(LatLng::new(7.80, 80.70), 0.0);
        state.map_clicked(LatLng::new(7.90, 80.80), 0.0);

        state.activate_measure();
        state.map_clicked(LatLng::new(8.0, 81.0), 0.0);

        assert_eq!(state.measure_markers(), &[LatLng::new(8.0, 81.0)]);
        assert!(state.measure_line().is_none());
        assert_eq!(state.distance_readout(), DISTANCE_PLACEHOLDER);
        assert!(state.search_marker().is_some());
    }

    #[test]
    fn reset_distance_never_removes_the_search_marker() {
        let mut state = state_with(&[]);
        state.search_resolved(Ok(vec![geocode("7.29", "80.63", "Kandy")]));
        state.activate_measure();
        state.map_clicked(LatLng::new(7.80, 80.70), 0.0);
        state.map_clicked(LatLng::new(7.90, 80.80), 0.0);

        state.reset_distance();

        assert!(state.measure_markers().is_empty());
        assert!(state.measure_line().is_none());
        assert_eq!(state.distance_readout(), DISTANCE_PLACEHOLDER);
        assert_eq!(state.cursor(), Cursor::Default);
        assert_eq!(state.search_marker().map(|m| m.label.as_str()), Some("Kandy"));
    }

    #[test]
    fn clicks_while_measuring_do_not_reframe_the_view() {
        let mut state = state_with(&[(DatasetId::Slope, SLOPE)]);
        state.select_layer(DatasetId::Slope);
        state.activate_measure();
        let before = *state.view();
        state.map_clicked(LatLng::new(7.3, 80.3), 0.0);
        assert_eq!(*state.view(), before);
        assert_eq!(state.measure_markers().len(), 1);
    }
}
