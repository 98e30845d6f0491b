use crate::domain::DatasetId;
use crate::layer::LoadedLayer;
use crate::search::{normalize_query, GeocodeResult};
use crate::state::MapState;
use crate::view::LatLng;
use std::fmt;

/// Inputs to the viewer: user actions and completions of background work.
#[derive(Debug)]
pub enum MapEvent {
    SelectLayer(DatasetId),
    LayerLoaded(Box<LoadedLayer>),
    LayerFailed { dataset: DatasetId, reason: String },
    SubmitSearch(String),
    SearchResolved(Result<Vec<GeocodeResult>, String>),
    ActivateMeasure,
    ResetDistance,
    MapClicked { at: LatLng, tolerance: f64 },
    PointerMoved { at: LatLng, tolerance: f64 },
    PointerLeft,
    DismissNotice,
}

impl fmt::Display for MapEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelectLayer(id) => write!(f, "SelectLayer({id})"),
            Self::LayerLoaded(layer) => write!(f, "LayerLoaded({})", layer.id),
            Self::LayerFailed { dataset, .. } => write!(f, "LayerFailed({dataset})"),
            Self::SubmitSearch(query) => write!(f, "SubmitSearch({query})"),
            Self::SearchResolved(Ok(results)) => write!(f, "SearchResolved({} results)", results.len()),
            Self::SearchResolved(Err(_)) => write!(f, "SearchResolved(error)"),
            Self::ActivateMeasure => write!(f, "ActivateMeasure"),
            Self::ResetDistance => write!(f, "ResetDistance"),
            Self::MapClicked { at, .. } => write!(f, "MapClicked({:.5}, {:.5})", at.lat, at.lon),
            Self::PointerMoved { .. } => write!(f, "PointerMoved"),
            Self::PointerLeft => write!(f, "PointerLeft"),
            Self::DismissNotice => write!(f, "DismissNotice"),
        }
    }
}

/// Work the shell must start on the viewer's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Geocode this (trimmed, non-empty) query and report back with
    /// [`MapEvent::SearchResolved`].
    Geocode(String),
}

impl MapState {
    pub fn handle(&mut self, event: MapEvent) -> Option<Effect> {
        if !matches!(event, MapEvent::PointerMoved { .. }) {
            tracing::debug!(%event, "Handling map event");
        }

        match event {
            MapEvent::SelectLayer(id) => self.select_layer(id),
            MapEvent::LayerLoaded(layer) => self.layer_loaded(*layer),
            MapEvent::LayerFailed { dataset, reason } => self.layer_failed(dataset, reason),
            MapEvent::SubmitSearch(query) => return normalize_query(&query).map(Effect::Geocode),
            MapEvent::SearchResolved(results) => self.search_resolved(results),
            MapEvent::ActivateMeasure => self.activate_measure(),
            MapEvent::ResetDistance => self.reset_distance(),
            MapEvent::MapClicked { at, tolerance } => self.map_clicked(at, tolerance),
            MapEvent::PointerMoved { at, tolerance } => self.pointer_moved(at, tolerance),
            MapEvent::PointerLeft => self.pointer_left(),
            MapEvent::DismissNotice => self.dismiss_notice(),
        }
        None
    }
}
