//! Styling, legends and interaction state for a thematic overlay map viewer.
//!
//! Everything here is runtime-agnostic: shells feed [`MapEvent`]s into a
//! [`MapState`] and carry out the returned [`Effect`]s.

pub mod category;
pub mod color;
pub mod distance;
pub mod domain;
pub mod error;
pub mod event;
pub mod layer;
pub mod legend;
pub mod search;
pub mod state;
pub mod style;
pub mod view;

pub use category::{CategorySet, CategoryValue};
pub use domain::{catalog, DatasetDescriptor, DatasetId, ShapeKind};
pub use error::{Error, Result};
pub use event::{Effect, MapEvent};
pub use layer::LoadedLayer;
pub use state::MapState;
pub use view::LatLng;
