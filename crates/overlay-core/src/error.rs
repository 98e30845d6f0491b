use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid GeoJSON document: {0}")]
    Parse(String),

    #[error("Expected a FeatureCollection, found {0}")]
    NotACollection(&'static str),

    #[error("Invalid coordinate {value:?}: {reason}")]
    Coordinate { value: String, reason: String },

    #[error("Unknown dataset: {0}")]
    UnknownDataset(String),
}

impl From<geojson::Error> for Error {
    fn from(err: geojson::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
