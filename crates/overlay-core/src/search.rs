use crate::error::{Error, Result};
use crate::view::LatLng;
use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org/search";
pub const NOT_FOUND_NOTICE: &str = "Location not found.";

/// One geocoder hit. Coordinates arrive as numeric strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeocodeResult {
    #[serde(deserialize_with = "coordinate_text")]
    pub lat: String,
    #[serde(deserialize_with = "coordinate_text")]
    pub lon: String,
    #[serde(default)]
    pub display_name: String,
}

impl GeocodeResult {
    pub fn position(&self) -> Result<LatLng> {
        Ok(LatLng::new(parse_coordinate(&self.lat)?, parse_coordinate(&self.lon)?))
    }
}

fn parse_coordinate(value: &str) -> Result<f64> {
    let parsed = value
        .trim()
        .parse::<f64>()
        .map_err(|err| Error::Coordinate {
            value: value.to_string(),
            reason: err.to_string(),
        })?;
    if parsed.is_finite() {
        Ok(parsed)
    } else {
        Err(Error::Coordinate {
            value: value.to_string(),
            reason: "not a finite number".to_string(),
        })
    }
}

fn coordinate_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}

/// Trimmed query, or `None` when there is nothing to search for.
pub fn normalize_query(query: &str) -> Option<String> {
    let trimmed = query.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub fn parse_results(text: &str) -> Result<Vec<GeocodeResult>> {
    serde_json::from_str(text).map_err(|err| Error::Parse(err.to_string()))
}

/// The single marker placed by the most recent successful search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchMarker {
    pub position: LatLng,
    pub label: String,
}
