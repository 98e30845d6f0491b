use serde::{Deserialize, Serialize};

/// Default location of the published GeoJSON files.
pub const DEFAULT_DATA_BASE_URL: &str =
    "https://raw.githubusercontent.com/Kavish20021203/Ishara/main/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DatasetId {
    #[serde(rename = "slope")]
    Slope,
    #[serde(rename = "elevation")]
    Elevation,
    #[serde(rename = "roads")]
    Roads,
    #[serde(rename = "schools")]
    Schools,
    #[serde(rename = "training")]
    Training,
    #[serde(rename = "hospitals")]
    Hospitals,
    #[serde(rename = "developableLand")]
    DevelopableLand,
}

impl DatasetId {
    pub const ALL: [Self; 7] = [
        Self::Slope,
        Self::Elevation,
        Self::Roads,
        Self::Schools,
        Self::Training,
        Self::Hospitals,
        Self::DevelopableLand,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Slope => "slope",
            Self::Elevation => "elevation",
            Self::Roads => "roads",
            Self::Schools => "schools",
            Self::Training => "training",
            Self::Hospitals => "hospitals",
            Self::DevelopableLand => "developableLand",
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Slope),
            1 => Some(Self::Elevation),
            2 => Some(Self::Roads),
            3 => Some(Self::Schools),
            4 => Some(Self::Training),
            5 => Some(Self::Hospitals),
            6 => Some(Self::DevelopableLand),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::Slope => 0,
            Self::Elevation => 1,
            Self::Roads => 2,
            Self::Schools => 3,
            Self::Training => 4,
            Self::Hospitals => 5,
            Self::DevelopableLand => 6,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "slope" => Some(Self::Slope),
            "elevation" => Some(Self::Elevation),
            "roads" => Some(Self::Roads),
            "schools" => Some(Self::Schools),
            "training" => Some(Self::Training),
            "hospitals" => Some(Self::Hospitals),
            "developableland" | "developable-land" => Some(Self::DevelopableLand),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Slope => "Slope",
            Self::Elevation => "Elevation",
            Self::Roads => "Roads",
            Self::Schools => "Schools",
            Self::Training => "Training Centers",
            Self::Hospitals => "Hospitals",
            Self::DevelopableLand => "Developable Land",
        }
    }

    /// Property key used to bucket this dataset's features.
    pub const fn category_field(self) -> &'static str {
        match self {
            Self::Slope | Self::Elevation | Self::DevelopableLand => "DN",
            Self::Roads => "road_cla_1",
            Self::Schools => "school_lev",
            Self::Training => "name_of_th",
            Self::Hospitals => "hospital_c",
        }
    }

    pub const fn shape(self) -> ShapeKind {
        match self {
            Self::Roads => ShapeKind::Line,
            Self::Schools | Self::Training | Self::Hospitals => ShapeKind::Point,
            Self::Slope | Self::Elevation | Self::DevelopableLand => ShapeKind::Area,
        }
    }

    /// File name relative to the data base URL, already URL-encoded.
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Slope => "Slope.geojson",
            Self::Elevation => "Elevation.geojson",
            Self::Roads => "RoadLayer.geojson",
            Self::Schools => "Schools.geojson",
            Self::Training => "VocationalTrainingCenters.geojson",
            Self::Hospitals => "Hospitals.geojson",
            Self::DevelopableLand => "Developable%20Lands.geojson",
        }
    }

    /// Activating one of these datasets reveals the layer info panel.
    pub const fn is_info_bearing(self) -> bool {
        matches!(self, Self::Slope | Self::Elevation | Self::DevelopableLand)
    }

    pub fn descriptor(self, base_url: &str) -> DatasetDescriptor {
        DatasetDescriptor {
            id: self,
            category_field: self.category_field(),
            shape: self.shape(),
            url: format!("{}/{}", base_url.trim_end_matches('/'), self.file_name()),
        }
    }
}

impl std::str::FromStr for DatasetId {
    type Err = crate::error::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value).ok_or_else(|| crate::error::Error::UnknownDataset(value.to_string()))
    }
}

impl std::fmt::Display for DatasetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Point,
    Line,
    Area,
}

impl ShapeKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Point => "point",
            Self::Line => "line",
            Self::Area => "area",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetDescriptor {
    pub id: DatasetId,
    pub category_field: &'static str,
    pub shape: ShapeKind,
    pub url: String,
}

/// Descriptors for every dataset, in menu order.
pub fn catalog(base_url: &str) -> Vec<DatasetDescriptor> {
    DatasetId::ALL
        .iter()
        .map(|id| id.descriptor(base_url))
        .collect()
}
