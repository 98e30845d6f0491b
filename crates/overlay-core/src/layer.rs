use crate::category::{display_json, CategorySet, CategoryValue};
use crate::color::category_color;
use crate::domain::{DatasetDescriptor, DatasetId, ShapeKind};
use crate::error::{Error, Result};
use crate::style::{CircleMarkerStyle, FeatureStyle, Rendering};
use crate::view::LatLng;
use geo::{BoundingRect, Closest, ClosestPoint, Contains, Geometry, Rect};
use geojson::{FeatureCollection, GeoJson};

/// One drawable feature with its resolved style.
#[derive(Debug, Clone)]
pub struct OverlayFeature {
    pub geometry: Geometry<f64>,
    pub category: CategoryValue,
    pub rendering: Rendering,
    /// Property key/value pairs in document order.
    pub properties: Vec<(String, String)>,
    pub bounds: Option<Rect<f64>>,
}

impl OverlayFeature {
    pub fn is_marker(&self) -> bool {
        matches!(
            self.rendering,
            Rendering::CircleMarker(_) | Rendering::DefaultMarker
        )
    }

    /// Whether `position` falls on this feature, within `tolerance` degrees.
    pub fn hit(&self, position: LatLng, tolerance: f64) -> bool {
        let point = position.to_point();
        if matches!(
            self.geometry,
            Geometry::Polygon(_) | Geometry::MultiPolygon(_) | Geometry::Rect(_) | Geometry::Triangle(_)
        ) && self.geometry.contains(&point)
        {
            return true;
        }

        if let Some(bounds) = self.bounds {
            let outside = point.x() < bounds.min().x - tolerance
                || point.x() > bounds.max().x + tolerance
                || point.y() < bounds.min().y - tolerance
                || point.y() > bounds.max().y + tolerance;
            if outside {
                return false;
            }
        }

        match self.geometry.closest_point(&point) {
            Closest::Intersection(_) => true,
            Closest::SinglePoint(closest) => {
                (closest.x() - point.x()).hypot(closest.y() - point.y()) <= tolerance
            }
            Closest::Indeterminate => false,
        }
    }
}

/// A dataset's overlay, built once its document has loaded.
#[derive(Debug, Clone)]
pub struct LoadedLayer {
    pub id: DatasetId,
    pub shape: ShapeKind,
    pub categories: CategorySet,
    pub features: Vec<OverlayFeature>,
    pub bounds: Option<Rect<f64>>,
}

impl LoadedLayer {
    pub fn from_geojson_str(descriptor: &DatasetDescriptor, text: &str) -> Result<Self> {
        let collection = parse_feature_collection(text)?;
        Ok(Self::build(descriptor, collection))
    }

    pub fn build(descriptor: &DatasetDescriptor, collection: FeatureCollection) -> Self {
        let field = descriptor.category_field;
        let categories: CategorySet = collection
            .features
            .iter()
            .map(|feature| CategoryValue::from_properties(feature.properties.as_ref(), field))
            .collect();

        let mut features = Vec::with_capacity(collection.features.len());
        for feature in collection.features {
            let category = CategoryValue::from_properties(feature.properties.as_ref(), field);
            let Some(geometry) = feature.geometry else {
                continue;
            };
            let geometry: Geometry<f64> = match geometry.value.try_into() {
                Ok(geometry) => geometry,
                Err(err) => {
                    tracing::debug!(dataset = %descriptor.id, "Skipping feature: {err}");
                    continue;
                }
            };

            let color = category_color(&category, &categories);
            let rendering = match (&geometry, descriptor.shape) {
                (Geometry::Point(_) | Geometry::MultiPoint(_), ShapeKind::Point) => {
                    Rendering::CircleMarker(CircleMarkerStyle::new(color))
                }
                (Geometry::Point(_) | Geometry::MultiPoint(_), _) => Rendering::DefaultMarker,
                _ => Rendering::Path(FeatureStyle::new(color, descriptor.shape)),
            };

            let properties = feature
                .properties
                .iter()
                .flatten()
                .map(|(key, value)| (key.clone(), display_json(value)))
                .collect();

            features.push(OverlayFeature {
                bounds: geometry.bounding_rect(),
                geometry,
                category,
                rendering,
                properties,
            });
        }

        let bounds = features
            .iter()
            .filter_map(|feature| feature.bounds)
            .reduce(union);

        tracing::debug!(
            dataset = %descriptor.id,
            features = features.len(),
            categories = categories.len(),
            "Built overlay"
        );

        Self {
            id: descriptor.id,
            shape: descriptor.shape,
            categories,
            features,
            bounds,
        }
    }

    /// Topmost feature under `position`; later features draw above earlier ones.
    pub fn feature_at(&self, position: LatLng, tolerance: f64) -> Option<usize> {
        self.features
            .iter()
            .rposition(|feature| feature.hit(position, tolerance))
    }

    pub fn feature(&self, index: usize) -> Option<&OverlayFeature> {
        self.features.get(index)
    }
}

pub fn parse_feature_collection(text: &str) -> Result<FeatureCollection> {
    match text.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(collection) => Ok(collection),
        GeoJson::Feature(_) => Err(Error::NotACollection("Feature")),
        GeoJson::Geometry(_) => Err(Error::NotACollection("Geometry")),
    }
}

fn union(a: Rect<f64>, b: Rect<f64>) -> Rect<f64> {
    Rect::new(
        (a.min().x.min(b.min().x), a.min().y.min(b.min().y)),
        (a.max().x.max(b.max().x), a.max().y.max(b.max().y)),
    )
}
