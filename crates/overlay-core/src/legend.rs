use crate::category::CategoryValue;
use crate::color::{category_color, Hsl};
use crate::domain::{DatasetId, ShapeKind};
use crate::layer::LoadedLayer;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Swatch {
    Circle,
    Bar,
    Block,
}

impl Swatch {
    pub const fn for_shape(shape: ShapeKind) -> Self {
        match shape {
            ShapeKind::Point => Self::Circle,
            ShapeKind::Line => Self::Bar,
            ShapeKind::Area => Self::Block,
        }
    }

    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Circle => "●",
            Self::Bar => "━━",
            Self::Block => "██",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendRow {
    pub swatch: Swatch,
    pub color: Hsl,
    pub category: CategoryValue,
}

impl LegendRow {
    pub fn label(&self) -> &str {
        self.category.label()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    pub dataset: DatasetId,
    pub rows: Vec<LegendRow>,
}

impl Legend {
    /// One row per category in sorted order, colored exactly like the features.
    pub fn for_layer(layer: &LoadedLayer) -> Self {
        let swatch = Swatch::for_shape(layer.shape);
        let rows = layer
            .categories
            .iter()
            .map(|category| LegendRow {
                swatch,
                color: category_color(category, &layer.categories),
                category: category.clone(),
            })
            .collect();

        Self {
            dataset: layer.id,
            rows,
        }
    }

    /// Heading shown above the rows, the dataset key in upper case.
    pub fn title(&self) -> String {
        self.dataset.as_str().to_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::tests::{load, ROADS, SCHOOLS, SLOPE};

    #[test]
    fn rows_follow_category_order() {
        let legend = Legend::for_layer(&load(DatasetId::Schools, SCHOOLS));
        let labels: Vec<_> = legend.rows.iter().map(LegendRow::label).collect();
        assert_eq!(labels, vec!["1AB", "1C", "Type 3", "undefined"]);
        assert_eq!(legend.title(), "SCHOOLS");
    }

    #[test]
    fn swatch_shape_follows_dataset_shape() {
        let schools = Legend::for_layer(&load(DatasetId::Schools, SCHOOLS));
        let roads = Legend::for_layer(&load(DatasetId::Roads, ROADS));
        let slope = Legend::for_layer(&load(DatasetId::Slope, SLOPE));

        assert!(schools.rows.iter().all(|row| row.swatch == Swatch::Circle));
        assert!(roads.rows.iter().all(|row| row.swatch == Swatch::Bar));
        assert!(slope.rows.iter().all(|row| row.swatch == Swatch::Block));
        assert_eq!(
            Legend::for_layer(&load(DatasetId::DevelopableLand, SLOPE)).title(),
            "DEVELOPABLELAND"
        );
    }

    #[test]
    fn legend_colors_match_feature_colors() {
        for (id, text) in [
            (DatasetId::Schools, SCHOOLS),
            (DatasetId::Roads, ROADS),
            (DatasetId::Slope, SLOPE),
        ] {
            let layer = load(id, text);
            let legend = Legend::for_layer(&layer);
            for feature in &layer.features {
                let Some(fill) = feature.rendering.fill_color() else {
                    continue;
                };
                let row = legend
                    .rows
                    .iter()
                    .find(|row| row.category == feature.category)
                    .unwrap_or_else(|| panic!("{id}: no legend row for {}", feature.category));
                assert_eq!(row.color, fill, "{id}: {}", feature.category);
            }
        }
    }
}
