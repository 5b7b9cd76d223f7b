//! Boundary features from GeoJSON input.
//!
//! Reading the boundary file is input glue around the core: each GeoJSON
//! feature becomes a [`RegionFeature`] holding its geometry and an optional
//! display name picked from its properties.

use std::fs;
use std::path::{Path, PathBuf};

use geo::{Geometry, MultiPolygon};
use geojson::GeoJson;
use serde_json::Value;

use crate::region::{Region, RegionError};

/// Error type for boundary feature loading.
#[derive(Debug, thiserror::Error)]
pub enum FeatureError {
    #[error("Failed to read boundary file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid GeoJSON: {0}")]
    GeoJson(#[from] geojson::Error),
    #[error("Feature {index} has no geometry")]
    MissingGeometry { index: usize },
}

/// One boundary shape with an optional human-readable name.
#[derive(Debug, Clone)]
pub struct RegionFeature {
    pub name: Option<String>,
    pub geometry: Geometry<f64>,
}

impl RegionFeature {
    /// The geometry as a multi-polygon, if it is areal.
    pub fn multi_polygon(&self) -> Option<MultiPolygon<f64>> {
        match &self.geometry {
            Geometry::Polygon(polygon) => Some(MultiPolygon::new(vec![polygon.clone()])),
            Geometry::MultiPolygon(multi) => Some(multi.clone()),
            Geometry::Rect(rect) => Some(MultiPolygon::new(vec![rect.to_polygon()])),
            _ => None,
        }
    }
}

/// Picks the property key that names a feature.
///
/// Returns the first key, in the order given, whose lowercase form contains
/// `"name"` (so `NAME_EN`, `shapeName` and `name` all qualify).
pub fn pick_name_field<'a, I>(keys: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    keys.into_iter()
        .find(|key| key.to_lowercase().contains("name"))
}

/// Parses a GeoJSON document into boundary features.
///
/// Accepts a `FeatureCollection`, a single `Feature`, or a bare geometry.
/// Property order is the document order.
pub fn features_from_geojson(text: &str) -> Result<Vec<RegionFeature>, FeatureError> {
    let geojson: GeoJson = text.parse()?;

    let raw_features = match geojson {
        GeoJson::FeatureCollection(collection) => collection.features,
        GeoJson::Feature(feature) => vec![feature],
        GeoJson::Geometry(geometry) => {
            return Ok(vec![RegionFeature {
                name: None,
                geometry: Geometry::try_from(geometry)?,
            }]);
        }
    };

    raw_features
        .into_iter()
        .enumerate()
        .map(|(index, feature)| {
            let name = feature.properties.as_ref().and_then(|properties| {
                let key = pick_name_field(properties.keys().map(String::as_str))?;
                properties.get(key).and_then(property_to_name)
            });
            let geometry = feature
                .geometry
                .ok_or(FeatureError::MissingGeometry { index })?;
            Ok(RegionFeature {
                name,
                geometry: Geometry::try_from(geometry)?,
            })
        })
        .collect()
}

/// Reads and parses a GeoJSON boundary file.
pub fn load_features(path: &Path) -> Result<Vec<RegionFeature>, FeatureError> {
    let text = fs::read_to_string(path).map_err(|source| FeatureError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    features_from_geojson(&text)
}

/// Builds the analysis region from every feature's geometry.
pub fn region_from_features(features: &[RegionFeature]) -> Result<Region, RegionError> {
    Region::load(features.iter().map(|feature| feature.geometry.clone()))
}

fn property_to_name(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
