//! GeoJSON export of stored analysis results.
//!
//! Produces one `FeatureCollection` with a feature per stored boundary,
//! square and sector, distinguished by the `kind` property, for viewing in
//! any map tool that reads GeoJSON.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use geojson::feature::Id;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde_json::json;
use thiserror::Error;

use crate::grid::{Square, Vertex};
use crate::store::{SectorId, SquareId, StoreSnapshot};

/// Errors writing an export file.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write GeoJSON export: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize GeoJSON export: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Build the feature collection for a snapshot.
///
/// Squares with fewer than three stored corners have no shape and are left
/// out. Each sector carries the number of vertices recorded inside it.
pub fn snapshot_to_geojson(snapshot: &StoreSnapshot) -> FeatureCollection {
    let mut features = Vec::new();

    for record in &snapshot.features {
        let mut properties = JsonObject::new();
        properties.insert("kind".to_string(), json!("boundary"));
        properties.insert("name".to_string(), json!(record.name));
        features.push(feature(
            record.id.to_string(),
            Value::from(&record.geometry),
            properties,
        ));
    }

    let mut corners: BTreeMap<SquareId, Vec<Vertex>> = BTreeMap::new();
    for vertex in &snapshot.vertices {
        corners.entry(vertex.square_id).or_default().push(Vertex {
            id: vertex.id,
            point: vertex.point,
        });
    }

    for record in &snapshot.squares {
        let square = Square {
            id: record.id,
            is_matching: record.is_matching,
            vertices: corners.remove(&record.id).unwrap_or_default(),
        };
        let Some(polygon) = square.polygon() else {
            continue;
        };
        let mut properties = JsonObject::new();
        properties.insert("kind".to_string(), json!("square"));
        properties.insert("grid_id".to_string(), json!(record.grid_id));
        properties.insert("is_matching".to_string(), json!(record.is_matching));
        properties.insert("size_km".to_string(), json!(square.size_km()));
        features.push(feature(record.id.to_string(), Value::from(&polygon), properties));
    }

    let mut covered: HashMap<SectorId, usize> = HashMap::new();
    for intersection in &snapshot.intersections {
        *covered.entry(intersection.sector_id).or_default() += 1;
    }

    for record in &snapshot.sectors {
        let mut properties = JsonObject::new();
        properties.insert("kind".to_string(), json!("sector"));
        properties.insert("vertex_id".to_string(), json!(record.vertex_id));
        properties.insert("azimuth_deg".to_string(), json!(record.azimuth_deg));
        properties.insert("radius_km".to_string(), json!(record.radius_km));
        properties.insert("angle_deg".to_string(), json!(record.angle_deg));
        properties.insert(
            "vertices_covered".to_string(),
            json!(covered.get(&record.id).copied().unwrap_or(0)),
        );
        features.push(feature(
            record.id.to_string(),
            Value::from(&record.polygon),
            properties,
        ));
    }

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Write the snapshot's feature collection as pretty-printed GeoJSON.
pub fn write_geojson(snapshot: &StoreSnapshot, path: &Path) -> Result<(), ExportError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let collection = snapshot_to_geojson(snapshot);
    fs::write(path, serde_json::to_string_pretty(&collection)?)?;
    Ok(())
}

fn feature(id: String, value: Value, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: Some(Id::String(id)),
        properties: Some(properties),
        foreign_members: None,
    }
}
