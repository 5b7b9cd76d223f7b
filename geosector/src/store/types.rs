//! Record and identifier types for the persistence gateway.

use std::fmt;

use geo::{MultiPolygon, Point, Polygon};
use serde::{Deserialize, Serialize};
use thiserror::Error;

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            pub fn get(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", $label, self.0)
            }
        }
    };
}

record_id!(
    /// Identifier of a stored boundary feature.
    FeatureId,
    "feature"
);
record_id!(
    /// Identifier of a stored grid.
    GridId,
    "grid"
);
record_id!(
    /// Identifier of a stored square.
    SquareId,
    "square"
);
record_id!(
    /// Identifier of a stored vertex.
    VertexId,
    "vertex"
);
record_id!(
    /// Identifier of a stored sector.
    SectorId,
    "sector"
);

/// Kinds of stored entity, used in errors and log messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Feature,
    Grid,
    Square,
    Vertex,
    Sector,
    Intersection,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Feature => "feature",
            EntityKind::Grid => "grid",
            EntityKind::Square => "square",
            EntityKind::Vertex => "vertex",
            EntityKind::Sector => "sector",
            EntityKind::Intersection => "sector-vertex intersection",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by [`Store`](super::Store) operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A referenced parent record does not exist.
    #[error("Cannot create {kind}: parent {parent} does not exist")]
    MissingParent { kind: EntityKind, parent: String },

    /// Records of this kind still have children referencing them.
    #[error("Cannot delete {kind} records: {dependents} dependent record(s) still reference them")]
    HasDependents { kind: EntityKind, dependents: usize },

    /// Input rejected by the backend (e.g., a non-finite grid size).
    #[error("Invalid {kind} record: {reason}")]
    InvalidRecord { kind: EntityKind, reason: String },

    /// Backend-specific failure.
    #[error("Storage backend error: {0}")]
    Backend(String),

    /// Snapshot file I/O failure.
    #[error("Snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot (de)serialization failure.
    #[error("Snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A named input boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub id: FeatureId,
    pub name: Option<String>,
    pub geometry: MultiPolygon<f64>,
}

/// One tiling pass over a region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridRecord {
    pub id: GridId,
    pub size_km: f64,
}

/// One grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquareRecord {
    pub id: SquareId,
    pub grid_id: GridId,
    pub is_matching: bool,
}

/// One square corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VertexRecord {
    pub id: VertexId,
    pub square_id: SquareId,
    pub point: Point<f64>,
}

/// Fields of a sector before an identifier is assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSector {
    pub vertex_id: VertexId,
    pub azimuth_deg: f64,
    pub radius_km: f64,
    pub angle_deg: u32,
    pub polygon: Polygon<f64>,
}

/// A coverage fan anchored at a vertex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorRecord {
    pub id: SectorId,
    pub vertex_id: VertexId,
    pub azimuth_deg: f64,
    pub radius_km: f64,
    pub angle_deg: u32,
    pub polygon: Polygon<f64>,
}

impl SectorRecord {
    pub(crate) fn from_new(id: SectorId, sector: NewSector) -> Self {
        Self {
            id,
            vertex_id: sector.vertex_id,
            azimuth_deg: sector.azimuth_deg,
            radius_km: sector.radius_km,
            angle_deg: sector.angle_deg,
            polygon: sector.polygon,
        }
    }
}

/// Recorded fact that a vertex lies inside a sector.
///
/// The pair is the composite key; storing it twice has no effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IntersectionRecord {
    pub sector_id: SectorId,
    pub vertex_id: VertexId,
}

impl IntersectionRecord {
    pub fn new(sector_id: SectorId, vertex_id: VertexId) -> Self {
        Self {
            sector_id,
            vertex_id,
        }
    }
}

impl fmt::Display for IntersectionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ∋ {}", self.sector_id, self.vertex_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display_includes_kind() {
        assert_eq!(GridId(3).to_string(), "grid#3");
        assert_eq!(VertexId(12).to_string(), "vertex#12");
    }

    #[test]
    fn test_id_serializes_as_bare_number() {
        let json = serde_json::to_string(&SectorId(9)).unwrap();
        assert_eq!(json, "9");
    }

    #[test]
    fn test_intersection_ordering_is_sector_then_vertex() {
        let a = IntersectionRecord::new(SectorId(1), VertexId(9));
        let b = IntersectionRecord::new(SectorId(2), VertexId(1));
        assert!(a < b);
    }

    #[test]
    fn test_store_error_messages() {
        let err = StoreError::MissingParent {
            kind: EntityKind::Vertex,
            parent: SquareId(4).to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Cannot create vertex: parent square#4 does not exist"
        );

        let err = StoreError::HasDependents {
            kind: EntityKind::Grid,
            dependents: 2,
        };
        assert!(err.to_string().contains("2 dependent"));
    }
}
