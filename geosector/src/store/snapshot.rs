//! Serializable copy of a store's contents.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::types::{
    FeatureRecord, GridRecord, IntersectionRecord, SectorRecord, SquareRecord, StoreError,
    VertexRecord,
};

/// Every table of a store, each ordered by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub features: Vec<FeatureRecord>,
    #[serde(default)]
    pub grids: Vec<GridRecord>,
    #[serde(default)]
    pub squares: Vec<SquareRecord>,
    #[serde(default)]
    pub vertices: Vec<VertexRecord>,
    #[serde(default)]
    pub sectors: Vec<SectorRecord>,
    #[serde(default)]
    pub intersections: Vec<IntersectionRecord>,
}

impl StoreSnapshot {
    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a snapshot previously produced by [`to_json`](Self::to_json).
    pub fn from_json(text: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Write the snapshot as JSON, creating parent directories as needed.
    pub fn write_to(&self, path: &Path) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Read a JSON snapshot from disk.
    pub fn read_from(path: &Path) -> Result<Self, StoreError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Number of records across all tables.
    pub fn total_records(&self) -> usize {
        self.features.len()
            + self.grids.len()
            + self.squares.len()
            + self.vertices.len()
            + self.sectors.len()
            + self.intersections.len()
    }
}
