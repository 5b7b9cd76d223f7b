//! Report command - summarize a results file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use geosector::export::write_geojson;
use geosector::store::{GridId, StoreSnapshot};

use crate::error::CliError;

/// Per-grid counts from a snapshot.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GridSummary {
    pub squares: usize,
    pub matching: usize,
}

/// Run the report command.
pub fn run(file: &Path, geojson_output: Option<PathBuf>) -> Result<(), CliError> {
    let snapshot = StoreSnapshot::read_from(file).map_err(|error| CliError::Results {
        path: file.to_path_buf(),
        error,
    })?;

    println!("Results: {}", file.display());
    println!();
    println!("  features:      {}", snapshot.features.len());
    println!("  grids:         {}", snapshot.grids.len());
    println!("  squares:       {}", snapshot.squares.len());
    println!("  vertices:      {}", snapshot.vertices.len());
    println!("  sectors:       {}", snapshot.sectors.len());
    println!("  intersections: {}", snapshot.intersections.len());

    let summaries = summarize_grids(&snapshot);
    if !summaries.is_empty() {
        println!();
        for grid in &snapshot.grids {
            let summary = summaries.get(&grid.id).copied().unwrap_or_default();
            println!(
                "  {} ({} km): {} squares, {} matching",
                grid.id, grid.size_km, summary.squares, summary.matching
            );
        }
    }

    if let Some(path) = geojson_output {
        write_geojson(&snapshot, &path).map_err(|error| CliError::Export {
            path: path.clone(),
            error,
        })?;
        println!();
        println!("GeoJSON written to {}", path.display());
    }

    Ok(())
}

/// Square counts keyed by owning grid.
pub fn summarize_grids(snapshot: &StoreSnapshot) -> BTreeMap<GridId, GridSummary> {
    let mut summaries: BTreeMap<GridId, GridSummary> = BTreeMap::new();
    for square in &snapshot.squares {
        let entry = summaries.entry(square.grid_id).or_default();
        entry.squares += 1;
        if square.is_matching {
            entry.matching += 1;
        }
    }
    summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use geosector::store::{MemoryStore, Store};

    #[test]
    fn test_summarize_grids() {
        let store = MemoryStore::new();
        let first = store.create_grid(10.0).unwrap();
        let second = store.create_grid(20.0).unwrap();
        store.create_square(first, true).unwrap();
        store.create_square(first, false).unwrap();
        store.create_square(second, true).unwrap();

        let summaries = summarize_grids(&store.snapshot().unwrap());

        assert_eq!(
            summaries[&first],
            GridSummary {
                squares: 2,
                matching: 1
            }
        );
        assert_eq!(summaries[&second].matching, 1);
    }

    #[test]
    fn test_missing_file_is_results_error() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let result = run(&temp_dir.path().join("missing.json"), None);
        assert!(matches!(result, Err(CliError::Results { .. })));
    }
}
