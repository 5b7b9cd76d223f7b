//! Inspect command - describe a boundary file without analyzing it.

use std::path::Path;

use geosector::config::ConfigFile;
use geosector::feature::{load_features, region_from_features};

use crate::error::CliError;

/// Run the inspect command.
///
/// Prints each feature's name, the combined bounds, the four extreme points
/// and the reference point a run with the loaded configuration would use.
pub fn run(file: &Path, config_path: &Path) -> Result<(), CliError> {
    let config = ConfigFile::load_from(config_path)?;
    let features = load_features(file)?;
    let region = region_from_features(&features)?;

    println!("Boundary: {}", file.display());
    println!();
    println!("Features ({}):", features.len());
    for (index, feature) in features.iter().enumerate() {
        println!(
            "  {:>3}. {}",
            index + 1,
            feature.name.as_deref().unwrap_or("(unnamed)")
        );
    }
    println!();

    let (min_x, min_y, max_x, max_y) = region.bounds().as_tuple();
    println!("Bounds:");
    println!("  longitude {} .. {}", min_x, max_x);
    println!("  latitude  {} .. {}", min_y, max_y);
    println!();

    println!("Extreme points:");
    for extreme in region.extreme_points()? {
        println!(
            "  {:<5} lat={}, lon={}",
            extreme.direction.as_str(),
            extreme.lat(),
            extreme.lon()
        );
    }
    println!();

    match region.centroid() {
        Some(centroid) => println!("Centroid: lat={}, lon={}", centroid.y(), centroid.x()),
        None => println!("Centroid: (none)"),
    }
    if config.geodesy.center_from_region {
        println!("Reference center: region centroid");
    } else {
        println!(
            "Reference center: lat={}, lon={} (configured)",
            config.geodesy.center_lat, config.geodesy.center_lon
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_inspect_valid_boundary() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("box.geojson");
        std::fs::write(
            &file,
            r#"{ "type": "Polygon", "coordinates": [[[0,0],[2,0],[2,1],[0,1],[0,0]]] }"#,
        )
        .unwrap();

        run(&file, &temp_dir.path().join("config.ini")).unwrap();
    }

    #[test]
    fn test_inspect_point_is_region_error() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("point.geojson");
        std::fs::write(&file, r#"{ "type": "Point", "coordinates": [1, 2] }"#).unwrap();

        let result = run(&file, &temp_dir.path().join("config.ini"));
        assert!(matches!(result, Err(CliError::Region(_))));
    }
}
