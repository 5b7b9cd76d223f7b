//! Analyze command - grid, sectors and coverage for one boundary file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use geo::Point;
use geosector::analysis::{
    AnalysisConfig, AnalysisReport, Analyzer, PersistencePolicy, ReferenceCenter,
};
use geosector::export::write_geojson;
use geosector::feature::{load_features, region_from_features};
use geosector::store::{MemoryStore, StoreSnapshot};
use tracing::info;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the analyze command.
#[derive(Debug, Default)]
pub struct AnalyzeArgs {
    pub file: PathBuf,
    pub grid_size: Option<f64>,
    pub radius: Option<f64>,
    pub angle: Option<u32>,
    pub azimuths: Vec<f64>,
    pub center_lat: Option<f64>,
    pub center_from_region: bool,
    pub strict: bool,
    pub include_non_matching: bool,
    pub output: Option<PathBuf>,
    pub resume: bool,
    pub geojson_output: Option<PathBuf>,
}

/// Run the analyze command.
pub fn run(args: AnalyzeArgs, config_path: &Path, debug: bool) -> Result<(), CliError> {
    let runner = CliRunner::new(config_path, debug)?;
    runner.log_startup("analyze");

    let config = resolve_config(&args, AnalysisConfig::from(runner.config()));

    let features = load_features(&args.file)?;
    let region = region_from_features(&features)?;
    info!(
        "Loaded {} feature(s) from {}",
        features.len(),
        args.file.display()
    );

    let store = Arc::new(open_store(&args)?);
    let analyzer = Analyzer::new(region, store.clone(), runner.logger(), config)
        .with_features(features);

    println!("GeoSector Analysis v{}", geosector::VERSION);
    println!("========================");
    println!();
    println!("Boundary:    {}", args.file.display());
    println!("Grid size:   {} km", analyzer.config().grid_size_km);
    println!("Sectors:     {:?}", analyzer.config().sector.azimuths);
    println!("Error mode:  {}", analyzer.config().policy);
    println!();

    let report = analyzer.run()?;
    print_report(&report);

    let snapshot = store.snapshot().map_err(|error| CliError::Results {
        path: PathBuf::from("<memory>"),
        error,
    })?;

    match &args.output {
        Some(path) => {
            snapshot.write_to(path).map_err(|error| CliError::Results {
                path: path.clone(),
                error,
            })?;
            println!("Results written to {}", path.display());
        }
        None => {
            println!("{}", serde_json::to_string_pretty(&report.stats)?);
        }
    }

    if let Some(path) = &args.geojson_output {
        write_geojson(&snapshot, path).map_err(|error| CliError::Export {
            path: path.clone(),
            error,
        })?;
        println!("GeoJSON written to {}", path.display());
    }

    println!("Log: {}", runner.log_path().display());
    Ok(())
}

/// Apply command-line overrides on top of the configured parameters.
pub fn resolve_config(args: &AnalyzeArgs, mut config: AnalysisConfig) -> AnalysisConfig {
    if let Some(size) = args.grid_size {
        config.grid_size_km = size;
    }
    if let Some(radius) = args.radius {
        config.sector.radius_km = radius;
    }
    if let Some(angle) = args.angle {
        config.sector.angle_deg = angle;
    }
    if !args.azimuths.is_empty() {
        config.sector.azimuths = args.azimuths.clone();
    }
    if args.center_from_region {
        config.center = ReferenceCenter::RegionCentroid;
    } else if let Some(lat) = args.center_lat {
        let lon = match config.center {
            ReferenceCenter::Fixed(point) => point.x(),
            ReferenceCenter::RegionCentroid => 0.0,
        };
        config.center = ReferenceCenter::Fixed(Point::new(lon, lat));
    }
    if args.strict {
        config.policy = PersistencePolicy::Strict;
    }
    if args.include_non_matching {
        config.include_non_matching = true;
    }
    config
}

/// A fresh store, or one seeded from the existing results file with `--resume`.
fn open_store(args: &AnalyzeArgs) -> Result<MemoryStore, CliError> {
    match (&args.output, args.resume) {
        (Some(path), true) if path.exists() => {
            let snapshot = StoreSnapshot::read_from(path).map_err(|error| CliError::Results {
                path: path.clone(),
                error,
            })?;
            info!(
                "Resuming from {} ({} records)",
                path.display(),
                snapshot.total_records()
            );
            Ok(MemoryStore::from_snapshot(snapshot))
        }
        (None, true) => Err(CliError::Config(
            "--resume needs --output to name the results file".to_string(),
        )),
        _ => Ok(MemoryStore::new()),
    }
}

fn print_report(report: &AnalysisReport) {
    let stats = &report.stats;
    println!("Reference latitude: {}", stats.center_lat);
    println!(
        "Squares:       {} ({} matching)",
        stats.squares, stats.matching_squares
    );
    println!("Vertices:      {}", stats.vertices);
    println!("Sectors:       {}", stats.sectors);
    println!(
        "Intersections: {} ({} new)",
        stats.intersections, stats.new_intersections
    );
    if report.is_partial() {
        println!(
            "Warning: {} store failure(s), {} record(s) skipped. See the log for details.",
            stats.failures.failed, stats.failures.skipped
        );
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_overrides_keeps_config() {
        let config = resolve_config(&AnalyzeArgs::default(), AnalysisConfig::default());
        assert_eq!(config, AnalysisConfig::default());
    }

    #[test]
    fn test_overrides_apply() {
        let args = AnalyzeArgs {
            grid_size: Some(25.0),
            radius: Some(3.0),
            angle: Some(90),
            azimuths: vec![45.0, 225.0],
            center_lat: Some(10.0),
            strict: true,
            include_non_matching: true,
            ..Default::default()
        };

        let config = resolve_config(&args, AnalysisConfig::default());

        assert_eq!(config.grid_size_km, 25.0);
        assert_eq!(config.sector.radius_km, 3.0);
        assert_eq!(config.sector.angle_deg, 90);
        assert_eq!(config.sector.azimuths, vec![45.0, 225.0]);
        assert_eq!(config.policy, PersistencePolicy::Strict);
        assert!(config.include_non_matching);
        match config.center {
            ReferenceCenter::Fixed(point) => {
                assert_eq!(point.y(), 10.0);
                assert_eq!(point.x(), geosector::config::DEFAULT_CENTER_LON);
            }
            other => panic!("unexpected center {:?}", other),
        }
    }

    #[test]
    fn test_region_center_wins_over_latitude() {
        let args = AnalyzeArgs {
            center_lat: Some(10.0),
            center_from_region: true,
            ..Default::default()
        };
        let config = resolve_config(&args, AnalysisConfig::default());
        assert_eq!(config.center, ReferenceCenter::RegionCentroid);
    }

    #[test]
    fn test_resume_without_output_is_rejected() {
        let args = AnalyzeArgs {
            resume: true,
            ..Default::default()
        };
        assert!(matches!(open_store(&args), Err(CliError::Config(_))));
    }

    #[test]
    fn test_resume_reads_existing_results() {
        use geosector::store::Store;

        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("results.json");
        let seeded = MemoryStore::new();
        seeded.create_grid(10.0).unwrap();
        seeded.snapshot().unwrap().write_to(&path).unwrap();

        let args = AnalyzeArgs {
            output: Some(path),
            resume: true,
            ..Default::default()
        };
        let store = open_store(&args).unwrap();
        assert_eq!(store.list_grids().unwrap().len(), 1);
    }
}
