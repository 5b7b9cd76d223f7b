//! End-to-end pipeline: features, grid, sectors, coverage.

use std::sync::Arc;

use geo::Point;
use serde::Serialize;

use super::config::{AnalysisConfig, ReferenceCenter};
use super::error::AnalysisError;
use super::policy::{PersistenceTally, Stage, StageOutput};
use crate::coverage::{CoverageAnalyzer, CoverageSummary};
use crate::feature::RegionFeature;
use crate::grid::{Grid, GridGenerator, GridSpec};
use crate::log::Logger;
use crate::region::{Region, RegionError};
use crate::sector::SectorGenerator;
use crate::store::{EntityKind, FeatureId, SectorRecord, Store};
use crate::{log_debug, log_info, log_warn};

/// Counts describing a finished run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisStats {
    pub features: usize,
    pub squares: usize,
    pub matching_squares: usize,
    pub vertices: usize,
    pub sectors: usize,
    pub intersections: usize,
    pub new_intersections: usize,
    pub center_lat: f64,
    pub failures: PersistenceTally,
}

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub grid: Grid,
    pub sectors: Vec<SectorRecord>,
    pub coverage: CoverageSummary,
    pub stats: AnalysisStats,
}

impl AnalysisReport {
    /// True when at least one record was lost to a store failure.
    pub fn is_partial(&self) -> bool {
        !self.stats.failures.is_clean()
    }
}

/// Runs the analysis stages over one region against an injected store.
///
/// The store and logger are borrowed for the lifetime of the analyzer only;
/// dropping it releases both.
pub struct Analyzer {
    region: Region,
    features: Vec<RegionFeature>,
    store: Arc<dyn Store>,
    logger: Arc<dyn Logger>,
    config: AnalysisConfig,
}

impl Analyzer {
    pub fn new(
        region: Region,
        store: Arc<dyn Store>,
        logger: Arc<dyn Logger>,
        config: AnalysisConfig,
    ) -> Self {
        Self {
            region,
            features: Vec::new(),
            store,
            logger,
            config,
        }
    }

    /// Input features to store alongside the results.
    pub fn with_features(mut self, features: Vec<RegionFeature>) -> Self {
        self.features = features;
        self
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Reference point for the grid correction.
    pub fn center(&self) -> Result<Point<f64>, AnalysisError> {
        match self.config.center {
            ReferenceCenter::Fixed(point) => Ok(point),
            ReferenceCenter::RegionCentroid => self.region.centroid().ok_or_else(|| {
                RegionError::InvalidGeometry("region has no centroid".to_string()).into()
            }),
        }
    }

    pub fn center_lat(&self) -> Result<f64, AnalysisError> {
        Ok(self.center()?.y())
    }

    /// Store every input feature that has an areal geometry.
    pub fn persist_features(&self) -> Result<StageOutput<Vec<FeatureId>>, AnalysisError> {
        let mut tally = PersistenceTally::default();
        let mut ids = Vec::with_capacity(self.features.len());

        for feature in &self.features {
            let Some(geometry) = feature.multi_polygon() else {
                log_warn!(
                    self.logger,
                    "Skipping feature {} without polygon geometry",
                    feature.name.as_deref().unwrap_or("(unnamed)")
                );
                tally.skipped += 1;
                continue;
            };
            let created = self.config.policy.apply(
                self.store.create_feature(feature.name.as_deref(), &geometry),
                Stage::Features,
                EntityKind::Feature,
                self.logger.as_ref(),
                &mut tally,
            )?;
            if let Some(id) = created {
                log_debug!(
                    self.logger,
                    "Created {} ({})",
                    id,
                    feature.name.as_deref().unwrap_or("unnamed")
                );
                ids.push(id);
            }
        }

        Ok(StageOutput { value: ids, tally })
    }

    pub fn generate_grid(&self) -> Result<StageOutput<Grid>, AnalysisError> {
        let spec = GridSpec::new(self.config.grid_size_km, self.center_lat()?);
        GridGenerator::new(self.store.clone(), self.logger.clone())
            .with_policy(self.config.policy)
            .generate(&self.region, &spec)
    }

    /// Sectors at every vertex of the squares in scope.
    pub fn generate_sectors(
        &self,
        grid: &Grid,
    ) -> Result<StageOutput<Vec<SectorRecord>>, AnalysisError> {
        let squares = grid.squares_in_scope(self.config.include_non_matching);
        SectorGenerator::new(self.store.clone(), self.logger.clone())
            .with_policy(self.config.policy)
            .generate_for_squares(&squares, &self.config.sector)
    }

    /// Vertex-in-sector tests over the squares in scope.
    pub fn analyze_coverage(
        &self,
        grid: &Grid,
        sectors: &[SectorRecord],
    ) -> Result<StageOutput<CoverageSummary>, AnalysisError> {
        let squares = grid.squares_in_scope(self.config.include_non_matching);
        CoverageAnalyzer::new(self.store.clone(), self.logger.clone())
            .with_policy(self.config.policy)
            .analyze(sectors, &squares)
    }

    /// Run every stage in order. Each stage finishes before the next begins.
    pub fn run(&self) -> Result<AnalysisReport, AnalysisError> {
        let center_lat = self.center_lat()?;
        log_info!(
            self.logger,
            "Analyzing region {:?} at {} km, reference latitude {}",
            self.region.bounds().as_tuple(),
            self.config.grid_size_km,
            center_lat
        );

        let mut failures = PersistenceTally::default();

        let features = self.persist_features()?;
        failures.merge(features.tally);

        let grid = self.generate_grid()?;
        failures.merge(grid.tally);
        let grid = grid.value;

        let sectors = self.generate_sectors(&grid)?;
        failures.merge(sectors.tally);
        let sectors = sectors.value;

        let coverage = self.analyze_coverage(&grid, &sectors)?;
        failures.merge(coverage.tally);
        let coverage = coverage.value;

        let stats = AnalysisStats {
            features: features.value.len(),
            squares: grid.squares.len(),
            matching_squares: grid.matches().count(),
            vertices: grid.vertex_count(),
            sectors: sectors.len(),
            intersections: coverage.intersections.len(),
            new_intersections: coverage.created,
            center_lat,
            failures,
        };

        if failures.is_clean() {
            log_info!(self.logger, "Analysis complete: {:?}", stats);
        } else {
            log_warn!(
                self.logger,
                "Analysis complete with gaps: {} store failures, {} records skipped",
                failures.failed,
                failures.skipped
            );
        }

        Ok(AnalysisReport {
            grid,
            sectors,
            coverage,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::{LogLevel, MemoryLogger, NoOpLogger};
    use crate::store::MemoryStore;
    use geo::{polygon, Geometry};

    fn square_region() -> Region {
        Region::load(vec![Geometry::Polygon(polygon![
            (x: 0.0, y: 0.0),
            (x: 0.0, y: 10.0),
            (x: 10.0, y: 10.0),
            (x: 10.0, y: 0.0),
            (x: 0.0, y: 0.0),
        ])])
        .unwrap()
    }

    #[test]
    fn test_fixed_center() {
        let analyzer = Analyzer::new(
            square_region(),
            Arc::new(MemoryStore::new()),
            Arc::new(NoOpLogger),
            AnalysisConfig::default().with_center(ReferenceCenter::Fixed(Point::new(1.0, 2.0))),
        );
        assert_eq!(analyzer.center_lat().unwrap(), 2.0);
    }

    #[test]
    fn test_centroid_center() {
        let analyzer = Analyzer::new(
            square_region(),
            Arc::new(MemoryStore::new()),
            Arc::new(NoOpLogger),
            AnalysisConfig::default().with_center(ReferenceCenter::RegionCentroid),
        );
        let center = analyzer.center().unwrap();
        assert!((center.x() - 5.0).abs() < 1e-9);
        assert!((center.y() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_run_single_square() {
        let store = Arc::new(MemoryStore::new());
        let logger = Arc::new(MemoryLogger::new());
        let config = AnalysisConfig::default()
            .with_grid_size(1110.0)
            .with_center(ReferenceCenter::Fixed(Point::new(0.0, 0.0)));
        let analyzer = Analyzer::new(square_region(), store.clone(), logger.clone(), config);

        let report = analyzer.run().unwrap();

        assert_eq!(report.stats.squares, 1);
        assert_eq!(report.stats.matching_squares, 1);
        assert_eq!(report.stats.vertices, 4);
        assert_eq!(report.stats.sectors, 12);
        assert!(!report.is_partial());
        assert_eq!(store.list_sectors().unwrap().len(), 12);
        assert!(logger.contains(LogLevel::Info, "Analysis complete"));
    }

    #[test]
    fn test_features_are_stored() {
        let store = Arc::new(MemoryStore::new());
        let features = vec![
            RegionFeature {
                name: Some("Square".to_string()),
                geometry: Geometry::Polygon(square_region().area().0[0].clone()),
            },
            RegionFeature {
                name: None,
                geometry: Geometry::Point(Point::new(0.0, 0.0)),
            },
        ];
        let analyzer = Analyzer::new(
            square_region(),
            store.clone(),
            Arc::new(NoOpLogger),
            AnalysisConfig::default(),
        )
        .with_features(features);

        let output = analyzer.persist_features().unwrap();

        assert_eq!(output.value.len(), 1);
        assert_eq!(output.tally.skipped, 1);
        assert_eq!(
            store.list_features().unwrap()[0].name.as_deref(),
            Some("Square")
        );
    }
}
