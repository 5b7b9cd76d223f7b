//! Vertex-in-sector tests and intersection persistence.

use std::sync::Arc;

use geo::Within;
use rayon::prelude::*;

use super::index::VertexIndex;
use crate::analysis::{AnalysisError, PersistencePolicy, PersistenceTally, Stage, StageOutput};
use crate::grid::{Square, Vertex};
use crate::log::Logger;
use crate::store::{EntityKind, IntersectionRecord, SectorRecord, Store};
use crate::{log_debug, log_info};

/// Outcome of one coverage pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoverageSummary {
    /// Every (sector, vertex) pair that tested true, in sector order.
    pub intersections: Vec<IntersectionRecord>,
    /// Pairs newly written to the store.
    pub created: usize,
    /// Pairs the store already held.
    pub existing: usize,
}

/// Finds the vertices lying inside each sector and records the pairs.
pub struct CoverageAnalyzer {
    store: Arc<dyn Store>,
    logger: Arc<dyn Logger>,
    policy: PersistencePolicy,
}

impl CoverageAnalyzer {
    pub fn new(store: Arc<dyn Store>, logger: Arc<dyn Logger>) -> Self {
        Self {
            store,
            logger,
            policy: PersistencePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: PersistencePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// All `(sector, vertex)` pairs where the vertex lies within the sector.
    ///
    /// Candidates come from an R-tree bounding-box query; each candidate is
    /// then tested with `Within`, which excludes points on the polygon
    /// boundary (a sector's own anchor is never inside it). Results follow
    /// sector order, then vertex order within the given squares. A vertex
    /// listed twice is reported once.
    pub fn intersections(sectors: &[SectorRecord], squares: &[&Square]) -> Vec<IntersectionRecord> {
        let mut vertices: Vec<Vertex> = squares
            .iter()
            .flat_map(|square| square.vertices.iter().copied())
            .collect();
        let mut seen = std::collections::HashSet::new();
        vertices.retain(|v| seen.insert(v.id));

        let index = VertexIndex::new(&vertices);

        sectors
            .par_iter()
            .flat_map_iter(|sector| {
                index
                    .candidates(&sector.polygon)
                    .into_iter()
                    .filter(|&i| vertices[i].point.is_within(&sector.polygon))
                    .map(|i| IntersectionRecord::new(sector.id, vertices[i].id))
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Store the given pairs. Pairs already present are counted, not duplicated.
    pub fn record(
        &self,
        intersections: Vec<IntersectionRecord>,
    ) -> Result<StageOutput<CoverageSummary>, AnalysisError> {
        let mut tally = PersistenceTally::default();
        let mut created = 0;
        let mut existing = 0;

        for record in &intersections {
            let inserted = self.policy.apply(
                self.store.create_intersection(*record),
                Stage::Coverage,
                EntityKind::Intersection,
                self.logger.as_ref(),
                &mut tally,
            )?;
            match inserted {
                Some(true) => {
                    created += 1;
                    log_debug!(self.logger, "Created intersection {}", record);
                }
                Some(false) => existing += 1,
                None => {}
            }
        }

        log_info!(
            self.logger,
            "Found {} intersections ({} new, {} already stored, {} failed)",
            intersections.len(),
            created,
            existing,
            tally.failed
        );

        Ok(StageOutput {
            value: CoverageSummary {
                intersections,
                created,
                existing,
            },
            tally,
        })
    }

    /// Test every sector against every vertex of `squares` and store the hits.
    pub fn analyze(
        &self,
        sectors: &[SectorRecord],
        squares: &[&Square],
    ) -> Result<StageOutput<CoverageSummary>, AnalysisError> {
        let vertex_count: usize = squares.iter().map(|s| s.vertices.len()).sum();
        log_info!(
            self.logger,
            "Testing {} sectors against {} vertices",
            sectors.len(),
            vertex_count
        );
        self.record(Self::intersections(sectors, squares))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::NoOpLogger;
    use crate::sector::generate_sector;
    use crate::store::{MemoryStore, NewSector, SectorId, SquareId, VertexId};
    use geo::Point;

    fn sector(id: u64, anchor: Point<f64>, azimuth: f64) -> SectorRecord {
        SectorRecord {
            id: SectorId(id),
            vertex_id: VertexId(1),
            azimuth_deg: azimuth,
            radius_km: 5.0,
            angle_deg: 60,
            polygon: generate_sector(anchor, azimuth, 5.0, 60),
        }
    }

    fn square(points: &[(u64, f64, f64)]) -> Square {
        Square {
            id: SquareId(1),
            is_matching: true,
            vertices: points
                .iter()
                .map(|(id, x, y)| Vertex {
                    id: VertexId(*id),
                    point: Point::new(*x, *y),
                })
                .collect(),
        }
    }

    #[test]
    fn test_north_sector_finds_north_vertex_only() {
        let sq = square(&[(1, 0.0, 0.0), (2, 0.0, 0.04), (3, 0.0, -0.04), (4, 0.2, 0.2)]);
        let found = CoverageAnalyzer::intersections(&[sector(1, Point::new(0.0, 0.0), 0.0)], &[&sq]);

        assert_eq!(found, vec![IntersectionRecord::new(SectorId(1), VertexId(2))]);
    }

    #[test]
    fn test_order_is_sector_then_vertex() {
        let sq = square(&[(5, 0.0, 0.03), (6, 0.0, -0.03), (7, 0.001, 0.02)]);
        let sectors = [
            sector(1, Point::new(0.0, 0.0), 180.0),
            sector(2, Point::new(0.0, 0.0), 0.0),
        ];

        let found = CoverageAnalyzer::intersections(&sectors, &[&sq]);

        assert_eq!(
            found,
            vec![
                IntersectionRecord::new(SectorId(1), VertexId(6)),
                IntersectionRecord::new(SectorId(2), VertexId(5)),
                IntersectionRecord::new(SectorId(2), VertexId(7)),
            ]
        );
    }

    #[test]
    fn test_duplicate_vertices_reported_once() {
        let sq = square(&[(2, 0.0, 0.04)]);
        let found = CoverageAnalyzer::intersections(
            &[sector(1, Point::new(0.0, 0.0), 0.0)],
            &[&sq, &sq],
        );
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_record_is_idempotent() {
        let store = Arc::new(MemoryStore::new());
        let grid = store.create_grid(1.0).unwrap();
        let square_id = store.create_square(grid, true).unwrap();
        let anchor = store.create_vertex(square_id, Point::new(0.0, 0.0)).unwrap();
        let north = store.create_vertex(square_id, Point::new(0.0, 0.04)).unwrap();
        let sector_id = store
            .create_sector(NewSector {
                vertex_id: anchor,
                azimuth_deg: 0.0,
                radius_km: 5.0,
                angle_deg: 60,
                polygon: generate_sector(Point::new(0.0, 0.0), 0.0, 5.0, 60),
            })
            .unwrap();
        let sectors = store.list_sectors().unwrap();
        let sq = Square {
            id: square_id,
            is_matching: true,
            vertices: vec![
                Vertex { id: anchor, point: Point::new(0.0, 0.0) },
                Vertex { id: north, point: Point::new(0.0, 0.04) },
            ],
        };
        let analyzer = CoverageAnalyzer::new(store.clone(), Arc::new(NoOpLogger));

        let first = analyzer.analyze(&sectors, &[&sq]).unwrap().value;
        let second = analyzer.analyze(&sectors, &[&sq]).unwrap().value;

        assert_eq!(first.created, 1);
        assert_eq!(second.created, 0);
        assert_eq!(second.existing, 1);
        assert_eq!(first.intersections, second.intersections);
        assert_eq!(
            store.list_intersections().unwrap(),
            vec![IntersectionRecord::new(sector_id, north)]
        );
    }
}
