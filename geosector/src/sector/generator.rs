//! Sector fans at grid vertices, plus persistence.

use std::sync::Arc;

use geo::{Point, Polygon};
use rayon::prelude::*;

use super::fan::SectorSpec;
use crate::analysis::{AnalysisError, PersistencePolicy, PersistenceTally, Stage, StageOutput};
use crate::grid::{Square, Vertex};
use crate::log::Logger;
use crate::store::{EntityKind, NewSector, SectorRecord, Store, VertexId};
use crate::{log_debug, log_info};

/// Builds one sector per azimuth at every vertex in scope and stores them.
///
/// Polygons are computed in parallel. Writes happen afterwards, one at a
/// time, in vertex order then azimuth order.
pub struct SectorGenerator {
    store: Arc<dyn Store>,
    logger: Arc<dyn Logger>,
    policy: PersistencePolicy,
}

impl SectorGenerator {
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

    /// Sectors for a single stored vertex.
    pub fn generate_for_vertex(
        &self,
        vertex: &Vertex,
        spec: &SectorSpec,
    ) -> Result<StageOutput<Vec<SectorRecord>>, AnalysisError> {
        self.generate_for_vertices(std::slice::from_ref(vertex), spec)
    }

    /// Sectors for every vertex of the given squares.
    pub fn generate_for_squares(
        &self,
        squares: &[&Square],
        spec: &SectorSpec,
    ) -> Result<StageOutput<Vec<SectorRecord>>, AnalysisError> {
        let vertices: Vec<Vertex> = squares
            .iter()
            .flat_map(|square| square.vertices.iter().copied())
            .collect();
        self.generate_for_vertices(&vertices, spec)
    }

    fn generate_for_vertices(
        &self,
        vertices: &[Vertex],
        spec: &SectorSpec,
    ) -> Result<StageOutput<Vec<SectorRecord>>, AnalysisError> {
        spec.validate()?;

        let jobs: Vec<(VertexId, Point<f64>, f64)> = vertices
            .iter()
            .flat_map(|vertex| {
                spec.azimuths
                    .iter()
                    .map(move |azimuth| (vertex.id, vertex.point, *azimuth))
            })
            .collect();

        let fans: Vec<(VertexId, f64, Polygon<f64>)> = jobs
            .into_par_iter()
            .map(|(vertex_id, anchor, azimuth)| {
                (vertex_id, azimuth, spec.polygon_at(anchor, azimuth))
            })
            .collect();

        let mut tally = PersistenceTally::default();
        let mut sectors = Vec::with_capacity(fans.len());
        for (vertex_id, azimuth_deg, polygon) in fans {
            let new = NewSector {
                vertex_id,
                azimuth_deg,
                radius_km: spec.radius_km,
                angle_deg: spec.angle_deg,
                polygon,
            };
            let created = self.policy.apply(
                self.store.create_sector(new.clone()),
                Stage::Sectors,
                EntityKind::Sector,
                self.logger.as_ref(),
                &mut tally,
            )?;
            if let Some(id) = created {
                log_debug!(
                    self.logger,
                    "Created {} at {} (azimuth {}°)",
                    id,
                    vertex_id,
                    azimuth_deg
                );
                sectors.push(SectorRecord::from_new(id, new));
            }
        }

        log_info!(
            self.logger,
            "Stored {} sectors for {} vertices ({} failed)",
            sectors.len(),
            vertices.len(),
            tally.failed
        );

        Ok(StageOutput {
            value: sectors,
            tally,
        })
    }
}
