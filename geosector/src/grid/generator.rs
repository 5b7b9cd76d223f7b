//! Tiling plus persistence.

use std::sync::Arc;

use super::model::{Grid, Square, Vertex};
use super::tiling::{tile_squares, GridSpec};
use crate::analysis::{AnalysisError, PersistencePolicy, PersistenceTally, Stage, StageOutput};
use crate::log::Logger;
use crate::region::Region;
use crate::store::{EntityKind, Store};
use crate::{log_debug, log_info};

/// Generates a grid over a region and stores it.
///
/// Writes are strictly parent-first: the grid, then each square, then that
/// square's four corners. A record whose parent failed is skipped, not
/// attempted.
pub struct GridGenerator {
    store: Arc<dyn Store>,
    logger: Arc<dyn Logger>,
    policy: PersistencePolicy,
}

impl GridGenerator {
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

    /// Tile `region` at `spec` and persist the result.
    ///
    /// Invalid grid parameters are fatal. Store failures follow the policy.
    pub fn generate(
        &self,
        region: &Region,
        spec: &GridSpec,
    ) -> Result<StageOutput<Grid>, AnalysisError> {
        let tiled = tile_squares(region, spec)?;
        let matching = tiled.iter().filter(|s| s.is_matching).count();
        log_info!(
            self.logger,
            "Tiled region into {} squares ({} matching) at {} km",
            tiled.len(),
            matching,
            spec.size_km
        );

        let mut tally = PersistenceTally::default();
        let logger = self.logger.as_ref();

        let grid_id = self.policy.apply(
            self.store.create_grid(spec.size_km),
            Stage::Grid,
            EntityKind::Grid,
            logger,
            &mut tally,
        )?;

        let Some(grid_id) = grid_id else {
            tally.skipped += tiled.len() * 5;
            return Ok(StageOutput {
                value: Grid {
                    id: None,
                    size_km: spec.size_km,
                    squares: Vec::new(),
                },
                tally,
            });
        };
        log_debug!(self.logger, "Created {}", grid_id);

        let mut squares = Vec::with_capacity(tiled.len());
        for cell in &tiled {
            let square_id = self.policy.apply(
                self.store.create_square(grid_id, cell.is_matching),
                Stage::Grid,
                EntityKind::Square,
                logger,
                &mut tally,
            )?;
            let Some(square_id) = square_id else {
                tally.skipped += cell.corners.len();
                continue;
            };
            log_debug!(self.logger, "Created {} in {}", square_id, grid_id);

            let mut vertices = Vec::with_capacity(cell.corners.len());
            for point in cell.corners {
                let vertex_id = self.policy.apply(
                    self.store.create_vertex(square_id, point),
                    Stage::Grid,
                    EntityKind::Vertex,
                    logger,
                    &mut tally,
                )?;
                if let Some(id) = vertex_id {
                    log_debug!(self.logger, "Created {} in {}", id, square_id);
                    vertices.push(Vertex { id, point });
                }
            }

            squares.push(Square {
                id: square_id,
                is_matching: cell.is_matching,
                vertices,
            });
        }

        log_info!(
            self.logger,
            "Stored {} with {} squares ({} failed, {} skipped)",
            grid_id,
            squares.len(),
            tally.failed,
            tally.skipped
        );

        Ok(StageOutput {
            value: Grid {
                id: Some(grid_id),
                size_km: spec.size_km,
                squares,
            },
            tally,
        })
    }
}
