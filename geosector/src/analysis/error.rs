//! Error type for analysis runs.

use thiserror::Error;

use super::policy::Stage;
use crate::grid::GridError;
use crate::region::RegionError;
use crate::sector::SectorError;
use crate::store::StoreError;

/// Errors that stop an analysis run.
///
/// Persistence failures only appear here under
/// [`PersistencePolicy::Strict`](super::PersistencePolicy::Strict).
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Region(#[from] RegionError),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Sector(#[from] SectorError),

    #[error("Persistence failed during {stage} stage: {source}")]
    Persistence {
        stage: Stage,
        #[source]
        source: StoreError,
    },
}
