//! Run parameters for the analysis pipeline.

use geo::Point;
use serde::Serialize;

use super::policy::PersistencePolicy;
use crate::config::{ConfigFile, DEFAULT_CENTER_LAT, DEFAULT_CENTER_LON, DEFAULT_GRID_SIZE_KM};
use crate::sector::SectorSpec;

/// Where the grid's latitude correction is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceCenter {
    /// A configured point (lon, lat).
    Fixed(Point<f64>),
    /// The area-weighted centroid of the region.
    RegionCentroid,
}

/// Everything a run needs besides the region, the store and the logger.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub grid_size_km: f64,
    pub center: ReferenceCenter,
    pub sector: SectorSpec,
    pub policy: PersistencePolicy,
    /// Anchor sectors at non-matching squares too, and test their vertices.
    pub include_non_matching: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            grid_size_km: DEFAULT_GRID_SIZE_KM,
            center: ReferenceCenter::Fixed(Point::new(DEFAULT_CENTER_LON, DEFAULT_CENTER_LAT)),
            sector: SectorSpec::default(),
            policy: PersistencePolicy::default(),
            include_non_matching: false,
        }
    }
}

impl AnalysisConfig {
    pub fn with_grid_size(mut self, size_km: f64) -> Self {
        self.grid_size_km = size_km;
        self
    }

    pub fn with_center(mut self, center: ReferenceCenter) -> Self {
        self.center = center;
        self
    }

    pub fn with_sector(mut self, sector: SectorSpec) -> Self {
        self.sector = sector;
        self
    }

    pub fn with_policy(mut self, policy: PersistencePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_non_matching(mut self, include: bool) -> Self {
        self.include_non_matching = include;
        self
    }
}

impl From<&ConfigFile> for AnalysisConfig {
    fn from(config: &ConfigFile) -> Self {
        let center = if config.geodesy.center_from_region {
            ReferenceCenter::RegionCentroid
        } else {
            ReferenceCenter::Fixed(Point::new(config.geodesy.center_lon, config.geodesy.center_lat))
        };
        Self {
            grid_size_km: config.grid.size_km,
            center,
            sector: SectorSpec {
                azimuths: config.sector.azimuths.clone(),
                angle_deg: config.sector.angle,
                radius_km: config.sector.radius_km,
                earth_radius_km: config.geodesy.earth_radius_km,
            },
            policy: config.persistence.error_policy,
            include_non_matching: config.analysis.include_non_matching,
        }
    }
}
