//! Default values for all configuration settings.

use std::path::PathBuf;

use super::file::config_directory;
use super::settings::*;
use crate::analysis::PersistencePolicy;
use crate::coord::EARTH_RADIUS_KM;
use crate::sector::{DEFAULT_ANGLE_DEG, DEFAULT_AZIMUTHS, DEFAULT_RADIUS_KM};

/// Default reference latitude (central Ukraine).
pub const DEFAULT_CENTER_LAT: f64 = 49.0139;

/// Default reference longitude (central Ukraine).
pub const DEFAULT_CENTER_LON: f64 = 31.4859;

/// Default grid cell size in km.
pub const DEFAULT_GRID_SIZE_KM: f64 = 100.0;

/// Default log file name inside the logs directory.
pub const DEFAULT_LOG_FILE_NAME: &str = "geosector.log";

/// Default log file path (~/.geosector/logs/geosector.log).
pub fn default_log_file() -> PathBuf {
    config_directory().join("logs").join(DEFAULT_LOG_FILE_NAME)
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            geodesy: GeodesySettings {
                earth_radius_km: EARTH_RADIUS_KM,
                center_lat: DEFAULT_CENTER_LAT,
                center_lon: DEFAULT_CENTER_LON,
                center_from_region: false,
            },
            grid: GridSettings {
                size_km: DEFAULT_GRID_SIZE_KM,
            },
            sector: SectorSettings {
                azimuths: DEFAULT_AZIMUTHS.to_vec(),
                angle: DEFAULT_ANGLE_DEG,
                radius_km: DEFAULT_RADIUS_KM,
            },
            persistence: PersistenceSettings {
                error_policy: PersistencePolicy::LogAndContinue,
            },
            analysis: AnalysisSettings {
                include_non_matching: false,
            },
            logging: LoggingSettings {
                file: default_log_file(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConfigFile::default();

        assert_eq!(config.geodesy.earth_radius_km, 6371.0);
        assert_eq!(config.geodesy.center_lat, DEFAULT_CENTER_LAT);
        assert!(!config.geodesy.center_from_region);
        assert_eq!(config.grid.size_km, 100.0);
        assert_eq!(config.sector.azimuths, vec![0.0, 120.0, 240.0]);
        assert_eq!(config.sector.angle, 60);
        assert_eq!(config.sector.radius_km, 5.0);
        assert_eq!(
            config.persistence.error_policy,
            PersistencePolicy::LogAndContinue
        );
        assert!(!config.analysis.include_non_matching);
        assert!(config.logging.file.ends_with("logs/geosector.log"));
    }
}
