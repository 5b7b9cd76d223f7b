//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;

use crate::analysis::PersistencePolicy;

/// Complete configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub geodesy: GeodesySettings,
    pub grid: GridSettings,
    pub sector: SectorSettings,
    pub persistence: PersistenceSettings,
    pub analysis: AnalysisSettings,
    pub logging: LoggingSettings,
}

/// Sphere and reference-center parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct GeodesySettings {
    /// Sphere radius used for sector projection.
    pub earth_radius_km: f64,
    /// Reference latitude for the grid's latitude step correction.
    pub center_lat: f64,
    /// Reference longitude. Reported only; grid steps do not depend on it.
    pub center_lon: f64,
    /// Use the region centroid instead of `center_lat`/`center_lon`.
    pub center_from_region: bool,
}

/// Grid tiling.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSettings {
    pub size_km: f64,
}

/// Sector fans.
#[derive(Debug, Clone, PartialEq)]
pub struct SectorSettings {
    /// Compass bearings, one sector each.
    pub azimuths: Vec<f64>,
    /// Angular width in whole degrees.
    pub angle: u32,
    pub radius_km: f64,
}

/// Store failure handling.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistenceSettings {
    pub error_policy: PersistencePolicy,
}

/// Pipeline scope.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSettings {
    /// Also anchor sectors at, and test coverage of, non-matching squares.
    pub include_non_matching: bool,
}

/// Log output.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    pub file: PathBuf,
}
