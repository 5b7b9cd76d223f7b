//! Configuration key access and validation.
//!
//! Type-safe get/set of configuration values by `section.key` name, with
//! validation via small value specifications.

use std::str::FromStr;
use thiserror::Error;

use super::parser::{
    expand_tilde, parse_angle, parse_azimuths, parse_bool, parse_center_lat, parse_lon,
    parse_positive_f64,
};
use super::settings::ConfigFile;
use super::writer::{format_azimuths, path_to_string};

/// Errors that can occur when getting or setting configuration values.
#[derive(Debug, Error)]
pub enum ConfigKeyError {
    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),

    #[error("Invalid value for {key}: {reason}")]
    ValidationFailed { key: String, reason: String },
}

/// Supported configuration keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    GeodesyEarthRadiusKm,
    GeodesyCenterLat,
    GeodesyCenterLon,
    GeodesyCenterFromRegion,
    GridSizeKm,
    SectorAzimuths,
    SectorAngle,
    SectorRadiusKm,
    PersistenceErrorPolicy,
    AnalysisIncludeNonMatching,
    LoggingFile,
}

impl FromStr for ConfigKey {
    type Err = ConfigKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        ConfigKey::all()
            .iter()
            .copied()
            .find(|key| key.name() == lower)
            .ok_or_else(|| ConfigKeyError::UnknownKey(s.to_string()))
    }
}

impl ConfigKey {
    /// Canonical key name (e.g., "sector.azimuths").
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::GeodesyEarthRadiusKm => "geodesy.earth_radius_km",
            ConfigKey::GeodesyCenterLat => "geodesy.center_lat",
            ConfigKey::GeodesyCenterLon => "geodesy.center_lon",
            ConfigKey::GeodesyCenterFromRegion => "geodesy.center_from_region",
            ConfigKey::GridSizeKm => "grid.size_km",
            ConfigKey::SectorAzimuths => "sector.azimuths",
            ConfigKey::SectorAngle => "sector.angle",
            ConfigKey::SectorRadiusKm => "sector.radius_km",
            ConfigKey::PersistenceErrorPolicy => "persistence.error_policy",
            ConfigKey::AnalysisIncludeNonMatching => "analysis.include_non_matching",
            ConfigKey::LoggingFile => "logging.file",
        }
    }

    /// Section name (e.g., "sector").
    pub fn section(&self) -> &'static str {
        self.name().split('.').next().unwrap_or("")
    }

    /// Key name within the section (e.g., "azimuths").
    pub fn key_name(&self) -> &'static str {
        self.name().split('.').nth(1).unwrap_or(self.name())
    }

    /// Current value as it would appear in config.ini.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::GeodesyEarthRadiusKm => config.geodesy.earth_radius_km.to_string(),
            ConfigKey::GeodesyCenterLat => config.geodesy.center_lat.to_string(),
            ConfigKey::GeodesyCenterLon => config.geodesy.center_lon.to_string(),
            ConfigKey::GeodesyCenterFromRegion => config.geodesy.center_from_region.to_string(),
            ConfigKey::GridSizeKm => config.grid.size_km.to_string(),
            ConfigKey::SectorAzimuths => format_azimuths(&config.sector.azimuths),
            ConfigKey::SectorAngle => config.sector.angle.to_string(),
            ConfigKey::SectorRadiusKm => config.sector.radius_km.to_string(),
            ConfigKey::PersistenceErrorPolicy => config.persistence.error_policy.to_string(),
            ConfigKey::AnalysisIncludeNonMatching => {
                config.analysis.include_non_matching.to_string()
            }
            ConfigKey::LoggingFile => path_to_string(&config.logging.file),
        }
    }

    /// Validate `value` and store it in `config`.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigKeyError> {
        self.validate(value)?;
        self.apply(config, value).map_err(|reason| self.failed(reason))
    }

    fn apply(&self, config: &mut ConfigFile, value: &str) -> Result<(), String> {
        match self {
            ConfigKey::GeodesyEarthRadiusKm => {
                config.geodesy.earth_radius_km = parse_positive_f64(value)?;
            }
            ConfigKey::GeodesyCenterLat => config.geodesy.center_lat = parse_center_lat(value)?,
            ConfigKey::GeodesyCenterLon => config.geodesy.center_lon = parse_lon(value)?,
            ConfigKey::GeodesyCenterFromRegion => {
                config.geodesy.center_from_region = parse_bool(value);
            }
            ConfigKey::GridSizeKm => config.grid.size_km = parse_positive_f64(value)?,
            ConfigKey::SectorAzimuths => config.sector.azimuths = parse_azimuths(value)?,
            ConfigKey::SectorAngle => config.sector.angle = parse_angle(value)?,
            ConfigKey::SectorRadiusKm => config.sector.radius_km = parse_positive_f64(value)?,
            ConfigKey::PersistenceErrorPolicy => {
                config.persistence.error_policy = value.parse()?;
            }
            ConfigKey::AnalysisIncludeNonMatching => {
                config.analysis.include_non_matching = parse_bool(value);
            }
            ConfigKey::LoggingFile => config.logging.file = expand_tilde(value.trim()),
        }
        Ok(())
    }

    /// Validate a value according to this key's specification.
    pub fn validate(&self, value: &str) -> Result<(), ConfigKeyError> {
        self.specification()
            .is_satisfied_by(value)
            .map_err(|reason| self.failed(reason))
    }

    fn failed(&self, reason: String) -> ConfigKeyError {
        ConfigKeyError::ValidationFailed {
            key: self.name().to_string(),
            reason,
        }
    }

    fn specification(&self) -> Box<dyn ValueSpecification> {
        match self {
            ConfigKey::GeodesyEarthRadiusKm
            | ConfigKey::GridSizeKm
            | ConfigKey::SectorRadiusKm => Box::new(ParsedSpec(|v| parse_positive_f64(v).map(drop))),
            ConfigKey::GeodesyCenterLat => Box::new(ParsedSpec(|v| parse_center_lat(v).map(drop))),
            ConfigKey::GeodesyCenterLon => Box::new(ParsedSpec(|v| parse_lon(v).map(drop))),
            ConfigKey::SectorAzimuths => Box::new(ParsedSpec(|v| parse_azimuths(v).map(drop))),
            ConfigKey::SectorAngle => Box::new(ParsedSpec(|v| parse_angle(v).map(drop))),
            ConfigKey::PersistenceErrorPolicy => Box::new(OneOfSpec::new(&["continue", "strict"])),
            ConfigKey::GeodesyCenterFromRegion | ConfigKey::AnalysisIncludeNonMatching => {
                Box::new(BooleanSpec)
            }
            ConfigKey::LoggingFile => Box::new(PathSpec),
        }
    }

    /// All supported keys, in config file order.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::GeodesyEarthRadiusKm,
            ConfigKey::GeodesyCenterLat,
            ConfigKey::GeodesyCenterLon,
            ConfigKey::GeodesyCenterFromRegion,
            ConfigKey::GridSizeKm,
            ConfigKey::SectorAzimuths,
            ConfigKey::SectorAngle,
            ConfigKey::SectorRadiusKm,
            ConfigKey::PersistenceErrorPolicy,
            ConfigKey::AnalysisIncludeNonMatching,
            ConfigKey::LoggingFile,
        ]
    }
}

// ============================================================================
// Value Specifications
// ============================================================================

trait ValueSpecification {
    /// `Ok(())` if valid, `Err(reason)` if not.
    fn is_satisfied_by(&self, value: &str) -> Result<(), String>;
}

/// Valid when a parser accepts the value.
struct ParsedSpec(fn(&str) -> Result<(), String>);

impl ValueSpecification for ParsedSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        (self.0)(value)
    }
}

struct OneOfSpec {
    options: &'static [&'static str],
}

impl OneOfSpec {
    fn new(options: &'static [&'static str]) -> Self {
        Self { options }
    }
}

impl ValueSpecification for OneOfSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        let lower = value.trim().to_lowercase();
        if self.options.iter().any(|opt| *opt == lower) {
            Ok(())
        } else {
            Err(format!("must be one of: {}", self.options.join(", ")))
        }
    }
}

struct BooleanSpec;

impl ValueSpecification for BooleanSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        match value.trim().to_lowercase().as_str() {
            "true" | "false" | "1" | "0" | "yes" | "no" | "on" | "off" => Ok(()),
            _ => Err("must be true or false".to_string()),
        }
    }
}

struct PathSpec;

impl ValueSpecification for PathSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        if value.trim().is_empty() {
            Err("path cannot be empty".to_string())
        } else {
            Ok(())
        }
    }
}
