//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! `parse_ini()` is the single place where INI key names are mapped to
//! struct fields. The `parse_*` value helpers are shared with
//! [`ConfigKey`](super::ConfigKey) validation.

use ini::Ini;
use std::path::PathBuf;

use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::coord::{MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [geodesy] section
    if let Some(section) = ini.section(Some("geodesy")) {
        if let Some(v) = section.get("earth_radius_km") {
            config.geodesy.earth_radius_km =
                parse_positive_f64(v).map_err(|reason| invalid("geodesy", "earth_radius_km", v, reason))?;
        }
        if let Some(v) = section.get("center_lat") {
            config.geodesy.center_lat =
                parse_center_lat(v).map_err(|reason| invalid("geodesy", "center_lat", v, reason))?;
        }
        if let Some(v) = section.get("center_lon") {
            config.geodesy.center_lon =
                parse_lon(v).map_err(|reason| invalid("geodesy", "center_lon", v, reason))?;
        }
        if let Some(v) = section.get("center_from_region") {
            config.geodesy.center_from_region = parse_bool(v);
        }
    }

    // [grid] section
    if let Some(section) = ini.section(Some("grid")) {
        if let Some(v) = section.get("size_km") {
            config.grid.size_km =
                parse_positive_f64(v).map_err(|reason| invalid("grid", "size_km", v, reason))?;
        }
    }

    // [sector] section
    if let Some(section) = ini.section(Some("sector")) {
        if let Some(v) = section.get("azimuths") {
            config.sector.azimuths =
                parse_azimuths(v).map_err(|reason| invalid("sector", "azimuths", v, reason))?;
        }
        if let Some(v) = section.get("angle") {
            config.sector.angle =
                parse_angle(v).map_err(|reason| invalid("sector", "angle", v, reason))?;
        }
        if let Some(v) = section.get("radius_km") {
            config.sector.radius_km =
                parse_positive_f64(v).map_err(|reason| invalid("sector", "radius_km", v, reason))?;
        }
    }

    // [persistence] section
    if let Some(section) = ini.section(Some("persistence")) {
        if let Some(v) = section.get("error_policy") {
            config.persistence.error_policy = v
                .parse()
                .map_err(|_| invalid("persistence", "error_policy", v, "must be 'continue' or 'strict'".to_string()))?;
        }
    }

    // [analysis] section
    if let Some(section) = ini.section(Some("analysis")) {
        if let Some(v) = section.get("include_non_matching") {
            config.analysis.include_non_matching = parse_bool(v);
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

fn invalid(section: &str, key: &str, value: &str, reason: String) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason,
    }
}

/// Finite number greater than zero.
pub(super) fn parse_positive_f64(value: &str) -> Result<f64, String> {
    match value.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err("must be a positive number".to_string()),
    }
}

/// Latitude strictly inside the poles, so the grid correction stays finite.
pub(super) fn parse_center_lat(value: &str) -> Result<f64, String> {
    match value.trim().parse::<f64>() {
        Ok(v) if v > MIN_LAT && v < MAX_LAT => Ok(v),
        _ => Err(format!(
            "must be a latitude strictly between {} and {}",
            MIN_LAT, MAX_LAT
        )),
    }
}

pub(super) fn parse_lon(value: &str) -> Result<f64, String> {
    match value.trim().parse::<f64>() {
        Ok(v) if (MIN_LON..=MAX_LON).contains(&v) => Ok(v),
        _ => Err(format!(
            "must be a longitude between {} and {}",
            MIN_LON, MAX_LON
        )),
    }
}

/// Comma-separated compass bearings, at least one.
pub(super) fn parse_azimuths(value: &str) -> Result<Vec<f64>, String> {
    let azimuths: Result<Vec<f64>, _> = value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f64>())
        .collect();
    match azimuths {
        Ok(list) if !list.is_empty() && list.iter().all(|a| a.is_finite()) => Ok(list),
        _ => Err("expected a comma-separated list of degrees like '0,120,240'".to_string()),
    }
}

/// Whole degrees in `1..=360`.
pub(super) fn parse_angle(value: &str) -> Result<u32, String> {
    match value.trim().parse::<u32>() {
        Ok(v) if (1..=360).contains(&v) => Ok(v),
        _ => Err("must be a whole number of degrees between 1 and 360".to_string()),
    }
}

pub(super) fn parse_bool(value: &str) -> bool {
    let v = value.trim().to_lowercase();
    v == "true" || v == "1" || v == "yes" || v == "on"
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
