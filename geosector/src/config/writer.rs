//! INI serialization logic for converting `ConfigFile` → INI string.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    format!(
        r#"[geodesy]
; Sphere radius in km used to project sector arcs
earth_radius_km = {}
; Reference point for the grid's latitude step correction
center_lat = {}
center_lon = {}
; Use the region centroid as the reference point instead (true/false)
center_from_region = {}

[grid]
; Grid cell edge in km. Longitude step = size / 111 degrees
size_km = {}

[sector]
; Compass bearings (0 = north, clockwise), one sector per bearing
azimuths = {}
; Angular width of each sector in whole degrees
angle = {}
; Sector radius in km
radius_km = {}

[persistence]
; What to do when storing a record fails:
;   continue - log the failure, skip the record and its children
;   strict   - stop the run
error_policy = {}

[analysis]
; Also generate sectors and coverage for squares crossing the region edge
include_non_matching = {}

[logging]
; Log file, truncated at the start of every run
file = {}
"#,
        config.geodesy.earth_radius_km,
        config.geodesy.center_lat,
        config.geodesy.center_lon,
        config.geodesy.center_from_region,
        config.grid.size_km,
        format_azimuths(&config.sector.azimuths),
        config.sector.angle,
        config.sector.radius_km,
        config.persistence.error_policy,
        config.analysis.include_non_matching,
        path_to_string(&config.logging.file),
    )
}

/// `[0.0, 120.0]` → `"0,120"`.
pub(super) fn format_azimuths(azimuths: &[f64]) -> String {
    azimuths
        .iter()
        .map(|a| a.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Convert path to display string, collapsing home dir to ~.
pub(super) fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
