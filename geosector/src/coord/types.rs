//! Coordinate constants and error types

use std::fmt;

/// Valid latitude range
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;

/// Valid longitude range
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Mean Earth radius in kilometers, used for great-circle projection.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometers per degree of arc, the flat approximation used for grid steps.
pub const KM_PER_DEGREE: f64 = 111.0;

/// Errors that can occur when validating coordinates or geodesy parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordError {
    /// Latitude is outside valid range (-90.0 to 90.0)
    InvalidLatitude(f64),
    /// Longitude is outside valid range (-180.0 to 180.0)
    InvalidLongitude(f64),
    /// Earth radius must be a finite positive number
    InvalidEarthRadius(f64),
}

impl fmt::Display for CoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordError::InvalidLatitude(lat) => {
                write!(
                    f,
                    "Invalid latitude: {} (must be between {} and {})",
                    lat, MIN_LAT, MAX_LAT
                )
            }
            CoordError::InvalidLongitude(lon) => {
                write!(
                    f,
                    "Invalid longitude: {} (must be between {} and {})",
                    lon, MIN_LON, MAX_LON
                )
            }
            CoordError::InvalidEarthRadius(radius) => {
                write!(
                    f,
                    "Invalid earth radius: {} km (must be finite and positive)",
                    radius
                )
            }
        }
    }
}

impl std::error::Error for CoordError {}
