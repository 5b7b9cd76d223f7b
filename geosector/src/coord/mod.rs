//! Geometry primitives
//!
//! Great-circle destination projection and the small set of coordinate
//! helpers shared by the grid and sector generators. Points follow the
//! `geo` convention: `x` is longitude, `y` is latitude, both in degrees.

mod types;


pub use types::{
    CoordError, EARTH_RADIUS_KM, KM_PER_DEGREE, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON,
};

use geo::Point;

/// Projects a point along a great circle on a sphere of mean Earth radius.
///
/// # Arguments
///
/// * `anchor` - Start point (lon, lat in degrees)
/// * `azimuth_deg` - Compass bearing, 0° = north, clockwise
/// * `distance_km` - Distance along the great circle
///
/// The returned longitude is normalized to `[-180, 180)`.
#[inline]
pub fn project_point(anchor: Point<f64>, azimuth_deg: f64, distance_km: f64) -> Point<f64> {
    project_point_on_sphere(anchor, azimuth_deg, distance_km, EARTH_RADIUS_KM)
}

/// Projects a point along a great circle on a sphere of the given radius.
///
/// Standard spherical destination formula with angular distance
/// `delta = distance_km / earth_radius_km`:
///
/// ```text
/// lat2 = asin(sin(lat1)·cos(delta) + cos(lat1)·sin(delta)·cos(bearing))
/// lon2 = lon1 + atan2(sin(bearing)·sin(delta)·cos(lat1), cos(delta) − sin(lat1)·sin(lat2))
/// ```
#[inline]
pub fn project_point_on_sphere(
    anchor: Point<f64>,
    azimuth_deg: f64,
    distance_km: f64,
    earth_radius_km: f64,
) -> Point<f64> {
    let lat1 = anchor.y().to_radians();
    let lon1 = anchor.x().to_radians();
    let bearing = azimuth_deg.to_radians();

    let delta = distance_km / earth_radius_km;

    let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * bearing.cos()).asin();

    let lon2 = lon1
        + (bearing.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());

    Point::new(normalize_longitude(lon2.to_degrees()), lat2.to_degrees())
}

/// Wraps a longitude into `[-180, 180)`.
#[inline]
pub fn normalize_longitude(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

/// Checks that a latitude/longitude pair lies on the globe.
pub fn validate_lat_lon(lat: f64, lon: f64) -> Result<(), CoordError> {
    if !(MIN_LAT..=MAX_LAT).contains(&lat) {
        return Err(CoordError::InvalidLatitude(lat));
    }
    if !(MIN_LON..=MAX_LON).contains(&lon) {
        return Err(CoordError::InvalidLongitude(lon));
    }
    Ok(())
}

/// Checks an Earth radius override.
pub fn validate_earth_radius(radius_km: f64) -> Result<(), CoordError> {
    if radius_km.is_finite() && radius_km > 0.0 {
        Ok(())
    } else {
        Err(CoordError::InvalidEarthRadius(radius_km))
    }
}
