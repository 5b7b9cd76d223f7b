//! Pure construction of sector polygons.

use geo::{Coord, LineString, Point, Polygon};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coord::{self, CoordError, EARTH_RADIUS_KM};

/// Default compass bearings for a three-way scan.
pub const DEFAULT_AZIMUTHS: [f64; 3] = [0.0, 120.0, 240.0];

/// Default angular width in degrees.
pub const DEFAULT_ANGLE_DEG: u32 = 60;

/// Default sector radius in km.
pub const DEFAULT_RADIUS_KM: f64 = 5.0;

/// Errors for sector parameters.
#[derive(Debug, Error, PartialEq)]
pub enum SectorError {
    #[error("Sector radius must be a positive number of km, got {0}")]
    InvalidRadius(f64),

    #[error("Sector angle must be between 1 and 360 degrees, got {0}")]
    InvalidAngle(u32),

    #[error("Sector azimuth must be finite, got {0}")]
    InvalidAzimuth(f64),

    #[error("At least one sector azimuth is required")]
    NoAzimuths,

    #[error(transparent)]
    Coord(#[from] CoordError),
}

/// Fan parameters applied at every anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorSpec {
    /// One sector per azimuth, in this order.
    pub azimuths: Vec<f64>,
    pub angle_deg: u32,
    pub radius_km: f64,
    pub earth_radius_km: f64,
}

impl Default for SectorSpec {
    fn default() -> Self {
        Self {
            azimuths: DEFAULT_AZIMUTHS.to_vec(),
            angle_deg: DEFAULT_ANGLE_DEG,
            radius_km: DEFAULT_RADIUS_KM,
            earth_radius_km: EARTH_RADIUS_KM,
        }
    }
}

impl SectorSpec {
    pub fn validate(&self) -> Result<(), SectorError> {
        if self.azimuths.is_empty() {
            return Err(SectorError::NoAzimuths);
        }
        if let Some(bad) = self.azimuths.iter().find(|a| !a.is_finite()) {
            return Err(SectorError::InvalidAzimuth(*bad));
        }
        if !(1..=360).contains(&self.angle_deg) {
            return Err(SectorError::InvalidAngle(self.angle_deg));
        }
        if !(self.radius_km.is_finite() && self.radius_km > 0.0) {
            return Err(SectorError::InvalidRadius(self.radius_km));
        }
        coord::validate_earth_radius(self.earth_radius_km)?;
        Ok(())
    }

    /// Polygon for one azimuth at `anchor`.
    pub fn polygon_at(&self, anchor: Point<f64>, azimuth_deg: f64) -> Polygon<f64> {
        sector_polygon(
            anchor,
            azimuth_deg,
            self.radius_km,
            self.angle_deg,
            self.earth_radius_km,
        )
    }
}

/// Pie-slice polygon on a sphere of mean Earth radius.
pub fn generate_sector(
    anchor: Point<f64>,
    azimuth_deg: f64,
    radius_km: f64,
    angle_deg: u32,
) -> Polygon<f64> {
    sector_polygon(anchor, azimuth_deg, radius_km, angle_deg, EARTH_RADIUS_KM)
}

/// Pie-slice polygon on a sphere of the given radius.
///
/// The arc is sampled every whole degree from `azimuth - angle/2` to
/// `azimuth + angle/2` inclusive, where `angle/2` is truncated for odd
/// angles. The ring is `[anchor, arc…, anchor]`, so an even angle gives
/// `angle + 3` coordinates.
pub fn sector_polygon(
    anchor: Point<f64>,
    azimuth_deg: f64,
    radius_km: f64,
    angle_deg: u32,
    earth_radius_km: f64,
) -> Polygon<f64> {
    let half = (angle_deg / 2) as i64;
    let start = Coord::from(anchor);

    let mut ring = Vec::with_capacity((2 * half + 3) as usize);
    ring.push(start);
    ring.extend((-half..=half).map(|offset| {
        Coord::from(coord::project_point_on_sphere(
            anchor,
            azimuth_deg + offset as f64,
            radius_km,
            earth_radius_km,
        ))
    }));
    ring.push(start);

    Polygon::new(LineString::new(ring), Vec::new())
}
