//! Sector generator.
//!
//! A sector is a pie slice anchored at a grid vertex: the anchor, an arc of
//! great-circle projections one degree apart, and the anchor again.
//!
//! ```
//! use geo::Point;
//! use geosector::sector::generate_sector;
//!
//! let fan = generate_sector(Point::new(31.0, 49.0), 0.0, 5.0, 60);
//! let ring = &fan.exterior().0;
//!
//! assert_eq!(ring.len(), 63);
//! assert_eq!(ring.first(), ring.last());
//! ```

mod fan;
mod generator;

pub use fan::{
    generate_sector, sector_polygon, SectorError, SectorSpec, DEFAULT_ANGLE_DEG,
    DEFAULT_AZIMUTHS, DEFAULT_RADIUS_KM,
};
pub use generator::SectorGenerator;
