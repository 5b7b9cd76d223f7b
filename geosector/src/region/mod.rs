//! Region model.
//!
//! A [`Region`] is the single (possibly multi-part) boundary being analyzed.
//! It is built once at the start of a run from one or more input shapes,
//! repaired, unioned, and then only read:
//!
//! ```text
//! input shapes ──► repair ──► union ──► Region { area, bounds }
//!                                          ├── bounds()
//!                                          ├── extreme_point(direction)
//!                                          └── contains_polygon(square)
//! ```
//!
//! # Usage
//!
//! ```
//! use geo::{polygon, Geometry};
//! use geosector::region::{Direction, Region};
//!
//! let boundary = polygon![
//!     (x: 0.0, y: 0.0),
//!     (x: 0.0, y: 10.0),
//!     (x: 10.0, y: 10.0),
//!     (x: 10.0, y: 0.0),
//!     (x: 0.0, y: 0.0),
//! ];
//! let region = Region::load(vec![Geometry::Polygon(boundary)]).unwrap();
//!
//! assert_eq!(region.bounds().as_tuple(), (0.0, 0.0, 10.0, 10.0));
//! assert_eq!(region.extreme_point(Direction::North).unwrap().lat(), 10.0);
//! ```

mod extreme;
mod model;

pub use extreme::{Direction, ExtremePoint};
pub use model::{Bounds, Region, RegionError};
