//! Grid generator.
//!
//! Splits a region's bounding box into fixed-size cells in degree space and
//! marks each cell as matching when it lies fully inside the region:
//!
//! ```text
//! Region bounds ──► tile_squares (pure, cells classified in parallel)
//!                        │
//!                        ▼
//!                 GridGenerator::generate
//!                        │  grid → square → 4 × vertex (store writes)
//!                        ▼
//!                 Grid { id, squares: [Square { id, vertices }] }
//! ```
//!
//! # Usage
//!
//! ```
//! use geo::{polygon, Geometry};
//! use geosector::grid::{tile_squares, GridSpec};
//! use geosector::region::Region;
//!
//! let region = Region::load(vec![Geometry::Polygon(polygon![
//!     (x: 0.0, y: 0.0), (x: 0.0, y: 10.0), (x: 10.0, y: 10.0), (x: 10.0, y: 0.0), (x: 0.0, y: 0.0),
//! ])]).unwrap();
//!
//! let squares = tile_squares(&region, &GridSpec::new(1110.0, 0.0)).unwrap();
//! assert_eq!(squares.len(), 1);
//! assert!(squares[0].is_matching);
//! ```

mod generator;
mod model;
mod tiling;

pub use generator::GridGenerator;
pub use model::{Grid, Square, Vertex};
pub use tiling::{grid_steps, tile_squares, GridError, GridSpec, TiledSquare};
