//! Pure tiling of a region's bounding box into classified squares.

use geo::{LineString, Point, Polygon};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coord::KM_PER_DEGREE;
use crate::region::Region;

/// Errors for grid parameters that cannot produce a finite tiling.
#[derive(Debug, Error, PartialEq)]
pub enum GridError {
    #[error("Grid size must be a positive number of km, got {0}")]
    InvalidSize(f64),

    #[error("Reference latitude must be strictly between -90 and 90, got {0}")]
    InvalidCenterLatitude(f64),

    #[error("Grid step {step} is too small to advance from {origin}")]
    StepTooSmall { origin: f64, step: f64 },
}

/// Parameters of one tiling pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Nominal cell edge length.
    pub size_km: f64,
    /// Latitude the longitude/latitude correction is computed at.
    pub center_lat_deg: f64,
}

impl GridSpec {
    pub fn new(size_km: f64, center_lat_deg: f64) -> Self {
        Self {
            size_km,
            center_lat_deg,
        }
    }

    pub fn validate(&self) -> Result<(), GridError> {
        if !(self.size_km.is_finite() && self.size_km > 0.0) {
            return Err(GridError::InvalidSize(self.size_km));
        }
        if !(self.center_lat_deg.is_finite() && self.center_lat_deg.abs() < 90.0) {
            return Err(GridError::InvalidCenterLatitude(self.center_lat_deg));
        }
        Ok(())
    }
}

/// Cell steps in degrees as `(dx, dy)`.
///
/// `dx = size / 111` and `dy = size / (111 / cos(center_lat))`. The
/// correction is evaluated once at the reference latitude, not per row.
pub fn grid_steps(spec: &GridSpec) -> Result<(f64, f64), GridError> {
    spec.validate()?;
    let dx = spec.size_km / KM_PER_DEGREE;
    let dy = spec.size_km / (KM_PER_DEGREE / spec.center_lat_deg.to_radians().cos());
    Ok((dx, dy))
}

/// One grid cell before persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct TiledSquare {
    /// Corners in ring order: `(x,y)`, `(x+dx,y)`, `(x+dx,y+dy)`, `(x,y+dy)`.
    pub corners: [Point<f64>; 4],
    pub is_matching: bool,
}

impl TiledSquare {
    /// Closed ring polygon of the corners.
    pub fn polygon(&self) -> Polygon<f64> {
        corners_polygon(&self.corners)
    }
}

/// Tile the region's bounding box and classify every cell.
///
/// Columns advance from `min_lon` while `x < max_lon`, rows from `min_lat`
/// while `y < max_lat`, so a cell starting before the bound is emitted even
/// if it overhangs, and no cell starts at or past it. Output is column-major
/// (all rows of the first column, then the next column). A cell is matching
/// only when it lies entirely inside the region.
pub fn tile_squares(region: &Region, spec: &GridSpec) -> Result<Vec<TiledSquare>, GridError> {
    let (dx, dy) = grid_steps(spec)?;
    let bounds = region.bounds();

    let mut cells = Vec::new();
    let mut x = bounds.min_lon;
    while x < bounds.max_lon {
        let next_x = x + dx;
        if next_x <= x {
            return Err(GridError::StepTooSmall { origin: x, step: dx });
        }
        let mut y = bounds.min_lat;
        while y < bounds.max_lat {
            let next_y = y + dy;
            if next_y <= y {
                return Err(GridError::StepTooSmall { origin: y, step: dy });
            }
            cells.push([
                Point::new(x, y),
                Point::new(next_x, y),
                Point::new(next_x, next_y),
                Point::new(x, next_y),
            ]);
            y = next_y;
        }
        x = next_x;
    }

    Ok(cells
        .into_par_iter()
        .map(|corners| {
            let is_matching = region.contains_polygon(&corners_polygon(&corners));
            TiledSquare {
                corners,
                is_matching,
            }
        })
        .collect())
}

pub(crate) fn corners_polygon(corners: &[Point<f64>]) -> Polygon<f64> {
    let ring: Vec<(f64, f64)> = corners.iter().map(|p| (p.x(), p.y())).collect();
    // LineString -> Polygon closes the ring
    Polygon::new(LineString::from(ring), Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, Geometry, MultiPolygon};

    fn square_region(size: f64) -> Region {
        Region::load(vec![Geometry::Polygon(polygon![
            (x: 0.0, y: 0.0),
            (x: 0.0, y: size),
            (x: size, y: size),
            (x: size, y: 0.0),
            (x: 0.0, y: 0.0),
        ])])
        .unwrap()
    }

    #[test]
    fn test_steps_at_equator_are_equal() {
        let (dx, dy) = grid_steps(&GridSpec::new(111.0, 0.0)).unwrap();
        assert!((dx - 1.0).abs() < 1e-12);
        assert!((dy - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_steps_shrink_latitude_step_away_from_equator() {
        let (dx, dy) = grid_steps(&GridSpec::new(111.0, 60.0)).unwrap();
        assert!((dx - 1.0).abs() < 1e-12);
        assert!((dy - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_specs_rejected() {
        assert_eq!(
            grid_steps(&GridSpec::new(0.0, 0.0)),
            Err(GridError::InvalidSize(0.0))
        );
        assert!(matches!(
            grid_steps(&GridSpec::new(-5.0, 0.0)),
            Err(GridError::InvalidSize(_))
        ));
        assert!(matches!(
            grid_steps(&GridSpec::new(10.0, 90.0)),
            Err(GridError::InvalidCenterLatitude(_))
        ));
        assert!(matches!(
            grid_steps(&GridSpec::new(f64::INFINITY, 0.0)),
            Err(GridError::InvalidSize(_))
        ));
    }

    #[test]
    fn test_single_cell_covering_region() {
        let squares = tile_squares(&square_region(10.0), &GridSpec::new(1110.0, 0.0)).unwrap();

        assert_eq!(squares.len(), 1);
        assert!(squares[0].is_matching);
        assert_eq!(squares[0].corners[0], Point::new(0.0, 0.0));
        assert_eq!(squares[0].corners[2], Point::new(10.0, 10.0));
    }

    #[test]
    fn test_column_major_order() {
        let squares = tile_squares(&square_region(2.0), &GridSpec::new(111.0, 0.0)).unwrap();

        assert_eq!(squares.len(), 4);
        let origins: Vec<(f64, f64)> = squares
            .iter()
            .map(|s| (s.corners[0].x(), s.corners[0].y()))
            .collect();
        assert_eq!(origins, vec![(0.0, 0.0), (0.0, 1.0), (1.0, 0.0), (1.0, 1.0)]);
        assert!(squares.iter().all(|s| s.is_matching));
    }

    #[test]
    fn test_overhanging_cells_are_not_matching() {
        // 1.5° step over a 2° region: 2×2 cells, only the origin cell fits
        let squares =
            tile_squares(&square_region(2.0), &GridSpec::new(166.5, 0.0)).unwrap();

        assert_eq!(squares.len(), 4);
        let matching: Vec<bool> = squares.iter().map(|s| s.is_matching).collect();
        assert_eq!(matching, vec![true, false, false, false]);
    }

    #[test]
    fn test_polygon_ring_is_closed() {
        let squares = tile_squares(&square_region(10.0), &GridSpec::new(1110.0, 0.0)).unwrap();
        let polygon = squares[0].polygon();
        let ring = &polygon.exterior().0;

        assert_eq!(ring.len(), 5);
        assert_eq!(ring.first(), ring.last());
    }

    #[test]
    fn test_loaded_region_tiles_like_raw_area() {
        let boundary = polygon![
            (x: 0.0, y: 0.0),
            (x: 0.0, y: 0.1),
            (x: 0.1, y: 0.1),
            (x: 0.1, y: 0.0),
            (x: 0.0, y: 0.0),
        ];
        let loaded = Region::load(vec![Geometry::Polygon(boundary.clone())]).unwrap();
        let raw = Region::from_area(MultiPolygon::new(vec![boundary])).unwrap();
        let spec = GridSpec::new(3.7, 0.0);

        let from_loaded = tile_squares(&loaded, &spec).unwrap();
        let from_raw = tile_squares(&raw, &spec).unwrap();

        assert_eq!(loaded.bounds(), raw.bounds());
        assert_eq!(from_loaded, from_raw);
        assert_eq!(from_loaded.len(), 9);
        assert!(from_loaded.iter().all(|s| s.is_matching));
    }

    #[test]
    fn test_tiling_is_deterministic() {
        let region = square_region(3.0);
        let spec = GridSpec::new(40.0, 45.0);
        assert_eq!(
            tile_squares(&region, &spec).unwrap(),
            tile_squares(&region, &spec).unwrap()
        );
    }
}
