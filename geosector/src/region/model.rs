//! The analysis region: a unioned, repaired boundary plus its bounding box.

use geo::{
    BooleanOps, BoundingRect, Centroid, Geometry, MultiPolygon, Point, Polygon, Validation,
    Within,
};
use serde::{Deserialize, Serialize};

use super::extreme::{Direction, ExtremePoint};

/// Error type for region construction and queries.
#[derive(Debug, thiserror::Error)]
pub enum RegionError {
    #[error("Invalid region geometry: {0}")]
    InvalidGeometry(String),
}

/// Axis-aligned bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl Bounds {
    /// `(min_lon, min_lat, max_lon, max_lat)`
    pub fn as_tuple(&self) -> (f64, f64, f64, f64) {
        (self.min_lon, self.min_lat, self.max_lon, self.max_lat)
    }

    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }
}

/// Immutable analysis region.
///
/// Built once from one or more boundary shapes. Each shape is passed through
/// the overlay engine before the union, which rebuilds self-intersecting
/// rings into valid polygons the same way a zero-distance buffer would.
/// The result is read-only for the rest of the run.
#[derive(Debug, Clone)]
pub struct Region {
    area: MultiPolygon<f64>,
    bounds: Bounds,
}

impl Region {
    /// Build a region from boundary geometries.
    ///
    /// Accepts polygons, multi-polygons and geometry collections of those.
    /// Fails with [`RegionError::InvalidGeometry`] when nothing with area
    /// remains after repair, or when a non-areal geometry is supplied.
    pub fn load<I>(shapes: I) -> Result<Self, RegionError>
    where
        I: IntoIterator<Item = Geometry<f64>>,
    {
        let mut parts = Vec::new();
        for shape in shapes {
            collect_polygons(shape, &mut parts)?;
        }
        if parts.is_empty() {
            return Err(RegionError::InvalidGeometry(
                "no polygon rings supplied".to_string(),
            ));
        }

        let mut repaired = parts.iter().map(repair);
        let area = match (repaired.next(), parts.len()) {
            (Some(only), 1) => only,
            (first, _) => repaired.fold(
                first.unwrap_or_else(|| MultiPolygon::new(Vec::new())),
                |acc, part| acc.union(&part),
            ),
        };

        Self::from_area(area)
    }

    /// Build a region from an already-valid multi-polygon, skipping repair.
    pub fn from_area(area: MultiPolygon<f64>) -> Result<Self, RegionError> {
        let rect = area.bounding_rect().ok_or_else(|| {
            RegionError::InvalidGeometry("region has no coordinates".to_string())
        })?;
        if area.0.iter().all(|polygon| polygon.exterior().0.is_empty()) {
            return Err(RegionError::InvalidGeometry(
                "region has no exterior rings".to_string(),
            ));
        }

        Ok(Self {
            area,
            bounds: Bounds {
                min_lon: rect.min().x,
                min_lat: rect.min().y,
                max_lon: rect.max().x,
                max_lat: rect.max().y,
            },
        })
    }

    /// The combined boundary geometry.
    pub fn area(&self) -> &MultiPolygon<f64> {
        &self.area
    }

    /// Bounding box of the combined geometry.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Area-weighted centroid of the region.
    pub fn centroid(&self) -> Option<Point<f64>> {
        self.area.centroid()
    }

    /// True when the polygon lies entirely inside the region.
    pub fn contains_polygon(&self, polygon: &Polygon<f64>) -> bool {
        polygon.is_within(&self.area)
    }

    /// Outermost exterior-ring coordinate in the given direction.
    ///
    /// Scans every coordinate of every exterior ring in storage order
    /// (polygon by polygon, ring start to ring end). When several
    /// coordinates share the extreme value the first one encountered wins.
    pub fn extreme_point(&self, direction: Direction) -> Result<ExtremePoint, RegionError> {
        let mut best: Option<Point<f64>> = None;

        for coord in self.area.iter().flat_map(|polygon| polygon.exterior().coords()) {
            let candidate = Point::from(*coord);
            let replace = match best {
                None => true,
                Some(current) => match direction {
                    Direction::North => candidate.y() > current.y(),
                    Direction::South => candidate.y() < current.y(),
                    Direction::East => candidate.x() > current.x(),
                    Direction::West => candidate.x() < current.x(),
                },
            };
            if replace {
                best = Some(candidate);
            }
        }

        best.map(|point| ExtremePoint { direction, point })
            .ok_or_else(|| RegionError::InvalidGeometry("region has no rings".to_string()))
    }

    /// Extreme points in north, south, west, east order.
    pub fn extreme_points(&self) -> Result<[ExtremePoint; 4], RegionError> {
        Ok([
            self.extreme_point(Direction::North)?,
            self.extreme_point(Direction::South)?,
            self.extreme_point(Direction::West)?,
            self.extreme_point(Direction::East)?,
        ])
    }
}

/// Rebuild an invalid polygon through the overlay engine.
///
/// Self-intersecting rings come back split into valid parts. Valid input is
/// returned untouched, since the overlay snaps coordinates to its own grid.
fn repair(polygon: &Polygon<f64>) -> MultiPolygon<f64> {
    let part = MultiPolygon::new(vec![polygon.clone()]);
    if polygon.is_valid() {
        return part;
    }
    part.union(&MultiPolygon::new(Vec::new()))
}

fn collect_polygons(shape: Geometry<f64>, out: &mut Vec<Polygon<f64>>) -> Result<(), RegionError> {
    match shape {
        Geometry::Polygon(polygon) => out.push(polygon),
        Geometry::MultiPolygon(multi) => out.extend(multi.0),
        Geometry::Rect(rect) => out.push(rect.to_polygon()),
        Geometry::GeometryCollection(collection) => {
            for inner in collection.0 {
                collect_polygons(inner, out)?;
            }
        }
        other => {
            return Err(RegionError::InvalidGeometry(format!(
                "expected a polygon or multi-polygon boundary, got {}",
                geometry_kind(&other)
            )));
        }
    }
    Ok(())
}

fn geometry_kind(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}
