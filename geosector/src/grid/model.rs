//! Persisted grid, square and vertex values.

use std::fmt;

use geo::{Point, Polygon};

use super::tiling::corners_polygon;
use crate::coord::KM_PER_DEGREE;
use crate::store::{GridId, SquareId, VertexId};

/// A square corner that was stored successfully.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub id: VertexId,
    pub point: Point<f64>,
}

/// A stored grid cell and the corners that were stored with it.
#[derive(Debug, Clone, PartialEq)]
pub struct Square {
    pub id: SquareId,
    pub is_matching: bool,
    /// Ring order. Fewer than four only when corner writes failed.
    pub vertices: Vec<Vertex>,
}

impl Square {
    /// East-west extent in km, rounded to two decimals.
    ///
    /// `None` when fewer than three corners exist, since the cell has no
    /// defined shape then.
    pub fn size_km(&self) -> Option<f64> {
        if self.vertices.len() < 3 {
            return None;
        }
        let (min, max) = self
            .vertices
            .iter()
            .map(|v| v.point.x())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
                (lo.min(x), hi.max(x))
            });
        Some(((max - min) * KM_PER_DEGREE * 100.0).round() / 100.0)
    }

    /// Closed polygon through the stored corners, if there are at least three.
    pub fn polygon(&self) -> Option<Polygon<f64>> {
        if self.vertices.len() < 3 {
            return None;
        }
        let points: Vec<Point<f64>> = self.vertices.iter().map(|v| v.point).collect();
        Some(corners_polygon(&points))
    }

    /// Size for display: `"12.5 km"` or `"Unknown"`.
    pub fn size_label(&self) -> String {
        match self.size_km() {
            Some(size) => format!("{} km", size),
            None => "Unknown".to_string(),
        }
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Square<{}, size={}, matching={}>",
            self.id,
            self.size_label(),
            self.is_matching
        )
    }
}

/// A stored tiling pass and the squares stored under it.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    /// `None` when the grid record itself could not be stored.
    pub id: Option<GridId>,
    pub size_km: f64,
    pub squares: Vec<Square>,
}

impl Grid {
    /// Squares fully inside the region.
    pub fn matches(&self) -> impl Iterator<Item = &Square> {
        self.squares.iter().filter(|s| s.is_matching)
    }

    /// Squares touching or outside the region edge.
    pub fn non_matches(&self) -> impl Iterator<Item = &Square> {
        self.squares.iter().filter(|s| !s.is_matching)
    }

    /// Squares to anchor sectors at: matching ones, or all when `include_non_matching`.
    pub fn squares_in_scope(&self, include_non_matching: bool) -> Vec<&Square> {
        self.squares
            .iter()
            .filter(|s| include_non_matching || s.is_matching)
            .collect()
    }

    pub fn vertex_count(&self) -> usize {
        self.squares.iter().map(|s| s.vertices.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(id: u64, is_matching: bool, xs: &[f64]) -> Square {
        Square {
            id: SquareId(id),
            is_matching,
            vertices: xs
                .iter()
                .enumerate()
                .map(|(i, x)| Vertex {
                    id: VertexId(id * 10 + i as u64),
                    point: Point::new(*x, i as f64),
                })
                .collect(),
        }
    }

    #[test]
    fn test_size_from_longitude_extent() {
        let s = square(1, true, &[30.0, 30.5, 30.5, 30.0]);
        assert_eq!(s.size_km(), Some(55.5));
        assert_eq!(s.size_label(), "55.5 km");
    }

    #[test]
    fn test_size_rounds_to_two_decimals() {
        let s = square(1, true, &[0.0, 0.123456, 0.123456]);
        assert_eq!(s.size_km(), Some(13.7));
    }

    #[test]
    fn test_degenerate_square_has_unknown_size() {
        let s = square(2, false, &[0.0, 1.0]);
        assert_eq!(s.size_km(), None);
        assert!(s.polygon().is_none());
        assert_eq!(s.to_string(), "Square<square#2, size=Unknown, matching=false>");
    }

    #[test]
    fn test_grid_views() {
        let grid = Grid {
            id: Some(GridId(1)),
            size_km: 10.0,
            squares: vec![
                square(1, true, &[0.0, 1.0, 1.0, 0.0]),
                square(2, false, &[1.0, 2.0, 2.0, 1.0]),
                square(3, true, &[2.0, 3.0, 3.0, 2.0]),
            ],
        };

        let matching: Vec<SquareId> = grid.matches().map(|s| s.id).collect();
        let other: Vec<SquareId> = grid.non_matches().map(|s| s.id).collect();
        assert_eq!(matching, vec![SquareId(1), SquareId(3)]);
        assert_eq!(other, vec![SquareId(2)]);
        assert_eq!(grid.squares_in_scope(false).len(), 2);
        assert_eq!(grid.squares_in_scope(true).len(), 3);
        assert_eq!(grid.vertex_count(), 12);
    }
}
