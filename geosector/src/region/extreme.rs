//! Compass directions and extreme points of a region.

use std::fmt;
use std::str::FromStr;

use geo::Point;
use serde::{Deserialize, Serialize};

/// One of the four cardinal directions used for extreme-point queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// All directions in reporting order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// Lowercase name (e.g., "north").
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "north" | "n" => Ok(Direction::North),
            "south" | "s" => Ok(Direction::South),
            "east" | "e" => Ok(Direction::East),
            "west" | "w" => Ok(Direction::West),
            other => Err(format!("unknown direction '{}'", other)),
        }
    }
}

/// The outermost boundary coordinate of a region in one direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtremePoint {
    pub direction: Direction,
    /// Boundary coordinate (x = longitude, y = latitude).
    pub point: Point<f64>,
}

impl ExtremePoint {
    pub fn lat(&self) -> f64 {
        self.point.y()
    }

    pub fn lon(&self) -> f64 {
        self.point.x()
    }
}

impl fmt::Display for ExtremePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<5} lat={:.6} lon={:.6}",
            self.direction,
            self.lat(),
            self.lon()
        )
    }
}
