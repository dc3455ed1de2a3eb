//! Hexagon sides and corners
//!
//! Sides double as neighbor directions. Corners are numbered clockwise from the
//! northern vertex of a pointy-top hexagon.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::Error;

/// One of the six hexagon edges, also used as neighbor direction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    NorthWest,
    NorthEast,
    East,
    SouthEast,
    SouthWest,
    West,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::NorthWest,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::SouthWest,
        Direction::West,
    ];

    /// Stable index into per-direction arrays
    pub fn index(self) -> usize {
        match self {
            Direction::NorthWest => 0,
            Direction::NorthEast => 1,
            Direction::East => 2,
            Direction::SouthEast => 3,
            Direction::SouthWest => 4,
            Direction::West => 5,
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::NorthWest => Direction::SouthEast,
            Direction::NorthEast => Direction::SouthWest,
            Direction::East => Direction::West,
            Direction::SouthEast => Direction::NorthWest,
            Direction::SouthWest => Direction::NorthEast,
            Direction::West => Direction::East,
        }
    }

    /// The two corners bounding this side, clockwise
    pub fn corners(self) -> (Corner, Corner) {
        match self {
            Direction::NorthEast => (Corner::North, Corner::NorthEast),
            Direction::East => (Corner::NorthEast, Corner::SouthEast),
            Direction::SouthEast => (Corner::SouthEast, Corner::South),
            Direction::SouthWest => (Corner::South, Corner::SouthWest),
            Direction::West => (Corner::SouthWest, Corner::NorthWest),
            Direction::NorthWest => (Corner::NorthWest, Corner::North),
        }
    }

    /// Axial offset of the neighbor in this direction
    pub fn axial_offset(self) -> (i32, i32) {
        match self {
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
            Direction::NorthEast => (1, -1),
            Direction::NorthWest => (0, -1),
            Direction::SouthEast => (0, 1),
            Direction::SouthWest => (-1, 1),
        }
    }

    pub fn long_name(self) -> &'static str {
        match self {
            Direction::NorthWest => "NORTH_WEST",
            Direction::NorthEast => "NORTH_EAST",
            Direction::East => "EAST",
            Direction::SouthEast => "SOUTH_EAST",
            Direction::SouthWest => "SOUTH_WEST",
            Direction::West => "WEST",
        }
    }

    pub fn short_name(self) -> &'static str {
        match self {
            Direction::NorthWest => "NW",
            Direction::NorthEast => "NE",
            Direction::East => "E",
            Direction::SouthEast => "SE",
            Direction::SouthWest => "SW",
            Direction::West => "W",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.long_name())
    }
}

impl FromStr for Direction {
    type Err = Error;

    /// Case-insensitive; accepts `NORTH_EAST`, `north-east`, `NorthEast` and `NE`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .map(|c| c.to_ascii_uppercase())
            .collect();
        match normalized.as_str() {
            "NORTHWEST" | "NW" => Ok(Direction::NorthWest),
            "NORTHEAST" | "NE" => Ok(Direction::NorthEast),
            "EAST" | "E" => Ok(Direction::East),
            "SOUTHEAST" | "SE" => Ok(Direction::SouthEast),
            "SOUTHWEST" | "SW" => Ok(Direction::SouthWest),
            "WEST" | "W" => Ok(Direction::West),
            _ => Err(Error::UnknownSide(s.to_string())),
        }
    }
}

impl Serialize for Direction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.long_name())
    }
}

impl<'de> Deserialize<'de> for Direction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One of the six hexagon vertices
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Corner {
    North,
    NorthEast,
    SouthEast,
    South,
    SouthWest,
    NorthWest,
}

impl Corner {
    pub const ALL: [Corner; 6] = [
        Corner::North,
        Corner::NorthEast,
        Corner::SouthEast,
        Corner::South,
        Corner::SouthWest,
        Corner::NorthWest,
    ];

    /// Clockwise position starting at the north vertex
    pub fn index(self) -> usize {
        match self {
            Corner::North => 0,
            Corner::NorthEast => 1,
            Corner::SouthEast => 2,
            Corner::South => 3,
            Corner::SouthWest => 4,
            Corner::NorthWest => 5,
        }
    }

    fn from_index(i: usize) -> Corner {
        Corner::ALL[i % 6]
    }

    /// Angle of the vertex around the center (z grows south, so -90° is north)
    pub fn angle_degrees(self) -> f32 {
        -90.0 + 60.0 * self.index() as f32
    }

    /// The two sides meeting at this corner
    pub fn sides(self) -> (Direction, Direction) {
        match self {
            Corner::North => (Direction::NorthWest, Direction::NorthEast),
            Corner::NorthEast => (Direction::NorthEast, Direction::East),
            Corner::SouthEast => (Direction::East, Direction::SouthEast),
            Corner::South => (Direction::SouthEast, Direction::SouthWest),
            Corner::SouthWest => (Direction::SouthWest, Direction::West),
            Corner::NorthWest => (Direction::West, Direction::NorthWest),
        }
    }

    /// The same vertex as seen from the neighbor across `side`.
    ///
    /// `side` must be one of the two sides meeting at this corner; for any other
    /// side the result is the corner itself.
    pub fn mirrored(self, side: Direction) -> Corner {
        let (first, second) = side.corners();
        if self == first {
            Corner::from_index(self.index() + 4)
        } else if self == second {
            Corner::from_index(self.index() + 2)
        } else {
            self
        }
    }

    /// Rectangle-extreme sample point used by the corner blender
    pub fn local_position(self, size_x: usize, size_z: usize) -> (usize, usize) {
        let max_x = size_x.saturating_sub(1);
        let max_z = size_z.saturating_sub(1);
        match self {
            Corner::North => (size_x / 2, 0),
            Corner::NorthEast => (max_x, size_z / 4),
            Corner::SouthEast => (max_x, size_z * 3 / 4),
            Corner::South => (size_x / 2, max_z),
            Corner::SouthWest => (0, size_z * 3 / 4),
            Corner::NorthWest => (0, size_z / 4),
        }
    }
}
