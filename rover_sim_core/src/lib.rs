use std::fmt;

use serde::{Deserialize, Serialize};

pub mod grid;
pub mod rover;
pub mod scenario;
pub mod sequencer;

/// Represents a 2D grid coordinate.
///
/// Coordinates are signed so that a move off the low edge of the grid
/// produces a representable (and rejectable) candidate cell instead of
/// wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl Coordinate {
    pub fn new(x: i32, y: i32) -> Self {
        Coordinate { x, y }
    }

    /// Returns the neighbouring coordinate one cell away in the given heading.
    pub fn step(self, heading: Heading) -> Coordinate {
        let (dx, dy) = heading.offset();
        Coordinate {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The four-way compass direction a rover faces.
///
/// Rotations are written out as explicit tables rather than derived from
/// discriminant arithmetic, so the cycle order North → East → South → West
/// stays auditable at a glance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Heading {
    North,
    East,
    South,
    West,
}

impl Heading {
    /// Rotates one step counter-clockwise. Total: defined for every heading.
    pub fn turn_left(self) -> Heading {
        match self {
            Heading::North => Heading::West,
            Heading::West => Heading::South,
            Heading::South => Heading::East,
            Heading::East => Heading::North,
        }
    }

    /// Rotates one step clockwise. Total: defined for every heading.
    pub fn turn_right(self) -> Heading {
        match self {
            Heading::North => Heading::East,
            Heading::East => Heading::South,
            Heading::South => Heading::West,
            Heading::West => Heading::North,
        }
    }

    /// The unit move vector for this heading. North is +y, East is +x.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Heading::North => (0, 1),
            Heading::East => (1, 0),
            Heading::South => (0, -1),
            Heading::West => (-1, 0),
        }
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Heading::North => "North",
            Heading::East => "East",
            Heading::South => "South",
            Heading::West => "West",
        };
        f.write_str(name)
    }
}
