//! Grid coordinates and compass directions

use std::fmt;
use std::ops::{Add, Sub};

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// An integer cell on the room grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const ORIGIN: GridPos = GridPos { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Component-wise sum, `None` when it leaves the `i32` grid
    pub fn checked_add(self, rhs: GridPos) -> Option<Self> {
        Some(Self::new(self.x.checked_add(rhs.x)?, self.y.checked_add(rhs.y)?))
    }

    /// The neighbouring cell one step towards `dir`, if there is one
    pub fn step(self, dir: Direction) -> Option<Self> {
        self.checked_add(dir.offset())
    }
}

impl Add for GridPos {
    type Output = GridPos;

    fn add(self, rhs: GridPos) -> GridPos {
        GridPos::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for GridPos {
    type Output = GridPos;

    fn sub(self, rhs: GridPos) -> GridPos {
        GridPos::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<(i32, i32)> for GridPos {
    fn from((x, y): (i32, i32)) -> Self {
        GridPos::new(x, y)
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Direction a doorway faces
///
/// North is +y, east is +x.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum Direction {
    #[serde(alias = "n", alias = "NORTH", alias = "North")]
    #[strum(to_string = "north", serialize = "n")]
    North,
    #[serde(alias = "s", alias = "SOUTH", alias = "South")]
    #[strum(to_string = "south", serialize = "s")]
    South,
    #[serde(alias = "e", alias = "EAST", alias = "East")]
    #[strum(to_string = "east", serialize = "e")]
    East,
    #[serde(alias = "w", alias = "WEST", alias = "West")]
    #[strum(to_string = "west", serialize = "w")]
    West,
}

impl Direction {
    /// All directions, in declaration order
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Unit step in grid space
    pub const fn offset(self) -> GridPos {
        match self {
            Direction::North => GridPos::new(0, 1),
            Direction::South => GridPos::new(0, -1),
            Direction::East => GridPos::new(1, 0),
            Direction::West => GridPos::new(-1, 0),
        }
    }

    /// The direction a door must face to connect with a door facing `self`
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    /// Dense index, usable for per-direction tables
    pub const fn index(self) -> usize {
        self as usize
    }
}

bitflags! {
    /// A set of directions
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DoorMask: u8 {
        const NORTH = 0x01;
        const SOUTH = 0x02;
        const EAST = 0x04;
        const WEST = 0x08;
    }
}

impl DoorMask {
    pub const fn of(dir: Direction) -> DoorMask {
        match dir {
            Direction::North => DoorMask::NORTH,
            Direction::South => DoorMask::SOUTH,
            Direction::East => DoorMask::EAST,
            Direction::West => DoorMask::WEST,
        }
    }

    pub fn has(self, dir: Direction) -> bool {
        self.contains(DoorMask::of(dir))
    }

    /// Directions in this set, in `Direction::ALL` order
    pub fn directions(self) -> impl Iterator<Item = Direction> {
        Direction::ALL.into_iter().filter(move |d| self.has(*d))
    }

    /// Box-drawing glyph for a room with doors on these sides
    pub fn glyph(self) -> char {
        let n = self.has(Direction::North);
        let s = self.has(Direction::South);
        let e = self.has(Direction::East);
        let w = self.has(Direction::West);
        match (n, s, e, w) {
            (false, false, false, false) => '□',
            (true, false, false, false) => '╵',
            (false, true, false, false) => '╷',
            (false, false, true, false) => '╶',
            (false, false, false, true) => '╴',
            (true, true, false, false) => '│',
            (false, false, true, true) => '─',
            (true, false, true, false) => '└',
            (true, false, false, true) => '┘',
            (false, true, true, false) => '┌',
            (false, true, false, true) => '┐',
            (true, true, true, false) => '├',
            (true, true, false, true) => '┤',
            (true, false, true, true) => '┴',
            (false, true, true, true) => '┬',
            (true, true, true, true) => '┼',
        }
    }
}

impl FromIterator<Direction> for DoorMask {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        iter.into_iter()
            .fold(DoorMask::empty(), |mask, d| mask | DoorMask::of(d))
    }
}

// Manual serde impl for DoorMask
impl Serialize for DoorMask {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DoorMask {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u8::deserialize(deserializer)?;
        Ok(DoorMask::from_bits_truncate(bits))
    }
}
