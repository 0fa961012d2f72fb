//! Doorways and the matching rule that connects them

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::grid::{Direction, GridPos};

/// A doorway in a grid cell, facing one direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Door {
    pub cell: GridPos,
    pub direction: Direction,
}

impl Door {
    pub const fn new(cell: GridPos, direction: Direction) -> Self {
        Self { cell, direction }
    }

    /// Cell on the far side of the doorway, `None` at the edge of the grid
    pub fn matching_cell(&self) -> Option<GridPos> {
        self.cell.step(self.direction)
    }

    /// Direction a door must face to plug this one
    pub fn matching_direction(&self) -> Direction {
        self.direction.opposite()
    }

    /// The door that would plug this one
    pub fn matching(&self) -> Option<Door> {
        Some(Door::new(self.matching_cell()?, self.matching_direction()))
    }

    /// True when `other` sits on the far side of this doorway facing back.
    ///
    /// Symmetric: `a.matches(&b) == b.matches(&a)`.
    pub fn matches(&self, other: &Door) -> bool {
        self.matching_cell() == Some(other.cell) && self.matching_direction() == other.direction
    }

    /// Express this door relative to a room placed at `origin`
    pub fn relative_to(&self, origin: GridPos) -> DoorSpec {
        DoorSpec::new(self.cell - origin, self.direction)
    }
}

impl fmt::Display for Door {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.direction, self.cell)
    }
}

/// A doorway on a room template, relative to the room's own origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DoorSpec {
    pub offset: GridPos,
    pub direction: Direction,
}

impl DoorSpec {
    pub const fn new(offset: GridPos, direction: Direction) -> Self {
        Self { offset, direction }
    }

    /// A door on the room's own cell
    pub const fn facing(direction: Direction) -> Self {
        Self::new(GridPos::ORIGIN, direction)
    }

    /// Grid door for a room placed at `origin`, `None` if it would lie
    /// off the grid
    pub fn place(&self, origin: GridPos) -> Option<Door> {
        Some(Door::new(origin.checked_add(self.offset)?, self.direction))
    }
}
