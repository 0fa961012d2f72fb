//! Placed rooms and the cells they occupy

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::door::Door;
use crate::error::GenError;
use crate::grid::{DoorMask, GridPos};
use crate::template::{Catalog, TemplateId};

/// A room committed to the layout
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedRoom<H> {
    pub handle: H,
    pub template: TemplateId,
    pub cell: GridPos,
    pub doors: Vec<Door>,
}

impl<H> PlacedRoom<H> {
    pub fn door_mask(&self) -> DoorMask {
        self.doors.iter().map(|d| d.direction).collect()
    }
}

/// Rooms placed so far, plus the occupied-cell set for overlap checks
///
/// `occupied` always holds exactly the cells of `placed`.
#[derive(Debug, Clone)]
pub struct Layout<H> {
    occupied: HashSet<GridPos>,
    placed: Vec<PlacedRoom<H>>,
}

impl<H> Default for Layout<H> {
    fn default() -> Self {
        Self {
            occupied: HashSet::new(),
            placed: Vec::new(),
        }
    }
}

impl<H> Layout<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_occupied(&self, cell: GridPos) -> bool {
        self.occupied.contains(&cell)
    }

    /// Add a room; fails without side effects if its cell is taken
    pub fn insert(&mut self, room: PlacedRoom<H>) -> Result<(), GenError> {
        if !self.occupied.insert(room.cell) {
            return Err(GenError::CellOccupied(room.cell));
        }
        self.placed.push(room);
        Ok(())
    }

    /// Remove the most recently inserted room
    pub fn pop_last(&mut self) -> Option<PlacedRoom<H>> {
        let room = self.placed.pop()?;
        self.occupied.remove(&room.cell);
        Some(room)
    }

    pub fn last(&self) -> Option<&PlacedRoom<H>> {
        self.placed.last()
    }

    /// The placed room that owns `door`
    pub fn owner_of(&self, door: &Door) -> Option<&PlacedRoom<H>> {
        self.placed.iter().rev().find(|room| room.doors.contains(door))
    }

    pub fn rooms(&self) -> &[PlacedRoom<H>] {
        &self.placed
    }

    pub fn len(&self) -> usize {
        self.placed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placed.is_empty()
    }

    pub fn into_rooms(self) -> Vec<PlacedRoom<H>> {
        self.placed
    }

    /// Order-independent picture of the layout, for rollback checks
    pub fn snapshot(&self) -> LayoutSnapshot {
        let mut occupied: Vec<GridPos> = self.occupied.iter().copied().collect();
        occupied.sort();
        let mut placed: Vec<(GridPos, TemplateId)> =
            self.placed.iter().map(|r| (r.cell, r.template)).collect();
        placed.sort();
        LayoutSnapshot { occupied, placed }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LayoutSnapshot {
    pub occupied: Vec<GridPos>,
    pub placed: Vec<(GridPos, TemplateId)>,
}

/// One room of a finished layout, enough for a renderer to rebuild the scene
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutEntry {
    pub template: TemplateId,
    pub name: String,
    pub cell: GridPos,
    pub doors: DoorMask,
}

/// Successful generation output
#[derive(Debug, Clone, PartialEq)]
pub struct FinalLayout<H> {
    pub rooms: Vec<PlacedRoom<H>>,
    /// Doors left unplugged when the room budget ran out
    pub open_doors: Vec<Door>,
    pub seed: u64,
    /// Candidates instantiated while searching, rolled back and rejected
    /// ones included (the start room and probes are not counted)
    pub steps: u64,
}

impl<H> FinalLayout<H> {
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn room_at(&self, cell: GridPos) -> Option<&PlacedRoom<H>> {
        self.rooms.iter().find(|r| r.cell == cell)
    }

    pub fn door_mask(&self, cell: GridPos) -> DoorMask {
        self.room_at(cell).map(|r| r.door_mask()).unwrap_or_default()
    }

    /// Inclusive (min, max) corners of the occupied area
    pub fn bounds(&self) -> Option<(GridPos, GridPos)> {
        let first = self.rooms.first()?.cell;
        Some(self.rooms.iter().fold((first, first), |(lo, hi), r| {
            (
                GridPos::new(lo.x.min(r.cell.x), lo.y.min(r.cell.y)),
                GridPos::new(hi.x.max(r.cell.x), hi.y.max(r.cell.y)),
            )
        }))
    }

    /// (template, cell) listing, in placement order
    pub fn entries(&self, catalog: &Catalog) -> Vec<LayoutEntry> {
        self.rooms
            .iter()
            .map(|r| LayoutEntry {
                template: r.template,
                name: catalog
                    .by_id(r.template)
                    .map(|t| t.name.clone())
                    .unwrap_or_default(),
                cell: r.cell,
                doors: r.door_mask(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Direction;

    fn room(handle: u32, template: u32, x: i32, y: i32, dirs: &[Direction]) -> PlacedRoom<u32> {
        let cell = GridPos::new(x, y);
        PlacedRoom {
            handle,
            template: TemplateId(template),
            cell,
            doors: dirs.iter().map(|&d| Door::new(cell, d)).collect(),
        }
    }

    #[test]
    fn test_insert_and_pop() {
        let mut layout = Layout::new();
        layout.insert(room(0, 0, 0, 0, &[Direction::East])).unwrap();
        layout.insert(room(1, 1, 1, 0, &[Direction::West])).unwrap();
        assert!(layout.is_occupied(GridPos::new(1, 0)));
        assert_eq!(layout.len(), 2);

        let popped = layout.pop_last().unwrap();
        assert_eq!(popped.handle, 1);
        assert!(!layout.is_occupied(GridPos::new(1, 0)));
        assert_eq!(layout.len(), 1);
    }

    #[test]
    fn test_insert_refuses_overlap() {
        let mut layout = Layout::new();
        layout.insert(room(0, 0, 2, 2, &[])).unwrap();
        let before = layout.snapshot();
        assert_eq!(
            layout.insert(room(1, 5, 2, 2, &[])),
            Err(GenError::CellOccupied(GridPos::new(2, 2)))
        );
        assert_eq!(layout.snapshot(), before);
    }

    #[test]
    fn test_owner_of() {
        let mut layout = Layout::new();
        layout.insert(room(0, 0, 0, 0, &[Direction::East])).unwrap();
        layout
            .insert(room(1, 1, 1, 0, &[Direction::West, Direction::North]))
            .unwrap();
        let door = Door::new(GridPos::new(1, 0), Direction::North);
        assert_eq!(layout.owner_of(&door).unwrap().handle, 1);
        let stray = Door::new(GridPos::new(5, 5), Direction::North);
        assert!(layout.owner_of(&stray).is_none());
    }

    #[test]
    fn test_snapshot_ignores_order() {
        let mut a = Layout::new();
        a.insert(room(0, 0, 0, 0, &[])).unwrap();
        a.insert(room(1, 1, 0, 1, &[])).unwrap();
        let mut b = Layout::new();
        b.insert(room(7, 1, 0, 1, &[])).unwrap();
        b.insert(room(8, 0, 0, 0, &[])).unwrap();
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn test_final_layout_bounds_and_mask() {
        let layout = FinalLayout {
            rooms: vec![
                room(0, 0, 0, 0, &[Direction::East]),
                room(1, 1, 1, 0, &[Direction::West, Direction::South]),
                room(2, 2, 1, -1, &[Direction::North]),
            ],
            open_doors: vec![],
            seed: 1,
            steps: 2,
        };
        assert_eq!(
            layout.bounds(),
            Some((GridPos::new(0, -1), GridPos::new(1, 0)))
        );
        assert!(layout.door_mask(GridPos::new(1, 0)).has(Direction::South));
        assert!(layout.door_mask(GridPos::new(9, 9)).is_empty());
    }
}
