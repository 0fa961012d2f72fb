//! Open doors waiting for a neighbour
//!
//! Every change is returned as a [`FrontierDelta`] that puts the sequence
//! back exactly as it was when reverted.

use crate::door::Door;

/// What one placement did to the frontier
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a delta that is dropped can no longer be reverted"]
pub struct FrontierDelta {
    /// Removed doors with their original positions, ascending
    removed: Vec<(usize, Door)>,
    /// Number of doors appended at the end
    added: usize,
}

impl FrontierDelta {
    pub fn removed(&self) -> impl Iterator<Item = &Door> {
        self.removed.iter().map(|(_, d)| d)
    }

    pub fn added(&self) -> usize {
        self.added
    }
}

/// Ordered sequence of unconnected doors
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontier {
    doors: Vec<Door>,
}

impl Frontier {
    pub fn new(doors: Vec<Door>) -> Self {
        Self { doors }
    }

    pub fn len(&self) -> usize {
        self.doors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doors.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Door> {
        self.doors.get(index)
    }

    pub fn doors(&self) -> &[Door] {
        &self.doors
    }

    pub fn into_doors(self) -> Vec<Door> {
        self.doors
    }

    /// Connect the door at `index` to a newly placed room with `new_doors`.
    ///
    /// The door at `index` leaves the frontier, as does any other open door
    /// one of `new_doors` matches. New doors that plug a removed door are
    /// consumed; the rest are appended in order.
    pub fn plug(&mut self, index: usize, new_doors: &[Door]) -> FrontierDelta {
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.doors.len() + new_doors.len());
        for (i, door) in self.doors.drain(..).enumerate() {
            if i == index || new_doors.iter().any(|n| n.matches(&door)) {
                removed.push((i, door));
            } else {
                kept.push(door);
            }
        }

        let before = kept.len();
        kept.extend(
            new_doors
                .iter()
                .filter(|n| !removed.iter().any(|(_, r)| r.matches(n))),
        );
        let added = kept.len() - before;
        self.doors = kept;

        FrontierDelta { removed, added }
    }

    /// Undo a delta. Deltas must be reverted newest first.
    pub fn revert(&mut self, delta: FrontierDelta) {
        let keep = self.doors.len() - delta.added;
        self.doors.truncate(keep);
        for (i, door) in delta.removed {
            self.doors.insert(i, door);
        }
    }
}
