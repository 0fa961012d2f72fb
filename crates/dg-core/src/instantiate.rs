//! Room instantiation collaborator
//!
//! The search never touches a scene directly. It asks a [`RoomInstantiator`]
//! to create a room at a grid cell, receives an opaque handle plus the room's
//! doors in grid space, and hands the handle back when it backtracks.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::door::Door;
use crate::grid::{Direction, GridPos};
use crate::template::{RoomTemplate, TemplateId};
use crate::world::WorldTransform;

/// A freshly created room
#[derive(Debug, Clone, PartialEq)]
pub struct Instance<H> {
    pub handle: H,
    pub doors: Vec<Door>,
}

/// Creates and destroys placed rooms on behalf of the search
pub trait RoomInstantiator {
    type Handle;

    /// Create `template` at `cell` and report its doors in grid space
    fn instantiate(&mut self, template: &RoomTemplate, cell: GridPos) -> Instance<Self::Handle>;

    /// Destroy a room previously returned by [`instantiate`](Self::instantiate)
    fn destroy(&mut self, handle: Self::Handle);
}

impl<T: RoomInstantiator + ?Sized> RoomInstantiator for &mut T {
    type Handle = T::Handle;

    fn instantiate(&mut self, template: &RoomTemplate, cell: GridPos) -> Instance<Self::Handle> {
        (**self).instantiate(template, cell)
    }

    fn destroy(&mut self, handle: Self::Handle) {
        (**self).destroy(handle)
    }
}

/// Handle issued by [`MemoryInstantiator`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(pub u64);

/// A room living in the in-memory scene
#[derive(Debug, Clone, PartialEq)]
pub struct SceneRoom {
    pub template: TemplateId,
    pub cell: GridPos,
    pub world: [f64; 3],
    /// Door markers in world space
    pub markers: Vec<([f64; 3], Direction)>,
}

/// In-memory scene standing in for an engine
///
/// Grid doors come straight from the template's door specs; world-space
/// markers are kept alongside for display only.
#[derive(Debug, Default)]
pub struct MemoryInstantiator {
    transform: WorldTransform,
    next_id: u64,
    live: HashMap<InstanceId, SceneRoom>,
    created: u64,
    destroyed: u64,
    stale_destroys: u64,
}

impl MemoryInstantiator {
    pub fn new(transform: WorldTransform) -> Self {
        Self {
            transform,
            ..Self::default()
        }
    }

    pub fn transform(&self) -> &WorldTransform {
        &self.transform
    }

    /// Rooms currently alive in the scene
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Total rooms ever created (probes included)
    pub fn created(&self) -> u64 {
        self.created
    }

    /// Total rooms destroyed
    pub fn destroyed(&self) -> u64 {
        self.destroyed
    }

    /// Destroy calls for handles that were not alive
    pub fn stale_destroys(&self) -> u64 {
        self.stale_destroys
    }

    pub fn get(&self, id: InstanceId) -> Option<&SceneRoom> {
        self.live.get(&id)
    }

    pub fn rooms(&self) -> impl Iterator<Item = (&InstanceId, &SceneRoom)> {
        self.live.iter()
    }
}

impl RoomInstantiator for MemoryInstantiator {
    type Handle = InstanceId;

    fn instantiate(&mut self, template: &RoomTemplate, cell: GridPos) -> Instance<InstanceId> {
        let id = InstanceId(self.next_id);
        self.next_id += 1;
        self.created += 1;

        let doors: Vec<Door> = template
            .doors
            .iter()
            .filter_map(|spec| {
                let door = spec.place(cell);
                if door.is_none() {
                    log::warn!("{} at {}: door {:?} lies off the grid", template.name, cell, spec);
                }
                door
            })
            .collect();
        let markers = doors
            .iter()
            .map(|d| (self.transform.grid_to_world(d.cell), d.direction))
            .collect();

        self.live.insert(
            id,
            SceneRoom {
                template: template.id,
                cell,
                world: self.transform.grid_to_world(cell),
                markers,
            },
        );

        Instance { handle: id, doors }
    }

    fn destroy(&mut self, handle: InstanceId) {
        if self.live.remove(&handle).is_some() {
            self.destroyed += 1;
        } else {
            log::warn!("destroy of unknown instance {:?}", handle);
            self.stale_destroys += 1;
        }
    }
}
