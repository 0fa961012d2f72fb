#![allow(dead_code)]

use dg_core::{
    Catalog, Direction, Door, GridPos, Instance, InstanceId, MemoryInstantiator, RoomInstantiator,
    RoomTemplate,
};

/// Scene events, in call order
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Created(InstanceId, GridPos),
    Destroyed(InstanceId),
}

/// Wraps the in-memory scene and records every call
#[derive(Debug, Default)]
pub struct RecordingInstantiator {
    pub scene: MemoryInstantiator,
    pub events: Vec<Event>,
    live: Vec<InstanceId>,
    pub out_of_order_destroys: usize,
}

impl RecordingInstantiator {
    pub fn live(&self) -> &[InstanceId] {
        &self.live
    }
}

impl RoomInstantiator for RecordingInstantiator {
    type Handle = InstanceId;

    fn instantiate(&mut self, template: &RoomTemplate, cell: GridPos) -> Instance<InstanceId> {
        let instance = self.scene.instantiate(template, cell);
        self.events.push(Event::Created(instance.handle, cell));
        self.live.push(instance.handle);
        instance
    }

    fn destroy(&mut self, handle: InstanceId) {
        if self.live.last() != Some(&handle) {
            self.out_of_order_destroys += 1;
        }
        self.live.retain(|h| *h != handle);
        self.events.push(Event::Destroyed(handle));
        self.scene.destroy(handle);
    }
}

/// Start hub plus one template for every non-empty door combination
pub fn full_catalog() -> Catalog {
    let mut templates = vec![
        RoomTemplate::with_doors(
            0,
            "hub",
            &[Direction::North, Direction::South, Direction::East, Direction::West],
        )
        .as_start(),
    ];
    for bits in 1u32..16 {
        let dirs: Vec<Direction> = Direction::ALL
            .into_iter()
            .enumerate()
            .filter(|(i, _)| bits & (1 << i) != 0)
            .map(|(_, d)| d)
            .collect();
        templates.push(RoomTemplate::with_doors(bits, format!("room{bits:02}"), &dirs));
    }
    Catalog::new(templates).expect("valid catalog")
}

/// Hub with a dead end for each side; at most five rooms fit
pub fn dead_end_catalog() -> Catalog {
    Catalog::new(vec![
        RoomTemplate::with_doors(
            0,
            "hub",
            &[Direction::North, Direction::South, Direction::East, Direction::West],
        )
        .as_start(),
        RoomTemplate::with_doors(1, "cap n", &[Direction::North]),
        RoomTemplate::with_doors(2, "cap s", &[Direction::South]),
        RoomTemplate::with_doors(3, "cap e", &[Direction::East]),
        RoomTemplate::with_doors(4, "cap w", &[Direction::West]),
    ])
    .expect("valid catalog")
}

/// Every door of `rooms` that is matched by a door of another room
pub fn connected_doors(doors: &[(GridPos, Vec<Door>)]) -> Vec<Door> {
    let all: Vec<Door> = doors.iter().flat_map(|(_, d)| d.iter().copied()).collect();
    all.iter()
        .copied()
        .filter(|d| all.iter().any(|o| o.matches(d)))
        .collect()
}
