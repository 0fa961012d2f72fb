use dg_core::{Direction, DoorSpec, GridPos, RoomTemplate, TemplateId};
use serde::{Deserialize, Serialize};

/// A door as written in a catalog file.
///
/// Either a bare direction (`"east"`) for a door on the room's own cell, or
/// an explicit offset (`{ "dx": 0, "dy": 1, "dir": "north" }`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum DoorEntry {
    Facing(Direction),
    Offset {
        #[serde(default)]
        dx: i32,
        #[serde(default)]
        dy: i32,
        dir: Direction,
    },
}

impl DoorEntry {
    pub fn to_spec(self) -> DoorSpec {
        match self {
            DoorEntry::Facing(dir) => DoorSpec::facing(dir),
            DoorEntry::Offset { dx, dy, dir } => DoorSpec::new(GridPos::new(dx, dy), dir),
        }
    }
}

impl From<DoorSpec> for DoorEntry {
    fn from(spec: DoorSpec) -> Self {
        if spec.offset == GridPos::ORIGIN {
            DoorEntry::Facing(spec.direction)
        } else {
            DoorEntry::Offset {
                dx: spec.offset.x,
                dy: spec.offset.y,
                dir: spec.direction,
            }
        }
    }
}

/// One room template in a catalog file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TemplateEntry {
    pub id: u32,
    pub name: String,
    /// Marks the template placed at the origin.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub start: bool,
    #[serde(default)]
    pub doors: Vec<DoorEntry>,
}

impl TemplateEntry {
    pub fn to_template(&self) -> RoomTemplate {
        RoomTemplate {
            id: TemplateId(self.id),
            name: self.name.clone(),
            doors: self.doors.iter().map(|d| d.to_spec()).collect(),
            start: self.start,
        }
    }
}

impl From<&RoomTemplate> for TemplateEntry {
    fn from(template: &RoomTemplate) -> Self {
        Self {
            id: template.id.0,
            name: template.name.clone(),
            start: template.start,
            doors: template.doors.iter().map(|&d| d.into()).collect(),
        }
    }
}

/// The root structure of a catalog file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CatalogFile {
    pub templates: Vec<TemplateEntry>,
}
