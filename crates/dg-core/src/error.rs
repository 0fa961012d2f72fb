//! Errors that no amount of re-seeding will fix
//!
//! Running out of placements is not an error; see [`crate::Failure`].

use thiserror::Error;

use crate::door::{Door, DoorSpec};
use crate::grid::GridPos;
use crate::template::TemplateId;

/// Configuration or invariant error raised by the generator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenError {
    #[error("catalog has no room templates")]
    EmptyCatalog,

    #[error("catalog has no start template")]
    NoStartTemplate,

    #[error("catalog has more than one start template: {first} and {second}")]
    MultipleStartTemplates { first: TemplateId, second: TemplateId },

    #[error("template id {0} is used more than once")]
    DuplicateTemplateId(TemplateId),

    #[error("template {template} lists door {door:?} twice")]
    DuplicateDoor { template: TemplateId, door: DoorSpec },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("cell {0} is already occupied")]
    CellOccupied(GridPos),

    #[error("open door {0} has no owning room")]
    OrphanDoor(Door),
}
