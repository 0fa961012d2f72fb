//! dg-core: grid dungeon assembly by backtracking room placement
//!
//! Rooms are single grid cells with doors on some of their four sides. A
//! layout grows from a start room by plugging open doors with catalog
//! templates that present the opposite door, backing out of any branch that
//! cannot reach the requested room count.
//!
//! The crate has no engine dependency: rooms are created and destroyed
//! through the [`RoomInstantiator`] trait, and [`MemoryInstantiator`] is an
//! in-memory implementation.

pub mod config;
pub mod door;
pub mod error;
pub mod frontier;
pub mod generator;
pub mod grid;
pub mod index;
pub mod instantiate;
pub mod layout;
pub mod search;
pub mod template;
pub mod world;

mod rng;

pub use config::{CandidatePolicy, DoorDiscovery, GenConfig};
pub use door::{Door, DoorSpec};
pub use error::GenError;
pub use frontier::{Frontier, FrontierDelta};
pub use generator::{GenReport, Generator};
pub use grid::{Direction, DoorMask, GridPos};
pub use index::{CandidateOrder, DoorIndex};
pub use instantiate::{Instance, InstanceId, MemoryInstantiator, RoomInstantiator, SceneRoom};
pub use layout::{FinalLayout, Layout, LayoutEntry, LayoutSnapshot, PlacedRoom};
pub use rng::GenRng;
pub use search::{generate, Failure, Generation, PlacementSearch};
pub use template::{Catalog, RoomTemplate, TemplateId};
pub use world::{WorldTransform, DEFAULT_SPACING};
