//! dg-assets: Room template catalogs for dungeon generation.

pub mod builtin;
pub mod file;
pub mod registry;

pub use builtin::*;
pub use file::*;
pub use registry::*;
