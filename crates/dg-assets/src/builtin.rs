//! Catalogs shipped with the crate.

use dg_core::Catalog;

use crate::file::CatalogFile;
use crate::registry::CatalogError;

/// JSON source of [`sample_catalog`].
pub const SAMPLE_CATALOG_JSON: &str = include_str!("../data/sample_catalog.json");

/// An entrance with four exits plus one template for every door
/// combination: corridors, corners, junctions, a crossroads and dead ends.
pub fn sample_catalog() -> Result<Catalog, CatalogError> {
    CatalogFile::from_json(SAMPLE_CATALOG_JSON)?.into_catalog()
}
