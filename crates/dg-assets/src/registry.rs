use std::path::Path;

use dg_core::{Catalog, Direction, GenError};
use thiserror::Error;

use crate::file::{CatalogFile, TemplateEntry};

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid catalog: {0}")]
    Invalid(#[from] GenError),
}

impl CatalogFile {
    /// Parse a catalog from JSON text.
    pub fn from_json(text: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read a catalog file from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn to_json(&self) -> Result<String, CatalogError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate and convert into a searchable catalog.
    pub fn into_catalog(self) -> Result<Catalog, CatalogError> {
        let templates = self.templates.iter().map(TemplateEntry::to_template).collect();
        Ok(Catalog::new(templates)?)
    }

    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self {
            templates: catalog.templates().iter().map(TemplateEntry::from).collect(),
        }
    }
}

/// Load, validate and coverage-check a catalog file.
///
/// Coverage gaps are logged, not rejected: a catalog that cannot plug some
/// direction can still produce layouts, just fewer of them.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog, CatalogError> {
    let catalog = CatalogFile::load(path)?.into_catalog()?;
    let report = coverage_report(&catalog);
    for dir in &report.missing {
        log::warn!("no template can plug a door facing {}", dir.opposite());
    }
    Ok(catalog)
}

/// Which required directions the catalog's pool can supply.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CoverageReport {
    /// Directions some template's open door would require but no pool
    /// template presents.
    pub missing: Vec<Direction>,
}

impl CoverageReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Check that every direction a door in the catalog can require is
/// presented by at least one pool template.
pub fn coverage_report(catalog: &Catalog) -> CoverageReport {
    let supplied = catalog.coverage();
    let mut missing: Vec<Direction> = catalog
        .templates()
        .iter()
        .flat_map(|t| t.doors.iter().map(|d| d.direction.opposite()))
        .filter(|required| !supplied.has(*required))
        .collect();
    missing.sort();
    missing.dedup();
    CoverageReport { missing }
}
