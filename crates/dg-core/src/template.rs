//! Room templates and the catalog they are drawn from
//!
//! A catalog is fixed once built: templates and their door lists are never
//! mutated during a search.

use std::fmt;

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::door::DoorSpec;
use crate::error::GenError;
use crate::grid::{Direction, DoorMask};

/// Stable identity of a room template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(pub u32);

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Blueprint of a single-cell room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomTemplate {
    pub id: TemplateId,
    pub name: String,
    pub doors: Vec<DoorSpec>,
    /// Placed at the origin before the search starts; never drawn afterwards
    #[serde(default)]
    pub start: bool,
}

impl RoomTemplate {
    pub fn new(id: u32, name: impl Into<String>, doors: Vec<DoorSpec>) -> Self {
        Self {
            id: TemplateId(id),
            name: name.into(),
            doors,
            start: false,
        }
    }

    /// Template with doors on its own cell facing each of `dirs`
    pub fn with_doors(id: u32, name: impl Into<String>, dirs: &[Direction]) -> Self {
        Self::new(id, name, dirs.iter().copied().map(DoorSpec::facing).collect())
    }

    /// Mark this template as the start room
    pub fn as_start(mut self) -> Self {
        self.start = true;
        self
    }

    /// Directions this template presents doors towards
    pub fn door_mask(&self) -> DoorMask {
        self.doors.iter().map(|d| d.direction).collect()
    }
}

/// Validated, immutable set of room templates
#[derive(Debug, Clone)]
pub struct Catalog {
    templates: Vec<RoomTemplate>,
    start: usize,
}

impl Catalog {
    /// Build a catalog, checking the invariants the search relies on
    pub fn new(templates: Vec<RoomTemplate>) -> Result<Self, GenError> {
        if templates.is_empty() {
            return Err(GenError::EmptyCatalog);
        }

        let mut ids = HashSet::new();
        let mut start: Option<usize> = None;
        for (i, template) in templates.iter().enumerate() {
            if !ids.insert(template.id) {
                return Err(GenError::DuplicateTemplateId(template.id));
            }

            let mut seen = HashSet::new();
            for spec in &template.doors {
                if !seen.insert(*spec) {
                    return Err(GenError::DuplicateDoor {
                        template: template.id,
                        door: *spec,
                    });
                }
            }

            if template.start {
                if let Some(prev) = start {
                    return Err(GenError::MultipleStartTemplates {
                        first: templates[prev].id,
                        second: template.id,
                    });
                }
                start = Some(i);
            }
        }

        let start = start.ok_or(GenError::NoStartTemplate)?;
        Ok(Self { templates, start })
    }

    pub fn start(&self) -> &RoomTemplate {
        &self.templates[self.start]
    }

    pub fn start_index(&self) -> usize {
        self.start
    }

    pub fn templates(&self) -> &[RoomTemplate] {
        &self.templates
    }

    pub fn get(&self, index: usize) -> Option<&RoomTemplate> {
        self.templates.get(index)
    }

    pub fn by_id(&self, id: TemplateId) -> Option<&RoomTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Indices of templates the search may draw (everything but the start room)
    pub fn pool(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.templates.len()).filter(move |&i| i != self.start)
    }

    /// Directions the pool can plug a gap towards
    ///
    /// A pool template with a door facing `d` can be placed against an open
    /// door facing `d.opposite()`.
    pub fn coverage(&self) -> DoorMask {
        self.pool()
            .map(|i| self.templates[i].door_mask())
            .fold(DoorMask::empty(), |acc, m| acc | m)
    }
}
