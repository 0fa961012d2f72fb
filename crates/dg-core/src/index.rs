//! Catalog lookup by door direction
//!
//! Templates are bucketed by the directions their doors face, so a lookup
//! only ever draws from the templates that can actually plug a gap.

use crate::config::{CandidatePolicy, DoorDiscovery};
use crate::door::DoorSpec;
use crate::grid::{Direction, DoorMask, GridPos};
use crate::instantiate::RoomInstantiator;
use crate::rng::GenRng;
use crate::template::Catalog;

/// Per-direction buckets of catalog indices
#[derive(Debug, Clone, Default)]
pub struct DoorIndex {
    by_direction: [Vec<usize>; 4],
    /// Door lists discovered by probing, by catalog index
    probed: Vec<Option<Vec<DoorSpec>>>,
}

impl DoorIndex {
    /// Index the pool from the doors declared on each template
    pub fn from_specs(catalog: &Catalog) -> Self {
        let mut index = Self {
            probed: vec![None; catalog.len()],
            ..Self::default()
        };
        for i in catalog.pool() {
            index.insert(i, catalog.templates()[i].door_mask());
        }
        index
    }

    /// Index the pool by instantiating each template once at the origin
    ///
    /// Every probe instance is destroyed before this returns.
    pub fn probe<I: RoomInstantiator>(catalog: &Catalog, instantiator: &mut I) -> Self {
        let mut index = Self {
            probed: vec![None; catalog.len()],
            ..Self::default()
        };
        for i in catalog.pool() {
            let template = &catalog.templates()[i];
            let instance = instantiator.instantiate(template, GridPos::ORIGIN);
            let specs: Vec<DoorSpec> = instance
                .doors
                .iter()
                .map(|d| d.relative_to(GridPos::ORIGIN))
                .collect();
            instantiator.destroy(instance.handle);

            let mask: DoorMask = specs.iter().map(|s| s.direction).collect();
            log::trace!("probed {} ({}): {:?}", template.name, template.id, mask);
            index.insert(i, mask);
            index.probed[i] = Some(specs);
        }
        index
    }

    pub fn build<I: RoomInstantiator>(
        catalog: &Catalog,
        discovery: DoorDiscovery,
        instantiator: &mut I,
    ) -> Self {
        match discovery {
            DoorDiscovery::Static => Self::from_specs(catalog),
            DoorDiscovery::Probe => Self::probe(catalog, instantiator),
        }
    }

    fn insert(&mut self, index: usize, mask: DoorMask) {
        for dir in mask.directions() {
            self.by_direction[dir.index()].push(index);
        }
    }

    /// Catalog indices of templates presenting a door facing `dir`
    pub fn candidates(&self, dir: Direction) -> &[usize] {
        &self.by_direction[dir.index()]
    }

    /// Uniform draw among templates presenting a door facing `dir`
    pub fn pick(&self, dir: Direction, rng: &mut GenRng) -> Option<usize> {
        rng.choose(self.candidates(dir)).copied()
    }

    /// Random-order walk over the candidates for `dir`
    pub fn order(&self, dir: Direction, policy: CandidatePolicy) -> CandidateOrder {
        CandidateOrder::new(self.candidates(dir).to_vec(), policy)
    }

    /// Door list recorded for a template when the index was probed
    pub fn probed_doors(&self, index: usize) -> Option<&[DoorSpec]> {
        self.probed.get(index).and_then(|d| d.as_deref())
    }

    /// Doors a template is known to have: the probed list when there is
    /// one, the declared specs otherwise
    pub fn door_specs<'c>(&'c self, catalog: &'c Catalog, index: usize) -> &'c [DoorSpec] {
        match self.probed_doors(index) {
            Some(specs) => specs,
            None => catalog.get(index).map(|t| t.doors.as_slice()).unwrap_or_default(),
        }
    }
}

/// Lazily shuffled sequence of candidate templates
///
/// Each draw is one step of a Fisher-Yates shuffle, so the full subset is
/// only permuted as far as the search actually looks.
#[derive(Debug, Clone)]
pub struct CandidateOrder {
    pool: Vec<usize>,
    drawn: usize,
    limit: usize,
}

impl CandidateOrder {
    pub fn new(pool: Vec<usize>, policy: CandidatePolicy) -> Self {
        let limit = match policy {
            CandidatePolicy::Single => pool.len().min(1),
            CandidatePolicy::Exhaustive => pool.len(),
        };
        Self {
            pool,
            drawn: 0,
            limit,
        }
    }

    /// Next candidate, or `None` once the policy's quota is used up
    pub fn draw(&mut self, rng: &mut GenRng) -> Option<usize> {
        if self.drawn >= self.limit {
            return None;
        }
        let j = self.drawn + rng.pick_index(self.pool.len() - self.drawn)?;
        self.pool.swap(self.drawn, j);
        self.drawn += 1;
        Some(self.pool[self.drawn - 1])
    }

    /// Candidates not yet drawn
    pub fn remaining(&self) -> usize {
        self.limit - self.drawn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Direction::*;
    use crate::instantiate::MemoryInstantiator;
    use crate::template::RoomTemplate;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            RoomTemplate::with_doors(0, "start", &[North, South, East, West]).as_start(),
            RoomTemplate::with_doors(1, "straight", &[West, East]),
            RoomTemplate::with_doors(2, "dead end", &[West]),
            RoomTemplate::with_doors(3, "vertical", &[North, South]),
        ])
        .unwrap()
    }

    #[test]
    fn test_buckets_exclude_start() {
        let index = DoorIndex::from_specs(&catalog());
        assert_eq!(index.candidates(West), &[1, 2]);
        assert_eq!(index.candidates(East), &[1]);
        assert_eq!(index.candidates(North), &[3]);
        assert_eq!(index.candidates(South), &[3]);
    }

    #[test]
    fn test_no_candidate_is_none() {
        let catalog = Catalog::new(vec![
            RoomTemplate::with_doors(0, "start", &[East]).as_start(),
        ])
        .unwrap();
        let index = DoorIndex::from_specs(&catalog);
        let mut rng = GenRng::new(1);
        assert!(index.pick(West, &mut rng).is_none());
        assert!(index.order(West, CandidatePolicy::Exhaustive).draw(&mut rng).is_none());
    }

    #[test]
    fn test_probe_matches_specs_and_cleans_up() {
        let catalog = catalog();
        let mut scene = MemoryInstantiator::default();
        let probed = DoorIndex::probe(&catalog, &mut scene);
        let declared = DoorIndex::from_specs(&catalog);
        for dir in Direction::ALL {
            assert_eq!(probed.candidates(dir), declared.candidates(dir));
        }
        assert_eq!(scene.live_count(), 0);
        assert_eq!(scene.created(), 3);
        assert_eq!(scene.destroyed(), 3);
        assert_eq!(probed.probed_doors(2), Some(&[DoorSpec::facing(West)][..]));
        assert_eq!(probed.probed_doors(0), None);
    }

    #[test]
    fn test_door_specs_prefer_probed_list() {
        let catalog = catalog();
        let declared = DoorIndex::from_specs(&catalog);
        assert_eq!(declared.door_specs(&catalog, 3), catalog.templates()[3].doors.as_slice());
        assert!(declared.door_specs(&catalog, 99).is_empty());

        let mut scene = MemoryInstantiator::default();
        let probed = DoorIndex::probe(&catalog, &mut scene);
        assert_eq!(probed.door_specs(&catalog, 2), &[DoorSpec::facing(West)]);
        // the start room is never probed
        assert_eq!(probed.door_specs(&catalog, 0).len(), 4);
    }

    #[test]
    fn test_exhaustive_order_is_permutation() {
        let mut rng = GenRng::new(5);
        let mut order = CandidateOrder::new(vec![4, 8, 15, 16, 23], CandidatePolicy::Exhaustive);
        let mut drawn = Vec::new();
        while let Some(i) = order.draw(&mut rng) {
            drawn.push(i);
        }
        drawn.sort();
        assert_eq!(drawn, vec![4, 8, 15, 16, 23]);
        assert_eq!(order.remaining(), 0);
    }

    #[test]
    fn test_single_order_draws_once() {
        let mut rng = GenRng::new(5);
        let mut order = CandidateOrder::new(vec![1, 2, 3], CandidatePolicy::Single);
        assert!(order.draw(&mut rng).is_some());
        assert!(order.draw(&mut rng).is_none());
    }

    #[test]
    fn test_pick_reaches_every_candidate() {
        let index = DoorIndex::from_specs(&catalog());
        let mut seen = [false; 4];
        for seed in 0..64 {
            let mut rng = GenRng::new(seed);
            seen[index.pick(West, &mut rng).unwrap()] = true;
        }
        assert!(seen[1] && seen[2]);
    }
}
