//! Re-seeding wrapper around [`PlacementSearch`]

use std::borrow::Cow;

use crate::config::GenConfig;
use crate::error::GenError;
use crate::index::DoorIndex;
use crate::instantiate::RoomInstantiator;
use crate::rng::GenRng;
use crate::search::{Generation, PlacementSearch};
use crate::template::Catalog;

/// Result of a generator run
#[derive(Debug, Clone, PartialEq)]
pub struct GenReport<H> {
    pub generation: Generation<H>,
    /// Searches run, the successful one included
    pub attempts: u32,
    /// Seed the attempt seeds were derived from
    pub base_seed: u64,
}

/// Owns a catalog and configuration, and retries failed searches with
/// fresh seeds up to `max_attempts` times.
#[derive(Debug, Clone)]
pub struct Generator {
    catalog: Catalog,
    config: GenConfig,
}

impl Generator {
    pub fn new(catalog: Catalog, config: GenConfig) -> Result<Self, GenError> {
        config.validate()?;
        Ok(Self { catalog, config })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &GenConfig {
        &self.config
    }

    pub fn run<I: RoomInstantiator>(
        &self,
        instantiator: &mut I,
    ) -> Result<GenReport<I::Handle>, GenError> {
        let base_seed = self
            .config
            .seed
            .unwrap_or_else(|| GenRng::from_entropy().seed());

        // one index for every attempt: probing happens once per run
        let index = DoorIndex::build(&self.catalog, self.config.discovery, instantiator);

        let mut attempt = 0;
        loop {
            let seed = GenRng::derive_seed(base_seed, attempt);
            attempt += 1;

            let search = PlacementSearch::with_index(
                &self.catalog,
                &self.config,
                Cow::Borrowed(&index),
                &mut *instantiator,
                GenRng::new(seed),
            )?;
            let generation = search.run()?;

            match &generation {
                Generation::Complete(layout) => {
                    log::info!(
                        "generated {} rooms in {} steps (seed {}, attempt {})",
                        layout.len(),
                        layout.steps,
                        seed,
                        attempt
                    );
                }
                Generation::Failed { reason, steps, .. } => {
                    log::warn!(
                        "attempt {}/{} failed: {:?} after {} steps (seed {})",
                        attempt,
                        self.config.max_attempts,
                        reason,
                        steps,
                        seed
                    );
                }
            }

            if generation.is_complete() || attempt >= self.config.max_attempts {
                return Ok(GenReport {
                    generation,
                    attempts: attempt,
                    base_seed,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Direction::*;
    use crate::instantiate::MemoryInstantiator;
    use crate::search::Failure;
    use crate::template::RoomTemplate;

    fn coin_flip_catalog() -> Catalog {
        Catalog::new(vec![
            RoomTemplate::with_doors(0, "start", &[East]).as_start(),
            RoomTemplate::with_doors(1, "straight", &[West, East]),
            RoomTemplate::with_doors(2, "dead end", &[West]),
        ])
        .unwrap()
    }

    #[test]
    fn test_new_validates() {
        assert!(Generator::new(coin_flip_catalog(), GenConfig::new(0)).is_err());
    }

    #[test]
    fn test_first_success_stops() {
        let generator =
            Generator::new(coin_flip_catalog(), GenConfig::new(3).with_seed(1).with_attempts(5))
                .unwrap();
        let mut scene = MemoryInstantiator::default();
        let report = generator.run(&mut scene).unwrap();
        assert!(report.generation.is_complete());
        assert_eq!(report.attempts, 1);
        assert_eq!(report.base_seed, 1);
        assert_eq!(report.generation.seed(), 1);
        assert_eq!(scene.live_count(), 3);
    }

    #[test]
    fn test_single_policy_retries_until_success() {
        use crate::config::CandidatePolicy;
        // With one draw per door, each attempt succeeds only when the
        // straight corridor is drawn; 64 attempts make failure negligible.
        let config = GenConfig::new(3)
            .with_seed(77)
            .with_candidates(CandidatePolicy::Single)
            .with_attempts(64);
        let generator = Generator::new(coin_flip_catalog(), config).unwrap();
        let mut scene = MemoryInstantiator::default();
        let report = generator.run(&mut scene).unwrap();
        assert!(report.generation.is_complete());
        assert_eq!(scene.live_count(), 3);
        assert_eq!(scene.created() - scene.destroyed(), 3);
    }

    #[test]
    fn test_all_attempts_fail() {
        let catalog = Catalog::new(vec![
            RoomTemplate::with_doors(0, "start", &[East]).as_start(),
        ])
        .unwrap();
        let generator =
            Generator::new(catalog, GenConfig::new(2).with_seed(3).with_attempts(4)).unwrap();
        let mut scene = MemoryInstantiator::default();
        let report = generator.run(&mut scene).unwrap();
        assert_eq!(report.attempts, 4);
        assert!(matches!(
            report.generation,
            Generation::Failed {
                reason: Failure::Exhausted,
                ..
            }
        ));
        assert_eq!(scene.live_count(), 0);
    }

    #[test]
    fn test_probing_happens_once_per_run() {
        use crate::config::DoorDiscovery;
        // two pool templates, neither can plug the start's east door
        let catalog = Catalog::new(vec![
            RoomTemplate::with_doors(0, "start", &[East]).as_start(),
            RoomTemplate::with_doors(1, "cap", &[East]),
            RoomTemplate::with_doors(2, "pass", &[North, South]),
        ])
        .unwrap();
        let config = GenConfig::new(2)
            .with_seed(5)
            .with_attempts(6)
            .with_discovery(DoorDiscovery::Probe);
        let generator = Generator::new(catalog, config).unwrap();
        let mut scene = MemoryInstantiator::default();
        let report = generator.run(&mut scene).unwrap();
        assert_eq!(report.attempts, 6);
        // one probe per pool template, plus one start room per attempt
        assert_eq!(scene.created(), 2 + 6);
        assert_eq!(scene.live_count(), 0);
    }
}
