//! Random number generation for layout search
//!
//! Uses a seeded ChaCha RNG so a (catalog, config, seed) triple always
//! produces the same layout.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Multiplier used to spread retry seeds apart (golden ratio, 64-bit).
const SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Generation random number generator
///
/// Wraps ChaCha8Rng for reproducible random number generation.
/// Note: only the seed is serialized; a restored RNG restarts its stream.
#[derive(Debug, Clone)]
pub struct GenRng {
    rng: ChaCha8Rng,
    seed: u64,
}

// Custom serialization - only serialize seed, recreate RNG on deserialize
impl Serialize for GenRng {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.seed.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for GenRng {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let seed = u64::deserialize(deserializer)?;
        Ok(GenRng::new(seed))
    }
}

impl GenRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create a new RNG with a random seed
    pub fn from_entropy() -> Self {
        let seed = rand::random();
        Self::new(seed)
    }

    /// Get the seed used to create this RNG
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform index into a collection of `len` items, `None` when empty.
    pub fn pick_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            None
        } else {
            Some(self.rng.gen_range(0..len))
        }
    }

    /// Choose a random element from a slice
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        self.pick_index(items.len()).map(|i| &items[i])
    }

    /// Seed for retry attempt `attempt` of a generation run.
    ///
    /// Attempt 0 reuses the base seed, so a single-attempt run is
    /// reproducible from the seed alone.
    pub fn derive_seed(base: u64, attempt: u32) -> u64 {
        base.wrapping_add(SEED_STRIDE.wrapping_mul(attempt as u64))
    }
}

impl Default for GenRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}
