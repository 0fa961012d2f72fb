//! Generation settings

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::GenError;
use crate::grid::GridPos;

/// How many templates are tried against a single open door
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum CandidatePolicy {
    /// One uniform draw; a failed branch moves on to the next open door
    Single,
    /// Every matching template, in random order, before moving on
    #[default]
    Exhaustive,
}

/// Where the door index learns each template's doors from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DoorDiscovery {
    /// Read the door specs declared on the template
    #[default]
    Static,
    /// Instantiate each template once and read the doors it reports
    Probe,
}

/// Settings for one generation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenConfig {
    /// Rooms in the finished layout, start room included
    pub total_rooms: u32,
    /// Cell the start room is placed on
    pub origin: GridPos,
    /// Seed for reproducible runs; a random seed is used when absent
    pub seed: Option<u64>,
    /// Upper bound on candidate instantiations per attempt, counting
    /// rooms later rolled back or rejected for lacking a door back
    pub max_steps: Option<u64>,
    /// Searches to run, each with a fresh seed, before giving up
    pub max_attempts: u32,
    pub candidates: CandidatePolicy,
    pub discovery: DoorDiscovery,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            total_rooms: 10,
            origin: GridPos::ORIGIN,
            seed: None,
            max_steps: None,
            max_attempts: 1,
            candidates: CandidatePolicy::default(),
            discovery: DoorDiscovery::default(),
        }
    }
}

impl GenConfig {
    pub fn new(total_rooms: u32) -> Self {
        Self {
            total_rooms,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_origin(mut self, origin: GridPos) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_max_steps(mut self, steps: u64) -> Self {
        self.max_steps = Some(steps);
        self
    }

    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn with_candidates(mut self, policy: CandidatePolicy) -> Self {
        self.candidates = policy;
        self
    }

    pub fn with_discovery(mut self, discovery: DoorDiscovery) -> Self {
        self.discovery = discovery;
        self
    }

    pub fn validate(&self) -> Result<(), GenError> {
        if self.total_rooms == 0 {
            return Err(GenError::InvalidConfig(
                "total_rooms must be at least 1".to_string(),
            ));
        }
        if self.max_attempts == 0 {
            return Err(GenError::InvalidConfig(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_defaults() {
        let config = GenConfig::default();
        assert_eq!(config.origin, GridPos::ORIGIN);
        assert_eq!(config.max_attempts, 1);
        assert_eq!(config.candidates, CandidatePolicy::Exhaustive);
        assert_eq!(config.discovery, DoorDiscovery::Static);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_rooms() {
        assert!(matches!(
            GenConfig::new(0).validate(),
            Err(GenError::InvalidConfig(_))
        ));
        assert!(GenConfig::new(3).with_attempts(0).validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GenConfig =
            serde_json::from_str(r#"{ "total_rooms": 4, "seed": 9, "candidates": "single" }"#)
                .unwrap();
        assert_eq!(config.total_rooms, 4);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.candidates, CandidatePolicy::Single);
        assert_eq!(config.max_attempts, 1);
        assert_eq!(config.max_steps, None);
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!(CandidatePolicy::from_str("Single").unwrap(), CandidatePolicy::Single);
        assert_eq!(DoorDiscovery::from_str("probe").unwrap(), DoorDiscovery::Probe);
        assert_eq!(CandidatePolicy::Exhaustive.to_string(), "exhaustive");
    }
}
