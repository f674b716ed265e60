//! Session configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::clock::{TimeoutPolicy, DEFAULT_BUDGET_SECS};
use crate::coretypes::{Difficulty, PlyKind};
use crate::error::{self, ErrorKind};
use crate::search::SearchOptions;

/// Search depth in plies for each difficulty tier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Depths {
    pub low: PlyKind,
    pub medium: PlyKind,
    pub high: PlyKind,
}

impl Depths {
    pub fn for_difficulty(&self, difficulty: Difficulty) -> PlyKind {
        match difficulty {
            Difficulty::Low => self.low,
            Difficulty::Medium => self.medium,
            Difficulty::High => self.high,
        }
    }
}

impl Default for Depths {
    fn default() -> Self {
        Self {
            low: 1,
            medium: 2,
            high: 3,
        }
    }
}

/// Parameters a Session is created with. Every field has a default,
/// so a config file only needs the fields it changes.
///
/// Default values:
///
/// * `time_budget_secs`: 300
/// * `depths`: low 1, medium 2, high 3
/// * `difficulty`: medium
/// * `timeout_policy`: advisory
/// * `search`: pruning and ordering on
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub time_budget_secs: u32,
    pub depths: Depths,
    pub difficulty: Difficulty,
    pub timeout_policy: TimeoutPolicy,
    pub search: SearchOptions,
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from JSON text.
    pub fn from_json_str(json: &str) -> error::Result<Self> {
        serde_json::from_str(json)
            .map_err(|err| error::Error::new(ErrorKind::ConfigMalformed, err))
    }

    /// Read and parse a JSON config file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> error::Result<Self> {
        let json = fs::read_to_string(path.as_ref())
            .map_err(|err| error::Error::new(ErrorKind::ConfigMalformed, err))?;
        Self::from_json_str(&json)
    }

    /// Search depth for the given tier.
    pub fn depth(&self, difficulty: Difficulty) -> PlyKind {
        self.depths.for_difficulty(difficulty)
    }

    /// Set the per-game clock budget.
    pub fn time_budget_secs(mut self, time_budget_secs: u32) -> Self {
        self.time_budget_secs = time_budget_secs;
        self
    }

    /// Set the depth mapping for all tiers.
    pub fn depths(mut self, depths: Depths) -> Self {
        self.depths = depths;
        self
    }

    /// Set the initial difficulty tier.
    pub fn difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Set what happens when the clock runs out.
    pub fn timeout_policy(mut self, timeout_policy: TimeoutPolicy) -> Self {
        self.timeout_policy = timeout_policy;
        self
    }

    /// Set the search heuristics used for engine moves.
    pub fn search_options(mut self, search: SearchOptions) -> Self {
        self.search = search;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            time_budget_secs: DEFAULT_BUDGET_SECS,
            depths: Depths::default(),
            difficulty: Difficulty::default(),
            timeout_policy: TimeoutPolicy::default(),
            search: SearchOptions::default(),
        }
    }
}
