//! Tracker configuration.
//!
//! # Responsibility
//! - Hold the weekly goal range, the default seed and the storage keys.
//! - Validate a configuration before any tracker is opened with it.
//!
//! # Invariants
//! - `min_goal <= max_goal`.
//! - Dataset and marker keys are non-empty and distinct.
//! - Seed names are non-blank and case-insensitively unique.

use crate::model::dataset::{Dataset, DatasetValidationError};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Lower bound of the weekly sets goal per body part.
pub const MIN_GOAL: u32 = 10;
/// Upper bound of the weekly sets goal per body part.
pub const MAX_GOAL: u32 = 20;
/// Body parts seeded at first run and at every weekly rollover.
pub const DEFAULT_SEED: [&str; 4] = ["Chest", "Back", "Legs", "Shoulders"];
pub const DEFAULT_DATASET_KEY: &str = "setweek.dataset";
pub const DEFAULT_MARKER_KEY: &str = "setweek.week_start";

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidGoalRange { min_goal: u32, max_goal: u32 },
    EmptyKey(&'static str),
    KeyCollision(String),
    InvalidSeed(DatasetValidationError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidGoalRange { min_goal, max_goal } => write!(
                f,
                "min_goal {min_goal} must not exceed max_goal {max_goal}"
            ),
            Self::EmptyKey(field) => write!(f, "{field} cannot be empty"),
            Self::KeyCollision(key) => {
                write!(f, "dataset and marker keys must differ, both are `{key}`")
            }
            Self::InvalidSeed(err) => write!(f, "invalid default seed: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidSeed(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DatasetValidationError> for ConfigError {
    fn from(value: DatasetValidationError) -> Self {
        Self::InvalidSeed(value)
    }
}

/// Where a set count sits relative to the weekly goal range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    Below,
    Within,
    Above,
}

/// Runtime configuration for one tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub min_goal: u32,
    pub max_goal: u32,
    /// Names of the items created on first run and on every rollover.
    pub default_seed: Vec<String>,
    /// Storage key of the serialized dataset.
    pub dataset_key: String,
    /// Storage key of the serialized week marker.
    pub marker_key: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            min_goal: MIN_GOAL,
            max_goal: MAX_GOAL,
            default_seed: DEFAULT_SEED.iter().map(|name| name.to_string()).collect(),
            dataset_key: DEFAULT_DATASET_KEY.to_string(),
            marker_key: DEFAULT_MARKER_KEY.to_string(),
        }
    }
}

impl TrackerConfig {
    /// Checks every configuration invariant.
    ///
    /// # Errors
    /// - `InvalidGoalRange` when `min_goal > max_goal`.
    /// - `EmptyKey` when a storage key is blank.
    /// - `KeyCollision` when both keys are equal.
    /// - `InvalidSeed` when the seed names are blank or repeated.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.min_goal > self.max_goal {
            return Err(ConfigError::InvalidGoalRange {
                min_goal: self.min_goal,
                max_goal: self.max_goal,
            });
        }
        if self.dataset_key.trim().is_empty() {
            return Err(ConfigError::EmptyKey("dataset_key"));
        }
        if self.marker_key.trim().is_empty() {
            return Err(ConfigError::EmptyKey("marker_key"));
        }
        if self.dataset_key == self.marker_key {
            return Err(ConfigError::KeyCollision(self.dataset_key.clone()));
        }
        self.seed_dataset()?;
        Ok(())
    }

    /// Builds a fresh zeroed dataset from `default_seed`.
    pub fn seed_dataset(&self) -> ConfigResult<Dataset> {
        Ok(Dataset::from_names(&self.default_seed)?)
    }

    /// Classifies `sets` against the goal range (inclusive on both ends).
    pub fn goal_status(&self, sets: u32) -> GoalStatus {
        if sets < self.min_goal {
            GoalStatus::Below
        } else if sets > self.max_goal {
            GoalStatus::Above
        } else {
            GoalStatus::Within
        }
    }
}
