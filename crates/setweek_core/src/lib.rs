//! Core logic for setweek, a weekly workout-set tracker.
//! This crate owns the week boundary, the reset policy and the persisted
//! dataset; rendering and input handling live with the host.

pub mod config;
pub mod db;
pub mod epoch;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use config::{
    ConfigError, ConfigResult, GoalStatus, TrackerConfig, DEFAULT_SEED, MAX_GOAL, MIN_GOAL,
};
pub use epoch::{week_start, week_start_local, week_start_millis, EpochMarker};
pub use logging::{default_log_level, flush_logging, init_logging, logging_status};
pub use model::dataset::{
    AddItemOutcome, AddRejection, AdjustOutcome, Dataset, DatasetValidationError, RemoveOutcome,
};
pub use model::item::{ItemId, TrackedItem};
pub use service::lifecycle::{load_or_reset, LoadOutcome, MissingPart, ResetReason};
pub use service::tracker::{LoadReport, WeekTracker};
pub use store::codec::{CorruptStateError, PersistedRead};
pub use store::memory::MemoryStore;
pub use store::sqlite::SqliteStore;
pub use store::{KeyValueStore, StoreError, StoreResult};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
