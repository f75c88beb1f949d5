//! Single-owner handle over the persisted weekly dataset.
//!
//! # Responsibility
//! - Run the load flow once at open: read both keys, decide continue/reset,
//!   and write reset state back immediately.
//! - Apply item mutations and persist the dataset after every one of them.
//!
//! # Invariants
//! - The marker changes only through the load flow (`open`/`reload`), never
//!   through a mutation.
//! - Every mutation call issues exactly one dataset write, even when the
//!   mutation was a no-op.
//! - Storage failures are logged and recorded, never raised from mutations.

use crate::config::{ConfigResult, GoalStatus, TrackerConfig};
use crate::epoch::{week_start, EpochMarker};
use crate::model::dataset::{AddItemOutcome, AdjustOutcome, Dataset, RemoveOutcome};
use crate::model::item::{ItemId, TrackedItem};
use crate::service::lifecycle::{decide, LoadOutcome, ResetReason};
use crate::store::codec::{
    decode_dataset, decode_marker, encode_dataset, encode_marker, CorruptStateError,
    PersistedRead,
};
use crate::store::{KeyValueStore, StoreResult};
use chrono::{DateTime, TimeZone};
use log::{debug, error, info, warn};

/// Summary of the most recent load flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub marker: EpochMarker,
    pub reset: Option<ResetReason>,
}

impl LoadReport {
    pub fn did_reset(&self) -> bool {
        self.reset.is_some()
    }
}

/// Owner of the current week's dataset and its backing store.
///
/// Holding the store by value keeps a single load flow per store.
pub struct WeekTracker<S: KeyValueStore> {
    store: S,
    config: TrackerConfig,
    dataset: Dataset,
    last_load: LoadReport,
    last_persist_error: Option<String>,
}

impl<S: KeyValueStore> WeekTracker<S> {
    /// Opens the tracker, loading this week's state or starting a new week.
    ///
    /// # Errors
    /// - Returns `ConfigError` when `config` fails validation. Storage
    ///   problems never fail the open; they reset to the default seed.
    pub fn open<Tz: TimeZone>(
        store: S,
        config: TrackerConfig,
        now: &DateTime<Tz>,
    ) -> ConfigResult<Self> {
        config.validate()?;
        let mut tracker = Self {
            store,
            config,
            dataset: Dataset::new(),
            last_load: LoadReport {
                marker: EpochMarker::from_millis(0),
                reset: None,
            },
            last_persist_error: None,
        };
        tracker.run_load(now)?;
        Ok(tracker)
    }

    /// Re-runs the load flow against the store, as a restart would.
    ///
    /// This is the only way the tracker moves to a new week.
    pub fn reload<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> ConfigResult<&LoadReport> {
        self.run_load(now)?;
        Ok(&self.last_load)
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn items(&self) -> &[TrackedItem] {
        self.dataset.items()
    }

    pub fn item(&self, id: &ItemId) -> Option<&TrackedItem> {
        self.dataset.get(id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&TrackedItem> {
        self.dataset.find_by_name(name)
    }

    /// Marker of the week the loaded dataset belongs to.
    pub fn marker(&self) -> EpochMarker {
        self.last_load.marker
    }

    pub fn load_report(&self) -> &LoadReport {
        &self.last_load
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Releases the store, e.g. to reopen it later.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Goal classification of one item's current sets.
    pub fn goal_status(&self, id: &ItemId) -> Option<GoalStatus> {
        self.item(id).map(|item| self.config.goal_status(item.sets))
    }

    /// Error of the latest failed write, cleared by the next successful one.
    pub fn last_persist_error(&self) -> Option<&str> {
        self.last_persist_error.as_deref()
    }

    /// Appends a new zeroed item, then persists.
    pub fn add_item(&mut self, name: &str) -> AddItemOutcome {
        let outcome = self.dataset.add_item(name);
        debug!("event=item_add module=service outcome={outcome:?}");
        self.persist_after("add_item");
        outcome
    }

    /// Adds `delta` to an item's sets (floored at zero), then persists.
    pub fn adjust_sets(&mut self, id: &ItemId, delta: i64) -> AdjustOutcome {
        let outcome = self.dataset.adjust_sets(id, delta);
        debug!("event=item_adjust module=service delta={delta} outcome={outcome:?}");
        self.persist_after("adjust_sets");
        outcome
    }

    pub fn increment(&mut self, id: &ItemId) -> AdjustOutcome {
        self.adjust_sets(id, 1)
    }

    pub fn decrement(&mut self, id: &ItemId) -> AdjustOutcome {
        self.adjust_sets(id, -1)
    }

    /// Removes an item if present, then persists.
    pub fn remove_item(&mut self, id: &ItemId) -> RemoveOutcome {
        let outcome = self.dataset.remove_item(id);
        debug!(
            "event=item_remove module=service removed={}",
            matches!(outcome, RemoveOutcome::Removed(_))
        );
        self.persist_after("remove_item");
        outcome
    }

    /// Writes the dataset now and reports any storage error to the caller.
    pub fn flush(&mut self) -> StoreResult<()> {
        let result = self.write_dataset();
        self.record_write("flush", result)
    }

    fn run_load<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> ConfigResult<()> {
        let seed = self.config.seed_dataset()?;
        let marker_read = self.read_key(&self.config.marker_key, decode_marker);
        let dataset_read = self.read_key(&self.config.dataset_key, decode_dataset);
        let current = week_start(now);

        let LoadOutcome {
            dataset,
            marker,
            reset,
        } = decide(current, marker_read, dataset_read, &seed);

        match &reset {
            None => info!(
                "event=tracker_load module=service status=ok outcome=continue week_start={} items={}",
                marker,
                dataset.len()
            ),
            Some(reason) => warn!(
                "event=tracker_load module=service status=ok outcome=reset week_start={} reason={}",
                marker, reason
            ),
        }

        let did_reset = reset.is_some();
        self.dataset = dataset;
        self.last_load = LoadReport { marker, reset };

        if did_reset {
            let result = self.write_all();
            // A failed write-back is recorded; the seeded dataset stays usable.
            let _ = self.record_write("reset", result);
        }

        Ok(())
    }

    fn read_key<T>(
        &self,
        key: &str,
        decode: fn(Option<&str>) -> PersistedRead<T>,
    ) -> PersistedRead<T> {
        match self.store.get(key) {
            Ok(raw) => decode(raw.as_deref()),
            Err(err) => {
                error!("event=tracker_read module=service status=error key={key} error={err}");
                PersistedRead::Corrupt(CorruptStateError::ReadFailed {
                    key: key.to_string(),
                    message: err.to_string(),
                })
            }
        }
    }

    fn write_all(&mut self) -> StoreResult<()> {
        let dataset_json = encode_dataset(&self.dataset)?;
        let marker_text = encode_marker(self.last_load.marker);
        self.store.set_many(&[
            (self.config.dataset_key.as_str(), dataset_json.as_str()),
            (self.config.marker_key.as_str(), marker_text.as_str()),
        ])
    }

    fn write_dataset(&mut self) -> StoreResult<()> {
        let dataset_json = encode_dataset(&self.dataset)?;
        self.store.set(&self.config.dataset_key, &dataset_json)
    }

    fn persist_after(&mut self, op: &str) {
        let result = self.write_dataset();
        let _ = self.record_write(op, result);
    }

    fn record_write(&mut self, op: &str, result: StoreResult<()>) -> StoreResult<()> {
        match result {
            Ok(()) => {
                self.last_persist_error = None;
                debug!("event=tracker_persist module=service status=ok op={op}");
                Ok(())
            }
            Err(err) => {
                error!("event=tracker_persist module=service status=error op={op} error={err}");
                self.last_persist_error = Some(err.to_string());
                Err(err)
            }
        }
    }
}
