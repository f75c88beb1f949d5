use chrono::{DateTime, Duration, TimeZone, Utc};
use setweek_core::{
    week_start, AddItemOutcome, AddRejection, AdjustOutcome, ConfigError, CorruptStateError,
    GoalStatus, ItemId, KeyValueStore, MemoryStore, RemoveOutcome, ResetReason, StoreError,
    StoreResult, TrackerConfig, WeekTracker,
};

const DATASET_KEY: &str = "setweek.dataset";
const MARKER_KEY: &str = "setweek.week_start";

fn monday() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 7, 15, 0).unwrap()
}

fn open(store: MemoryStore, now: &DateTime<Utc>) -> WeekTracker<MemoryStore> {
    WeekTracker::open(store, TrackerConfig::default(), now).unwrap()
}

fn id_of(tracker: &WeekTracker<MemoryStore>, name: &str) -> ItemId {
    tracker.find_by_name(name).unwrap().id.clone()
}

fn stored(tracker: &WeekTracker<MemoryStore>, key: &str) -> Option<String> {
    tracker.store().get(key).unwrap()
}

/// Store whose writes (and optionally reads) always fail.
#[derive(Default)]
struct BrokenStore {
    fail_reads: bool,
    write_attempts: usize,
}

impl KeyValueStore for BrokenStore {
    fn get(&self, _key: &str) -> StoreResult<Option<String>> {
        if self.fail_reads {
            return Err(StoreError::Backend("disk unplugged".to_string()));
        }
        Ok(None)
    }

    fn set(&mut self, _key: &str, _value: &str) -> StoreResult<()> {
        self.write_attempts += 1;
        Err(StoreError::Backend("read-only".to_string()))
    }
}

#[test]
fn first_run_seeds_and_writes_both_keys() {
    let tracker = open(MemoryStore::new(), &monday());

    assert_eq!(tracker.load_report().reset, Some(ResetReason::FirstRun));
    let names: Vec<&str> = tracker.items().iter().map(|item| item.name.as_str()).collect();
    assert_eq!(names, ["Chest", "Back", "Legs", "Shoulders"]);
    assert!(tracker.items().iter().all(|item| item.sets == 0));

    let marker = week_start(&monday()).as_millis().to_string();
    assert_eq!(stored(&tracker, MARKER_KEY), Some(marker));
    let dataset = stored(&tracker, DATASET_KEY).unwrap();
    assert_eq!(dataset, serde_json::to_string(tracker.dataset()).unwrap());
}

#[test]
fn chest_scenario_saturates_at_zero() {
    let mut tracker = open(MemoryStore::new(), &monday());
    let chest = id_of(&tracker, "Chest");

    for _ in 0..5 {
        tracker.adjust_sets(&chest, 1);
    }
    assert_eq!(tracker.item(&chest).unwrap().sets, 5);

    assert_eq!(
        tracker.adjust_sets(&chest, -10),
        AdjustOutcome::Adjusted { sets: 0 }
    );
    assert_eq!(tracker.item(&chest).unwrap().sets, 0);
}

#[test]
fn every_mutation_is_persisted_without_touching_the_marker() {
    let mut tracker = open(MemoryStore::new(), &monday());
    let marker_before = stored(&tracker, MARKER_KEY);
    let legs = id_of(&tracker, "Legs");

    tracker.increment(&legs);
    tracker.increment(&legs);
    tracker.decrement(&legs);
    let AddItemOutcome::Added(arms) = tracker.add_item("Arms") else {
        panic!("Arms should be added");
    };
    let back = id_of(&tracker, "Back");
    tracker.remove_item(&back);

    let persisted: serde_json::Value =
        serde_json::from_str(&stored(&tracker, DATASET_KEY).unwrap()).unwrap();
    let names: Vec<&str> = persisted
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Chest", "Legs", "Shoulders", "Arms"]);
    assert_eq!(persisted[1]["sets"], 1);
    assert_eq!(persisted[3]["id"], arms.as_str());

    assert_eq!(stored(&tracker, MARKER_KEY), marker_before);
    assert!(tracker.last_persist_error().is_none());
}

#[test]
fn restart_in_same_week_continues_with_saved_sets() {
    let mut tracker = open(MemoryStore::new(), &monday());
    let shoulders = id_of(&tracker, "Shoulders");
    tracker.adjust_sets(&shoulders, 12);
    let store = tracker.into_store();

    let sunday_night = monday() + Duration::days(6) + Duration::hours(16);
    let reopened = open(store, &sunday_night);

    assert!(!reopened.load_report().did_reset());
    assert_eq!(reopened.item(&shoulders).unwrap().sets, 12);
    assert_eq!(reopened.goal_status(&shoulders), Some(GoalStatus::Within));
}

#[test]
fn restart_next_week_rolls_over_to_seed() {
    let mut tracker = open(MemoryStore::new(), &monday());
    let chest = id_of(&tracker, "Chest");
    tracker.adjust_sets(&chest, 9);
    tracker.add_item("Calves");
    let first_marker = tracker.marker();
    let store = tracker.into_store();

    let next_wednesday = monday() + Duration::days(9);
    let reopened = open(store, &next_wednesday);

    assert_eq!(
        reopened.load_report().reset,
        Some(ResetReason::MarkerMismatch {
            stored: first_marker,
            current: week_start(&next_wednesday),
        })
    );
    assert_eq!(reopened.items().len(), 4);
    assert!(reopened.find_by_name("Calves").is_none());
    assert!(reopened.items().iter().all(|item| item.sets == 0));
    assert_eq!(
        stored(&reopened, MARKER_KEY),
        Some(week_start(&next_wednesday).as_millis().to_string())
    );
}

#[test]
fn mutations_never_move_the_week() {
    let mut tracker = open(MemoryStore::new(), &monday());
    let marker = tracker.marker();
    let chest = id_of(&tracker, "Chest");

    // Running past Sunday without a reload keeps the loaded week.
    for _ in 0..20 {
        tracker.increment(&chest);
    }
    assert_eq!(tracker.marker(), marker);
    assert_eq!(tracker.goal_status(&chest), Some(GoalStatus::Within));

    let report = tracker.reload(&(monday() + Duration::days(7))).unwrap().clone();
    assert!(report.did_reset());
    assert_ne!(tracker.marker(), marker);
    assert_eq!(tracker.item(&chest), None);
}

#[test]
fn corrupt_dataset_in_store_resets_and_repairs_storage() {
    let marker = week_start(&monday()).as_millis().to_string();
    let store = MemoryStore::with_entries([
        (DATASET_KEY, "{corrupted".to_string()),
        (MARKER_KEY, marker.clone()),
    ]);

    let tracker = open(store, &monday());
    assert!(matches!(
        tracker.load_report().reset,
        Some(ResetReason::Corrupt(CorruptStateError::DatasetJson(_)))
    ));
    assert_eq!(tracker.items().len(), 4);

    let repaired = stored(&tracker, DATASET_KEY).unwrap();
    assert!(repaired.starts_with('['));
    assert_eq!(stored(&tracker, MARKER_KEY), Some(marker));
}

#[test]
fn rejected_and_missing_operations_leave_dataset_unchanged() {
    let mut tracker = open(MemoryStore::new(), &monday());
    let before = tracker.dataset().clone();
    let ghost = ItemId::from_raw("ghost");

    assert_eq!(
        tracker.add_item("  chest "),
        AddItemOutcome::Rejected(AddRejection::DuplicateName)
    );
    assert_eq!(
        tracker.add_item(""),
        AddItemOutcome::Rejected(AddRejection::EmptyName)
    );
    assert_eq!(tracker.adjust_sets(&ghost, 3), AdjustOutcome::NotFound);
    assert_eq!(tracker.remove_item(&ghost), RemoveOutcome::NotFound);
    assert_eq!(tracker.dataset(), &before);
}

#[test]
fn removing_every_item_is_allowed_and_persisted() {
    let mut tracker = open(MemoryStore::new(), &monday());
    let ids: Vec<ItemId> = tracker.items().iter().map(|item| item.id.clone()).collect();
    for id in &ids {
        assert!(matches!(tracker.remove_item(id), RemoveOutcome::Removed(_)));
    }

    assert!(tracker.dataset().is_empty());
    assert_eq!(stored(&tracker, DATASET_KEY).as_deref(), Some("[]"));

    // An empty list is still this week's valid state.
    let reopened = open(tracker.into_store(), &(monday() + Duration::days(1)));
    assert!(!reopened.load_report().did_reset());
    assert!(reopened.dataset().is_empty());
}

#[test]
fn storage_failures_are_recorded_not_raised() {
    let store = BrokenStore {
        fail_reads: true,
        ..BrokenStore::default()
    };
    let mut tracker = WeekTracker::open(store, TrackerConfig::default(), &monday()).unwrap();

    assert!(matches!(
        tracker.load_report().reset,
        Some(ResetReason::Corrupt(CorruptStateError::ReadFailed { .. }))
    ));
    assert!(tracker.last_persist_error().unwrap().contains("read-only"));

    let chest = tracker.find_by_name("Chest").unwrap().id.clone();
    assert_eq!(
        tracker.increment(&chest),
        AdjustOutcome::Adjusted { sets: 1 }
    );
    assert!(tracker.flush().is_err());
    // reset write-back, one mutation, one flush
    assert_eq!(tracker.store().write_attempts, 3);
}

#[test]
fn custom_config_drives_seed_keys_and_goals() {
    let config = TrackerConfig {
        min_goal: 3,
        max_goal: 5,
        default_seed: vec!["Glutes".to_string(), "Core".to_string()],
        dataset_key: "ds".to_string(),
        marker_key: "wk".to_string(),
    };
    let mut tracker = WeekTracker::open(MemoryStore::new(), config, &monday()).unwrap();
    let glutes = tracker.find_by_name("glutes").unwrap().id.clone();

    assert_eq!(tracker.goal_status(&glutes), Some(GoalStatus::Below));
    tracker.adjust_sets(&glutes, 6);
    assert_eq!(tracker.goal_status(&glutes), Some(GoalStatus::Above));

    assert!(tracker.store().get("ds").unwrap().is_some());
    assert!(tracker.store().get("wk").unwrap().is_some());
    assert!(tracker.store().get(DATASET_KEY).unwrap().is_none());
}

#[test]
fn invalid_config_is_rejected_at_open() {
    let config = TrackerConfig {
        min_goal: 30,
        max_goal: 5,
        ..TrackerConfig::default()
    };
    let err = WeekTracker::open(MemoryStore::new(), config, &monday())
        .err()
        .unwrap();
    assert!(matches!(err, ConfigError::InvalidGoalRange { .. }));
}
