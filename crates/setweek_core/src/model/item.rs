//! Tracked item domain model.
//!
//! # Responsibility
//! - Define the per-body-part counter record persisted in the dataset blob.
//! - Provide the name normalization shared by lookups and duplicate checks.
//!
//! # Invariants
//! - `id` is stable for the item lifetime and never reused within a dataset.
//! - `name` is stored trimmed and is never empty.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of one tracked item.
///
/// Serialized as a bare string so persisted blobs stay `{id, name, sets}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wraps an identifier that already exists externally.
    pub fn from_raw(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for ItemId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One body part and the number of sets performed this week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedItem {
    pub id: ItemId,
    /// Display name, already trimmed.
    pub name: String,
    /// Sets performed in the current week.
    pub sets: u32,
}

impl TrackedItem {
    /// Creates a zeroed item with a generated id.
    ///
    /// The caller is responsible for passing a trimmed, non-empty name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ItemId::generate(),
            name: name.into(),
            sets: 0,
        }
    }

    /// Applies a signed delta, saturating at zero and at `u32::MAX`.
    pub fn apply_delta(&mut self, delta: i64) {
        let next = i64::from(self.sets).saturating_add(delta);
        self.sets = u32::try_from(next.max(0)).unwrap_or(u32::MAX);
    }

    /// Returns whether `name` refers to this item under case-insensitive
    /// comparison of trimmed text.
    pub fn matches_name(&self, name: &str) -> bool {
        name_key(&self.name) == name_key(name)
    }
}

/// Canonical comparison key for item names.
pub(crate) fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::{ItemId, TrackedItem};

    #[test]
    fn generated_ids_are_distinct() {
        assert_ne!(ItemId::generate(), ItemId::generate());
    }

    #[test]
    fn apply_delta_saturates_at_both_ends() {
        let mut item = TrackedItem::new("Chest");
        item.apply_delta(-3);
        assert_eq!(item.sets, 0);

        item.sets = u32::MAX - 1;
        item.apply_delta(10);
        assert_eq!(item.sets, u32::MAX);

        item.apply_delta(i64::MIN);
        assert_eq!(item.sets, 0);
    }

    #[test]
    fn matches_name_ignores_case_and_padding() {
        let item = TrackedItem::new("Shoulders");
        assert!(item.matches_name("  shoulders "));
        assert!(item.matches_name("SHOULDERS"));
        assert!(!item.matches_name("Shoulder"));
    }

    #[test]
    fn id_serializes_as_plain_string() {
        let item = TrackedItem {
            id: ItemId::from_raw("abc"),
            name: "Back".to_string(),
            sets: 2,
        };
        let json = serde_json::to_string(&item).unwrap();
        assert_eq!(json, r#"{"id":"abc","name":"Back","sets":2}"#);
    }
}
