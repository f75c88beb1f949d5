//! Ordered collection of tracked items for one week.
//!
//! # Responsibility
//! - Own the display-ordered list of tracked items.
//! - Provide total mutation operations (add/adjust/remove) that report
//!   rejections as outcome values instead of errors.
//!
//! # Invariants
//! - Insertion order is display order and is preserved by every mutation.
//! - No two items share a case-insensitive trimmed name.
//! - No two items share an id.

use crate::model::item::{name_key, ItemId, TrackedItem};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type DatasetResult<T> = Result<T, DatasetValidationError>;

/// Structural violation found while validating a dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetValidationError {
    EmptyName { index: usize },
    UntrimmedName { index: usize },
    DuplicateName(String),
    EmptyId { index: usize },
    DuplicateId(ItemId),
}

impl Display for DatasetValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName { index } => write!(f, "item at position {index} has an empty name"),
            Self::UntrimmedName { index } => {
                write!(f, "item at position {index} has surrounding whitespace in its name")
            }
            Self::DuplicateName(name) => write!(f, "duplicate item name `{name}`"),
            Self::EmptyId { index } => write!(f, "item at position {index} has an empty id"),
            Self::DuplicateId(id) => write!(f, "duplicate item id `{id}`"),
        }
    }
}

impl Error for DatasetValidationError {}

/// Why `add_item` left the dataset unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddRejection {
    EmptyName,
    DuplicateName,
}

/// Result of `Dataset::add_item`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddItemOutcome {
    Added(ItemId),
    Rejected(AddRejection),
}

/// Result of `Dataset::adjust_sets`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjustOutcome {
    Adjusted { sets: u32 },
    NotFound,
}

/// Result of `Dataset::remove_item`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed(TrackedItem),
    NotFound,
}

/// The week's tracked items, in display order.
///
/// Serialized as a bare JSON array of `{id, name, sets}` records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    items: Vec<TrackedItem>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a zeroed dataset from seed names, generating fresh ids.
    ///
    /// Names are trimmed before use.
    ///
    /// # Errors
    /// - Returns `EmptyName` for a blank seed entry.
    /// - Returns `DuplicateName` for case-insensitive repeats.
    pub fn from_names<I, S>(names: I) -> DatasetResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let items = names
            .into_iter()
            .map(|name| TrackedItem::new(name.as_ref().trim()))
            .collect();
        Self::from_items(items)
    }

    /// Wraps already-built items after validating them.
    pub fn from_items(items: Vec<TrackedItem>) -> DatasetResult<Self> {
        let dataset = Self { items };
        dataset.validate()?;
        Ok(dataset)
    }

    /// Checks the dataset invariants.
    ///
    /// Deserialization does not run this; callers reading persisted blobs
    /// must call it before trusting the data.
    pub fn validate(&self) -> DatasetResult<()> {
        let mut names = HashSet::with_capacity(self.items.len());
        let mut ids = HashSet::with_capacity(self.items.len());

        for (index, item) in self.items.iter().enumerate() {
            if item.name.trim().is_empty() {
                return Err(DatasetValidationError::EmptyName { index });
            }
            if item.name.trim() != item.name {
                return Err(DatasetValidationError::UntrimmedName { index });
            }
            if item.id.as_str().trim().is_empty() {
                return Err(DatasetValidationError::EmptyId { index });
            }
            if !names.insert(name_key(&item.name)) {
                return Err(DatasetValidationError::DuplicateName(item.name.clone()));
            }
            if !ids.insert(&item.id) {
                return Err(DatasetValidationError::DuplicateId(item.id.clone()));
            }
        }

        Ok(())
    }

    pub fn items(&self) -> &[TrackedItem] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrackedItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &ItemId) -> Option<&TrackedItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Looks an item up by case-insensitive trimmed name.
    pub fn find_by_name(&self, name: &str) -> Option<&TrackedItem> {
        self.items.iter().find(|item| item.matches_name(name))
    }

    /// Appends a zeroed item named `name` (trimmed).
    ///
    /// # Contract
    /// - Blank names are rejected with `AddRejection::EmptyName`.
    /// - Case-insensitive duplicates are rejected with
    ///   `AddRejection::DuplicateName`.
    /// - A rejected call leaves the dataset untouched.
    pub fn add_item(&mut self, name: &str) -> AddItemOutcome {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return AddItemOutcome::Rejected(AddRejection::EmptyName);
        }
        if self.find_by_name(trimmed).is_some() {
            return AddItemOutcome::Rejected(AddRejection::DuplicateName);
        }

        let mut item = TrackedItem::new(trimmed);
        // Ids stay unique even on a v4 collision.
        while self.get(&item.id).is_some() {
            item.id = ItemId::generate();
        }
        let id = item.id.clone();
        self.items.push(item);
        AddItemOutcome::Added(id)
    }

    /// Adds `delta` to the matching item's sets, flooring at zero.
    pub fn adjust_sets(&mut self, id: &ItemId, delta: i64) -> AdjustOutcome {
        match self.items.iter_mut().find(|item| &item.id == id) {
            Some(item) => {
                item.apply_delta(delta);
                AdjustOutcome::Adjusted { sets: item.sets }
            }
            None => AdjustOutcome::NotFound,
        }
    }

    /// Removes the matching item, keeping the order of the rest.
    pub fn remove_item(&mut self, id: &ItemId) -> RemoveOutcome {
        match self.items.iter().position(|item| &item.id == id) {
            Some(index) => RemoveOutcome::Removed(self.items.remove(index)),
            None => RemoveOutcome::NotFound,
        }
    }
}
