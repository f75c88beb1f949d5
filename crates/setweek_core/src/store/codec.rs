//! Encoding and decoding of persisted tracker blobs.
//!
//! # Responsibility
//! - Serialize the dataset as a JSON array of `{id, name, sets}` and the week
//!   marker as a decimal integer string.
//! - Turn raw stored strings into explicit `PersistedRead` values.
//!
//! # Invariants
//! - A decoded `Present` dataset always satisfies `Dataset::validate()`.
//! - Decoding is total: malformed input yields `Corrupt`, never a panic.

use crate::epoch::EpochMarker;
use crate::logging::single_line;
use crate::model::dataset::{Dataset, DatasetValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Why a persisted blob could not be trusted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorruptStateError {
    /// The adapter failed while reading the key.
    ReadFailed { key: String, message: String },
    /// The marker is not a decimal integer.
    MarkerNotInteger(String),
    /// The dataset is not a JSON array of `{id, name, sets}` records.
    DatasetJson(String),
    /// The dataset parsed but breaks a dataset invariant.
    DatasetInvalid(DatasetValidationError),
}

impl Display for CorruptStateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReadFailed { key, message } => write!(f, "failed to read `{key}`: {message}"),
            Self::MarkerNotInteger(raw) => write!(f, "week marker `{raw}` is not an integer"),
            Self::DatasetJson(message) => write!(f, "dataset is not valid JSON: {message}"),
            Self::DatasetInvalid(err) => write!(f, "dataset is invalid: {err}"),
        }
    }
}

impl Error for CorruptStateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::DatasetInvalid(err) => Some(err),
            _ => None,
        }
    }
}

/// Outcome of reading one persisted value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistedRead<T> {
    Missing,
    Present(T),
    Corrupt(CorruptStateError),
}

impl<T> PersistedRead<T> {
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    pub fn present(self) -> Option<T> {
        match self {
            Self::Present(value) => Some(value),
            _ => None,
        }
    }
}

pub fn encode_marker(marker: EpochMarker) -> String {
    marker.as_millis().to_string()
}

/// Serializes the dataset blob.
///
/// Serialization of a `Dataset` only fails on non-string map keys, which the
/// model does not contain; the error is still propagated.
pub fn encode_dataset(dataset: &Dataset) -> serde_json::Result<String> {
    serde_json::to_string(dataset)
}

/// Decodes a raw marker value. Surrounding whitespace is ignored.
pub fn decode_marker(raw: Option<&str>) -> PersistedRead<EpochMarker> {
    let Some(raw) = raw else {
        return PersistedRead::Missing;
    };
    match raw.trim().parse::<i64>() {
        Ok(millis) => PersistedRead::Present(EpochMarker::from_millis(millis)),
        Err(_) => PersistedRead::Corrupt(CorruptStateError::MarkerNotInteger(truncate(raw))),
    }
}

/// Decodes and validates a raw dataset blob.
pub fn decode_dataset(raw: Option<&str>) -> PersistedRead<Dataset> {
    let Some(raw) = raw else {
        return PersistedRead::Missing;
    };
    let dataset = match serde_json::from_str::<Dataset>(raw) {
        Ok(dataset) => dataset,
        Err(err) => {
            return PersistedRead::Corrupt(CorruptStateError::DatasetJson(err.to_string()));
        }
    };
    match dataset.validate() {
        Ok(()) => PersistedRead::Present(dataset),
        Err(err) => PersistedRead::Corrupt(CorruptStateError::DatasetInvalid(err)),
    }
}

const MAX_ECHO_CHARS: usize = 64;

// Corrupt values end up in logs.
fn truncate(raw: &str) -> String {
    single_line(raw, MAX_ECHO_CHARS)
}
