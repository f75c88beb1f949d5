//! Continue-or-reset decision for persisted weekly state.
//!
//! # Responsibility
//! - Compare the persisted week marker with the week of "now".
//! - Return either the persisted dataset or the default seed, together with
//!   the reason a reset happened.
//!
//! # Invariants
//! - The returned marker is always `week_start(now)`.
//! - Persisted state is kept only when both the marker and the dataset are
//!   present, well-formed, and the marker equals the current week.
//! - Corruption never escapes as an error; it selects the reset branch.

use crate::epoch::{week_start, EpochMarker};
use crate::model::dataset::Dataset;
use crate::store::codec::{decode_dataset, decode_marker, CorruptStateError, PersistedRead};
use chrono::{DateTime, TimeZone};
use std::fmt::{Display, Formatter};

/// Which half of the persisted pair was absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingPart {
    Marker,
    Dataset,
}

/// Why persisted state was replaced by the default seed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetReason {
    /// Neither key was ever written.
    FirstRun,
    /// Only one of the two keys exists.
    Incomplete(MissingPart),
    /// The stored state belongs to another week.
    MarkerMismatch {
        stored: EpochMarker,
        current: EpochMarker,
    },
    /// A stored value could not be read or decoded.
    Corrupt(CorruptStateError),
}

impl Display for ResetReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FirstRun => f.write_str("first_run"),
            Self::Incomplete(MissingPart::Marker) => f.write_str("missing_marker"),
            Self::Incomplete(MissingPart::Dataset) => f.write_str("missing_dataset"),
            Self::MarkerMismatch { stored, current } => {
                write!(f, "week_rollover stored={stored} current={current}")
            }
            Self::Corrupt(err) => write!(f, "corrupt ({err})"),
        }
    }
}

/// Result of the load flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOutcome {
    pub dataset: Dataset,
    pub marker: EpochMarker,
    /// `Some` when the default seed replaced persisted state.
    pub reset: Option<ResetReason>,
}

impl LoadOutcome {
    pub fn did_reset(&self) -> bool {
        self.reset.is_some()
    }
}

/// Decides between persisted state and the default seed from raw stored
/// strings.
///
/// On reset the caller must write the returned dataset and marker back to
/// storage before accepting mutations.
pub fn load_or_reset<Tz: TimeZone>(
    now: &DateTime<Tz>,
    persisted_marker: Option<&str>,
    persisted_dataset: Option<&str>,
    default_seed: &Dataset,
) -> LoadOutcome {
    decide(
        week_start(now),
        decode_marker(persisted_marker),
        decode_dataset(persisted_dataset),
        default_seed,
    )
}

/// Same decision as `load_or_reset`, over already-decoded reads.
///
/// Reason precedence: corrupt dataset, corrupt marker, absence, then week
/// mismatch.
pub fn decide(
    current: EpochMarker,
    marker: PersistedRead<EpochMarker>,
    dataset: PersistedRead<Dataset>,
    default_seed: &Dataset,
) -> LoadOutcome {
    let reason = match (marker, dataset) {
        (_, PersistedRead::Corrupt(err)) | (PersistedRead::Corrupt(err), _) => {
            ResetReason::Corrupt(err)
        }
        (PersistedRead::Missing, PersistedRead::Missing) => ResetReason::FirstRun,
        (PersistedRead::Missing, PersistedRead::Present(_)) => {
            ResetReason::Incomplete(MissingPart::Marker)
        }
        (PersistedRead::Present(_), PersistedRead::Missing) => {
            ResetReason::Incomplete(MissingPart::Dataset)
        }
        (PersistedRead::Present(stored), PersistedRead::Present(dataset)) => {
            if stored == current {
                return LoadOutcome {
                    dataset,
                    marker: current,
                    reset: None,
                };
            }
            ResetReason::MarkerMismatch { stored, current }
        }
    };

    LoadOutcome {
        dataset: default_seed.clone(),
        marker: current,
        reset: Some(reason),
    }
}
