//! Week epoch calculator.
//!
//! # Responsibility
//! - Map any instant to the canonical start of its ISO week: Monday,
//!   00:00:00.000 local time in the instant's own time zone.
//! - Represent that boundary as an integer marker suitable for persistence.
//!
//! # Invariants
//! - Pure: the result depends only on the instant and its time zone.
//! - Sunday belongs to the week that started on the preceding Monday.
//! - `week_start` of a marker's own instant returns the same marker.

use chrono::{
    DateTime, Datelike, Days, Duration, FixedOffset, Local, LocalResult, NaiveDateTime, NaiveTime,
    Offset, TimeZone,
};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Unix epoch milliseconds of a week's Monday-midnight boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EpochMarker(i64);

impl EpochMarker {
    /// Wraps a raw millisecond value read back from storage.
    pub fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    pub fn as_millis(self) -> i64 {
        self.0
    }

    /// Returns the boundary instant rendered in `tz`.
    pub fn to_datetime<Tz: TimeZone>(self, tz: &Tz) -> Option<DateTime<Tz>> {
        tz.timestamp_millis_opt(self.0).single()
    }
}

impl Display for EpochMarker {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Returns the marker of the week containing `instant`.
///
/// Midnight is resolved in `instant`'s time zone:
/// - an ambiguous midnight (clock rolled back) resolves to the earliest instant;
/// - a skipped midnight (clock jumped forward) is read with the offset in
///   force before the gap, which yields the first instant after the jump.
pub fn week_start<Tz: TimeZone>(instant: &DateTime<Tz>) -> EpochMarker {
    let local_date = instant.date_naive();
    let back = u64::from(local_date.weekday().num_days_from_monday());
    // Only the minimum representable date lacks a preceding Monday.
    let monday = local_date
        .checked_sub_days(Days::new(back))
        .unwrap_or(local_date);
    let midnight = monday.and_time(NaiveTime::MIN);

    let millis = match instant.timezone().from_local_datetime(&midnight) {
        LocalResult::Single(start) => start.timestamp_millis(),
        LocalResult::Ambiguous(earliest, _) => earliest.timestamp_millis(),
        LocalResult::None => {
            let tz = instant.timezone();
            let before_gap = midnight
                .checked_sub_signed(Duration::days(1))
                .and_then(|day_before| tz.offset_from_local_datetime(&day_before).earliest())
                .map(|offset| offset.fix())
                .unwrap_or_else(|| instant.offset().fix());
            millis_at_offset(midnight, before_gap)
        }
    };

    EpochMarker(millis)
}

fn millis_at_offset(local: NaiveDateTime, offset: FixedOffset) -> i64 {
    (local - Duration::seconds(i64::from(offset.local_minus_utc())))
        .and_utc()
        .timestamp_millis()
}

/// Returns the marker of the week containing `now` in the host time zone.
pub fn week_start_local(now: &DateTime<Local>) -> EpochMarker {
    week_start(now)
}

/// Returns the marker of the week containing the epoch-millisecond instant
/// `millis`, viewed in `tz`.
///
/// Returns `None` when `millis` is outside chrono's representable range.
pub fn week_start_millis<Tz: TimeZone>(millis: i64, tz: &Tz) -> Option<EpochMarker> {
    tz.timestamp_millis_opt(millis)
        .single()
        .map(|instant| week_start(&instant))
}
