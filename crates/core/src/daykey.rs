//! Canonical calendar-day keys.
//!
//! Completion lookups compare days, never instants: a completion at 07:00
//! and one at 23:59 on the same local day must land on the same key.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::models::Completed;

/// A `YYYY-MM-DD` key for one calendar day in a given timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayKey(NaiveDate);

impl DayKey {
    /// Key for a calendar date that is already local.
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date)
    }

    /// The local calendar date this key names.
    pub fn date(self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Normalize an instant to the calendar day it falls on in `tz`.
pub fn to_day_key<Tz: TimeZone>(instant: &DateTime<Utc>, tz: &Tz) -> DayKey {
    DayKey(instant.with_timezone(tz).date_naive())
}

/// Collect the set of days on which any entry was completed.
///
/// Entries whose timestamp does not parse are skipped here; the display
/// layer renders them as "Unknown date".
pub fn day_keys<E, Tz>(entries: &[E], tz: &Tz) -> HashSet<DayKey>
where
    E: Completed,
    Tz: TimeZone,
{
    entries
        .iter()
        .filter_map(|entry| entry.completed_at().parse())
        .map(|instant| to_day_key(&instant, tz))
        .collect()
}
