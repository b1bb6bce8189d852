//! Time entry records.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};

/// Identifier assigned to a time entry by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId(i64);

impl EntryId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An interval of worked time.
///
/// An entry with no `end` is open: work is still in progress. The store never
/// checks that `end >= start`, so a closed entry may have a negative duration
/// when the clock moved backwards between start and stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeEntry {
    pub id: EntryId,
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
}

impl TimeEntry {
    pub const fn is_open(&self) -> bool {
        self.end.is_none()
    }

    /// Returns `end - start`, or `None` while the entry is open.
    pub fn duration(&self) -> Option<TimeDelta> {
        self.end.map(|end| end - self.start)
    }

    /// Returns a copy of this entry closed at `end`.
    #[must_use]
    pub fn closed_at(&self, end: DateTime<Utc>) -> Self {
        Self {
            id: self.id,
            start: self.start,
            end: Some(end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;

    #[test]
    fn open_entry_has_no_duration() {
        let entry = TimeEntry {
            id: EntryId::new(1),
            start: Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap(),
            end: None,
        };
        assert!(entry.is_open());
        assert_eq!(entry.duration(), None);
    }

    #[test]
    fn closing_keeps_start_and_sets_end() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 1, 12, 30, 0).unwrap();
        let entry = TimeEntry {
            id: EntryId::new(7),
            start,
            end: None,
        };

        let closed = entry.closed_at(end);
        assert_eq!(closed.id, EntryId::new(7));
        assert_eq!(closed.start, start);
        assert!(!closed.is_open());
        assert_eq!(closed.duration(), Some(TimeDelta::minutes(270)));
    }

    #[test]
    fn end_before_start_yields_negative_duration() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 5).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
        let entry = TimeEntry {
            id: EntryId::new(1),
            start,
            end: Some(end),
        };
        assert_eq!(entry.duration(), Some(TimeDelta::seconds(-5)));
    }
}
