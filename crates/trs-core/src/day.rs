//! Daily aggregation of worked time.
//!
//! A day runs from local midnight to the next local midnight. The end is found
//! by adding one calendar day, so days around a DST change are 23 or 25 hours
//! long rather than a fixed 24.

use chrono::{DateTime, Days, Local, LocalResult, NaiveDate, NaiveTime, TimeDelta, TimeZone};

use crate::TimeEntry;

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Returns the half-open bounds `[midnight, next midnight)` of the day containing `now`,
/// in `now`'s time zone.
pub fn day_bounds<Tz: TimeZone>(now: &DateTime<Tz>) -> (DateTime<Tz>, DateTime<Tz>) {
    let tz = now.timezone();
    let date = now.date_naive();
    let next = date.checked_add_days(Days::new(1)).unwrap_or(NaiveDate::MAX);
    (local_midnight(&tz, date), local_midnight(&tz, next))
}

/// Bounds of the host-local day containing `now`.
pub fn today_bounds(now: DateTime<Local>) -> (DateTime<Local>, DateTime<Local>) {
    day_bounds(&now)
}

/// Converts midnight of `date` in `tz` to an instant.
/// Ambiguous midnights (DST fall-back) resolve to the earlier instant.
fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Tz> {
    let midnight = date.and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&midnight) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt,
        // Midnight skipped by a spring-forward jump: the day starts at the first
        // wall-clock minute after the gap.
        LocalResult::None => (1..=MINUTES_PER_DAY)
            .find_map(|minute| {
                tz.from_local_datetime(&(midnight + TimeDelta::minutes(minute)))
                    .earliest()
            })
            .unwrap_or_else(|| tz.from_utc_datetime(&midnight)),
    }
}

/// Sums `end - start` over closed entries. Open entries contribute nothing.
pub fn sum_duration<'a, I>(entries: I) -> TimeDelta
where
    I: IntoIterator<Item = &'a TimeEntry>,
{
    entries
        .into_iter()
        .filter_map(TimeEntry::duration)
        .fold(TimeDelta::zero(), |total, duration| total + duration)
}

/// Formats a duration as whole hours, minutes and seconds, e.g. `8h 45m 0s`.
///
/// Leading zero units are omitted (`45m 10s`, `0s`). Negative durations keep
/// their sign.
pub fn format_duration(duration: TimeDelta) -> String {
    let total = duration.num_seconds();
    let sign = if total < 0 { "-" } else { "" };
    let total = total.unsigned_abs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{sign}{hours}h {minutes}m {seconds}s")
    } else if minutes > 0 {
        format!("{sign}{minutes}m {seconds}s")
    } else {
        format!("{sign}{seconds}s")
    }
}
