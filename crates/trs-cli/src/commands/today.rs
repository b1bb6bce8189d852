//! Today command for summing the time worked since local midnight.

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, Local, Utc};

use trs_core::{format_duration, sum_duration, today_bounds};
use trs_db::Database;

/// Runs the today command.
///
/// Only entries that both start and end within the local day containing `now`
/// are counted; an entry spanning midnight is left out of either day, and the
/// running entry is not counted until it is stopped.
pub fn run<W: Write>(writer: &mut W, database_path: &Path, now: DateTime<Local>) -> Result<()> {
    let db = Database::open(database_path)?;
    let (day_start, day_end) = today_bounds(now);
    let entries =
        db.closed_entries_between(day_start.with_timezone(&Utc), day_end.with_timezone(&Utc))?;
    let total = sum_duration(&entries);
    tracing::debug!(entries = entries.len(), %day_start, %day_end, "summed today's entries");

    writeln!(
        writer,
        "You have been working {} today.",
        format_duration(total)
    )?;
    Ok(())
}
