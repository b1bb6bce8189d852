//! Stop command for closing the running time entry.

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, Local, TimeDelta, Utc};

use trs_core::format_duration;
use trs_db::Database;

pub fn run<W: Write>(writer: &mut W, database_path: &Path, now: DateTime<Local>) -> Result<()> {
    let mut db = Database::open(database_path)?;
    let entry = db.stop(now.with_timezone(&Utc))?;
    let worked = entry.duration().unwrap_or_else(TimeDelta::zero);

    writeln!(
        writer,
        "success: stopped time entry ({})",
        format_duration(worked)
    )?;
    Ok(())
}
