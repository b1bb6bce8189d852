//! Start command for opening a new time entry.

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, Local, Utc};

use trs_db::Database;

pub fn run<W: Write>(writer: &mut W, database_path: &Path, now: DateTime<Local>) -> Result<()> {
    let mut db = Database::open(database_path)?;
    db.start(now.with_timezone(&Utc))?;

    writeln!(
        writer,
        "success: started new time entry at {}",
        now.format("%H:%M:%S")
    )?;
    Ok(())
}
