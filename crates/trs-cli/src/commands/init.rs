//! Init command for creating the database file.

use std::io::Write;
use std::path::Path;

use anyhow::Result;

use trs_db::Database;

/// Runs the init command.
///
/// Fails without touching the file if a database already exists at `database_path`.
pub fn run<W: Write>(writer: &mut W, database_path: &Path) -> Result<()> {
    Database::create(database_path)?;
    writeln!(writer, "trs database created at {}", database_path.display())?;
    Ok(())
}
