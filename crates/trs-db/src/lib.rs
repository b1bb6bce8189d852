//! Storage layer for the trs time recorder.
//!
//! Provides persistence for time entries using `rusqlite`, and runs the
//! start/stop transitions of the entry state machine against it.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! A `Database` can be moved between threads but not shared without external
//! synchronization. Separate processes each open their own connection; transitions
//! take SQLite's write lock up front (`BEGIN IMMEDIATE`), so two concurrent `start`
//! calls cannot both observe "no open entry".
//!
//! # Schema
//!
//! A single `time_entry` table with an integer primary key and nullable `start`/`end`
//! columns. Timestamps are stored as INTEGER Unix seconds; sub-second precision is
//! dropped on write. A NULL `end` marks the open entry.
//!
//! The table and index names match stores written by earlier versions of trs, so an
//! existing `~/.trs.db` keeps working.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OpenFlags, OptionalExtension, TransactionBehavior, params};
use thiserror::Error;
use trs_core::{EntryId, EntryState, TimeEntry, Transition, TransitionError};

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// The database file could not be created.
    #[error("failed to create database file {}", path.display())]
    CreateFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// No database file exists at the configured path.
    #[error("database file {} does not exist; run `trs init` first", path.display())]
    NotInitialized { path: PathBuf },
    /// `init` was run against an existing database file.
    #[error("database file {} already exists", path.display())]
    AlreadyInitialized { path: PathBuf },
    /// The requested start/stop is not valid in the current state.
    #[error(transparent)]
    Transition(#[from] TransitionError),
    /// A stored timestamp is outside the representable range.
    #[error("invalid timestamp for time entry {entry_id}: {value}")]
    InvalidTimestamp { entry_id: i64, value: i64 },
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Reports whether a database file is present at `path`.
    ///
    /// The file's contents are not opened or validated.
    pub fn exists(path: &Path) -> bool {
        path.exists()
    }

    /// Creates a new database file at `path` and initializes its schema.
    ///
    /// Fails with [`DbError::AlreadyInitialized`] if the file already exists. If the
    /// schema cannot be created, the new file is removed again.
    pub fn create(path: &Path) -> Result<Self, DbError> {
        let create_err = |source| DbError::CreateFile {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(create_err)?;
        }

        match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(_) => {}
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                return Err(DbError::AlreadyInitialized {
                    path: path.to_path_buf(),
                });
            }
            Err(err) => return Err(create_err(err)),
        }
        tracing::debug!(path = %path.display(), "created database file");

        let db = Self::connect(path).and_then(|db| {
            db.ensure_schema()?;
            Ok(db)
        });
        if db.is_err() {
            if let Err(err) = fs::remove_file(path) {
                tracing::warn!(path = %path.display(), %err, "failed to remove partial database file");
            }
        }
        db
    }

    /// Opens an existing database at the given path.
    ///
    /// Fails with [`DbError::NotInitialized`] if no file exists; the file is never
    /// created here. The schema is ensured on open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        if !Self::exists(path) {
            return Err(DbError::NotInitialized {
                path: path.to_path_buf(),
            });
        }
        let db = Self::connect(path)?;
        db.ensure_schema()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.ensure_schema()?;
        Ok(db)
    }

    fn connect(path: &Path) -> Result<Self, DbError> {
        // SQLite may still read a name starting with `file:` as a URI when URI
        // handling is compiled in, so relative paths are anchored at `.`.
        let path = if path.is_relative() {
            Path::new(".").join(path)
        } else {
            path.to_path_buf()
        };
        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self { conn })
    }

    /// Creates the `time_entry` table and its indexes.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    pub fn ensure_schema(&self) -> Result<(), DbError> {
        tracing::debug!("ensuring time_entry schema");
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS time_entry (
                "id" INTEGER PRIMARY KEY,
                "start" INTEGER,
                "end" INTEGER
            );

            CREATE UNIQUE INDEX IF NOT EXISTS idx_time_entry_id ON time_entry("id");
            CREATE UNIQUE INDEX IF NOT EXISTS idx_time_entry_start_asc_end_asc
                ON time_entry("start" ASC, "end" ASC);
            "#,
        )?;
        Ok(())
    }

    /// Inserts a new open entry starting at `start`.
    ///
    /// This does not check for an existing open entry; use [`Database::start`] for the
    /// guarded transition.
    pub fn insert_open_entry(&self, start: DateTime<Utc>) -> Result<EntryId, DbError> {
        insert_open_entry(&self.conn, start)
    }

    /// Returns true if an entry without an end exists.
    pub fn has_open_entry(&self) -> Result<bool, DbError> {
        has_open_entry(&self.conn)
    }

    /// Returns the open entry, if any.
    ///
    /// Should a store hold several open entries, the most recently inserted is returned.
    pub fn open_entry(&self) -> Result<Option<TimeEntry>, DbError> {
        latest_open_entry(&self.conn)
    }

    /// Recomputes the state machine's state from storage.
    pub fn state(&self) -> Result<EntryState, DbError> {
        Ok(EntryState::from_open(self.has_open_entry()?))
    }

    /// Sets `end` on every open entry and returns how many were closed.
    ///
    /// This does not check the state; use [`Database::stop`] for the guarded transition.
    pub fn close_open_entries(&self, end: DateTime<Utc>) -> Result<usize, DbError> {
        close_open_entries(&self.conn, end)
    }

    /// Lists closed entries with `start >= range_start` and `end < range_end`.
    ///
    /// Entries that straddle either bound are excluded entirely. Results are in
    /// insertion order.
    pub fn closed_entries_between(
        &self,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> Result<Vec<TimeEntry>, DbError> {
        tracing::debug!(%range_start, %range_end, "querying closed time entries");
        let mut stmt = self.conn.prepare(
            r#"
            SELECT "id", "start", "end"
            FROM time_entry
            WHERE "start" >= ?1
              AND "end" < ?2
              AND "end" IS NOT NULL
            ORDER BY "id" ASC
            "#,
        )?;
        let rows = stmt.query_map(
            params![range_start.timestamp(), range_end.timestamp()],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, Option<i64>>(2)?,
                ))
            },
        )?;
        let mut entries = Vec::new();
        for row in rows {
            let (id, start, end) = row?;
            entries.push(entry_from_row(id, start, end)?);
        }
        Ok(entries)
    }

    /// Opens a new entry at `at`.
    ///
    /// The check and the insert run in one immediate transaction. Fails with
    /// [`TransitionError::EntryAlreadyOpen`] and writes nothing if an entry is open.
    pub fn start(&mut self, at: DateTime<Utc>) -> Result<EntryId, DbError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let state = EntryState::from_open(has_open_entry(&tx)?).apply(Transition::Start)?;
        let id = insert_open_entry(&tx, at)?;
        tx.commit()?;

        tracing::info!(%id, start = %at, %state, "started time entry");
        Ok(id)
    }

    /// Closes the open entry at `at` and returns it.
    ///
    /// The check and the update run in one immediate transaction. Fails with
    /// [`TransitionError::NoOpenEntry`] and writes nothing if no entry is open. A store
    /// that already holds several open entries has all of them closed; the most recent
    /// one is returned.
    pub fn stop(&mut self, at: DateTime<Utc>) -> Result<TimeEntry, DbError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let open = latest_open_entry(&tx)?;
        let state = EntryState::from_open(open.is_some()).apply(Transition::Stop)?;
        let entry = open.ok_or(TransitionError::NoOpenEntry)?;

        let closed = close_open_entries(&tx, at)?;
        if closed > 1 {
            tracing::warn!(closed, "closed more than one open time entry");
        }
        tx.commit()?;

        let entry = entry.closed_at(parse_timestamp(entry.id.get(), at.timestamp())?);
        tracing::info!(id = %entry.id, end = %at, %state, "stopped time entry");
        Ok(entry)
    }
}

fn insert_open_entry(conn: &Connection, start: DateTime<Utc>) -> Result<EntryId, DbError> {
    conn.execute(
        r#"INSERT INTO time_entry ("start") VALUES (?1)"#,
        params![start.timestamp()],
    )?;
    Ok(EntryId::new(conn.last_insert_rowid()))
}

fn has_open_entry(conn: &Connection) -> Result<bool, DbError> {
    let exists = conn.query_row(
        r#"SELECT EXISTS(SELECT 1 FROM time_entry WHERE "end" IS NULL)"#,
        [],
        |row| row.get(0),
    )?;
    Ok(exists)
}

fn latest_open_entry(conn: &Connection) -> Result<Option<TimeEntry>, DbError> {
    let row = conn
        .query_row(
            r#"
            SELECT "id", "start"
            FROM time_entry
            WHERE "end" IS NULL
            ORDER BY "id" DESC
            LIMIT 1
            "#,
            [],
            |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)),
        )
        .optional()?;
    row.map(|(id, start)| entry_from_row(id, start, None))
        .transpose()
}

fn close_open_entries(conn: &Connection, end: DateTime<Utc>) -> Result<usize, DbError> {
    let closed = conn.execute(
        r#"UPDATE time_entry SET "end" = ?1 WHERE "end" IS NULL"#,
        params![end.timestamp()],
    )?;
    Ok(closed)
}

fn entry_from_row(id: i64, start: i64, end: Option<i64>) -> Result<TimeEntry, DbError> {
    Ok(TimeEntry {
        id: EntryId::new(id),
        start: parse_timestamp(id, start)?,
        end: end.map(|end| parse_timestamp(id, end)).transpose()?,
    })
}

fn parse_timestamp(entry_id: i64, value: i64) -> Result<DateTime<Utc>, DbError> {
    DateTime::from_timestamp(value, 0).ok_or(DbError::InvalidTimestamp { entry_id, value })
}
