//! SQLite-backed media store

use crate::error::ReelError;
use crate::record::{MediaRecord, ROOT_FOLDER};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension, Row};
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

const SCHEMA_VERSION: i32 = 1;

/// Shared column list for record queries, matches the `record_from_row` column order.
const RECORD_SELECT: &str = "SELECT file_name, path, folder FROM movies";

/// Outcome of a seeding pass
#[derive(Debug, Default, Serialize)]
pub struct SeedReport {
    pub inserted: usize,
    /// Records whose file name was already present
    pub skipped: usize,
    /// (file_name, reason) for records that failed to insert
    pub failures: Vec<(String, String)>,
}

/// Handle to the media database.
///
/// One handle wraps one connection. The service opens a read-only handle per
/// request; WAL mode lets those readers run side by side.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open or create the database at `path`
    pub fn open(path: &Path) -> crate::Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA busy_timeout = 5000;
            PRAGMA synchronous = NORMAL;
            ",
        )?;
        Self::init_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Open an existing database for reads only
    pub fn open_read_only(path: &Path) -> crate::Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        Ok(Self { conn })
    }

    /// Fresh in-memory database with the schema applied
    pub fn open_in_memory() -> crate::Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Initialize database schema
    fn init_schema(conn: &Connection) -> crate::Result<()> {
        let version: i32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

        if version != 0 && version != SCHEMA_VERSION {
            return Err(ReelError::SchemaVersionMismatch {
                found: version,
                expected: SCHEMA_VERSION,
            });
        }

        if version == 0 {
            // Also adopts a pre-existing movies table that never had a version stamp
            conn.execute_batch(
                "
                CREATE TABLE IF NOT EXISTS movies (
                    file_name TEXT UNIQUE NOT NULL,
                    path TEXT NOT NULL,
                    folder TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_movies_folder ON movies(folder);

                PRAGMA user_version = 1;
                ",
            )?;
        }

        Ok(())
    }

    /// Insert each record unless its file name is already stored.
    ///
    /// Existing rows are never touched. A record that fails to insert is
    /// reported in [`SeedReport::failures`] and the batch carries on.
    pub fn upsert_if_absent(&mut self, records: &[MediaRecord]) -> crate::Result<SeedReport> {
        let mut report = SeedReport::default();
        let tx = self.conn.transaction()?;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO movies (file_name, path, folder) VALUES (?1, ?2, ?3)
                 ON CONFLICT(file_name) DO NOTHING",
            )?;

            for record in records {
                match stmt.execute(params![record.file_name, record.path, record.folder]) {
                    Ok(0) => report.skipped += 1,
                    Ok(_) => report.inserted += 1,
                    Err(err) => {
                        warn!(file = %record.file_name, error = %err, "failed to insert record");
                        report
                            .failures
                            .push((record.file_name.clone(), err.to_string()));
                    }
                }
            }
        }

        tx.commit()?;

        info!(
            inserted = report.inserted,
            skipped = report.skipped,
            failed = report.failures.len(),
            "seeded media store"
        );
        Ok(report)
    }

    /// Every record in insertion order
    pub fn query_all(&self) -> crate::Result<Vec<MediaRecord>> {
        self.query_records(&format!("{RECORD_SELECT} ORDER BY rowid"), params![])
    }

    /// Distinct folder values equal to `target` or nested below it.
    ///
    /// The root folder `"."` matches every folder value. Comparison is
    /// case-sensitive and treats `%` and `_` as ordinary characters.
    pub fn distinct_folders_under(&self, target: &str) -> crate::Result<Vec<String>> {
        let mut folders = Vec::new();

        if target == ROOT_FOLDER {
            let mut stmt = self
                .conn
                .prepare("SELECT DISTINCT folder FROM movies")
                .map_err(ReelError::QueryFailed)?;
            let rows = stmt
                .query_map([], |row| row.get::<_, String>(0))
                .map_err(ReelError::QueryFailed)?;
            for row in rows {
                folders.push(row.map_err(ReelError::QueryFailed)?);
            }
        } else {
            let mut stmt = self
                .conn
                .prepare(
                    "SELECT DISTINCT folder FROM movies
                     WHERE folder = ?1
                        OR substr(folder, 1, length(?1) + 1) = ?1 || '/'",
                )
                .map_err(ReelError::QueryFailed)?;
            let rows = stmt
                .query_map(params![target], |row| row.get::<_, String>(0))
                .map_err(ReelError::QueryFailed)?;
            for row in rows {
                folders.push(row.map_err(ReelError::QueryFailed)?);
            }
        }

        Ok(folders)
    }

    /// Records whose folder equals `folder` exactly
    pub fn files_in_folder(&self, folder: &str) -> crate::Result<Vec<MediaRecord>> {
        self.query_records(
            &format!("{RECORD_SELECT} WHERE folder = ?1 ORDER BY rowid"),
            params![folder],
        )
    }

    /// Records whose file name contains `needle`.
    ///
    /// Matching follows SQLite `LIKE`: case-insensitive for ASCII letters,
    /// case-sensitive beyond ASCII. Wildcards in `needle` are escaped.
    pub fn search_by_name(&self, needle: &str) -> crate::Result<Vec<MediaRecord>> {
        let pattern = format!("%{}%", escape_like(needle));
        self.query_records(
            &format!("{RECORD_SELECT} WHERE file_name LIKE ?1 ESCAPE '\\' ORDER BY rowid"),
            params![pattern],
        )
    }

    /// Record with exactly this file name, if any
    pub fn find_by_name(&self, file_name: &str) -> crate::Result<Option<MediaRecord>> {
        self.conn
            .query_row(
                &format!("{RECORD_SELECT} WHERE file_name = ?1"),
                params![file_name],
                record_from_row,
            )
            .optional()
            .map_err(ReelError::QueryFailed)
    }

    /// Record stored under this relative path, if any
    pub fn find_by_path(&self, path: &str) -> crate::Result<Option<MediaRecord>> {
        self.conn
            .query_row(
                &format!("{RECORD_SELECT} WHERE path = ?1"),
                params![path],
                record_from_row,
            )
            .optional()
            .map_err(ReelError::QueryFailed)
    }

    /// Number of stored records
    pub fn count(&self) -> crate::Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM movies", [], |row| row.get(0))
            .map_err(ReelError::QueryFailed)?;
        Ok(count as usize)
    }

    fn query_records<P: rusqlite::Params>(
        &self,
        sql: &str,
        params: P,
    ) -> crate::Result<Vec<MediaRecord>> {
        let mut stmt = self.conn.prepare(sql).map_err(ReelError::QueryFailed)?;
        let rows = stmt
            .query_map(params, record_from_row)
            .map_err(ReelError::QueryFailed)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row.map_err(ReelError::QueryFailed)?);
        }
        Ok(records)
    }
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<MediaRecord> {
    Ok(MediaRecord {
        file_name: row.get(0)?,
        path: row.get(1)?,
        folder: row.get(2)?,
    })
}

/// Escape `LIKE` wildcards so the needle matches literally under `ESCAPE '\'`.
fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
