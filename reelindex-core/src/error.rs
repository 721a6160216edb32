//! Error types for reelindex operations

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ReelError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A read against the store failed. Kept apart from [`ReelError::Database`]
    /// so callers can tell a failed lookup from a failed open or write.
    #[error("Query failed: {0}")]
    QueryFailed(#[source] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scan root not found: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("Config parse error: {0}")]
    ConfigParse(String),

    #[error("Glob pattern error: {0}")]
    GlobPattern(String),

    #[error("Schema version mismatch: database is v{found}, expected v{expected}. Delete the database file to rebuild the index.")]
    SchemaVersionMismatch { found: i32, expected: i32 },

    #[error("Search query must not be empty")]
    EmptyQuery,
}

impl ReelError {
    /// True when the error was caused by the caller's input rather than the
    /// store or the filesystem.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ReelError::EmptyQuery)
    }
}
