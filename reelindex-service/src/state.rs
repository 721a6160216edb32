use crate::error::AppError;
use reelindex_core::{ReelError, Store};
use std::path::PathBuf;
use std::sync::Arc;

pub type SharedState = Arc<AppState>;

/// Per-process service state. Holds locations only; every request opens its
/// own read-only store connection.
pub struct AppState {
    pub db_path: PathBuf,
    pub media_root: PathBuf,
}

impl AppState {
    pub fn new(db_path: PathBuf, media_root: PathBuf) -> Self {
        Self {
            db_path,
            media_root,
        }
    }

    /// Run a read against a fresh store connection on the blocking pool
    pub async fn read<T, F>(&self, f: F) -> Result<T, AppError>
    where
        T: Send + 'static,
        F: FnOnce(&Store) -> reelindex_core::Result<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        let result = tokio::task::spawn_blocking(move || {
            let store = Store::open_read_only(&db_path).map_err(into_query_failed)?;
            f(&store)
        })
        .await
        .map_err(AppError::internal)??;
        Ok(result)
    }
}

/// A reader that cannot even open the database is a failed query to the caller
fn into_query_failed(err: ReelError) -> ReelError {
    match err {
        ReelError::Database(source) => ReelError::QueryFailed(source),
        other => other,
    }
}
