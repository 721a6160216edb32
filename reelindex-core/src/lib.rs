//! Reelindex Core - Flat video index with a derived folder tree
//!
//! This library scans a directory for video files, stores them in a single
//! SQLite table, and rebuilds a browsable folder hierarchy from the stored
//! folder paths at query time.

pub mod config;
pub mod error;
pub mod query;
pub mod record;
pub mod scanner;
pub mod store;
pub mod tree;

pub use config::Config;
pub use error::ReelError;
pub use query::{find, resolve, search, FolderListing};
pub use record::MediaRecord;
pub use scanner::{ScanReport, ScanWarning, Scanner};
pub use store::{SeedReport, Store};

/// Result type alias for reelindex operations
pub type Result<T> = std::result::Result<T, ReelError>;
