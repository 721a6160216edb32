//! Indexed media records

use serde::{Deserialize, Serialize};

/// Folder value used for files that sit directly under the scan root.
pub const ROOT_FOLDER: &str = ".";

/// One indexed video file.
///
/// `path` and `folder` are relative to the scan root and always use `/` as
/// the separator. `folder` is the directory component of `path`, or `"."`
/// for files directly under the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRecord {
    #[serde(rename = "FileName")]
    pub file_name: String,
    #[serde(rename = "Path")]
    pub path: String,
    #[serde(rename = "Folder")]
    pub folder: String,
}

impl MediaRecord {
    /// Build a record from a `/`-separated relative path.
    ///
    /// Returns `None` for an empty path or one that ends in a separator.
    pub fn from_relative_path(path: &str) -> Option<Self> {
        let (folder, file_name) = match path.rsplit_once('/') {
            Some((folder, name)) if !folder.is_empty() => (folder, name),
            Some((_, name)) => (ROOT_FOLDER, name),
            None => (ROOT_FOLDER, path),
        };
        if file_name.is_empty() {
            return None;
        }

        Some(Self {
            file_name: file_name.to_string(),
            path: path.to_string(),
            folder: folder.to_string(),
        })
    }
}
