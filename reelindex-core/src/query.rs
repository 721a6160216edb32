//! Folder browsing and file-name search over a [`Store`].

use crate::error::ReelError;
use crate::record::MediaRecord;
use crate::store::Store;
use crate::tree::{immediate_children, normalize_folder, parent_of};
use serde::Serialize;
use tracing::debug;

/// One level of the virtual folder tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderListing {
    /// Immediate child folder names, sorted
    pub folders: Vec<String>,
    /// Files stored directly in this folder, in store order
    pub files: Vec<MediaRecord>,
    pub parent: String,
    /// Normalized folder this listing describes
    pub cwd: String,
}

/// Resolve a folder path into its children, files and parent.
///
/// An unknown folder is not an error: it resolves to an empty listing.
pub fn resolve(store: &Store, folder: &str) -> crate::Result<FolderListing> {
    let target = normalize_folder(folder);

    let descendants = store.distinct_folders_under(&target)?;
    let folders = immediate_children(&target, descendants.iter().map(String::as_str));
    let files = store.files_in_folder(&target)?;
    let parent = parent_of(&target);

    debug!(
        cwd = %target,
        folders = folders.len(),
        files = files.len(),
        "resolved folder"
    );

    Ok(FolderListing {
        folders,
        files,
        parent,
        cwd: target,
    })
}

/// Records whose file name contains `needle`, ignoring ASCII case.
pub fn search(store: &Store, needle: &str) -> crate::Result<Vec<MediaRecord>> {
    if needle.is_empty() {
        return Err(ReelError::EmptyQuery);
    }
    store.search_by_name(needle)
}

/// Exact file-name lookup
pub fn find(store: &Store, file_name: &str) -> crate::Result<Option<MediaRecord>> {
    store.find_by_name(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(paths: &[&str]) -> Store {
        let mut store = Store::open_in_memory().unwrap();
        let records: Vec<_> = paths
            .iter()
            .map(|p| MediaRecord::from_relative_path(p).unwrap())
            .collect();
        store.upsert_if_absent(&records).unwrap();
        store
    }

    #[test]
    fn test_resolve_root_lists_top_level_folders() {
        let store = store_with(&["A/x.mp4", "B/y.mkv"]);
        let listing = resolve(&store, ".").unwrap();

        assert_eq!(listing.folders, vec!["A", "B"]);
        assert!(listing.files.is_empty());
        assert_eq!(listing.parent, ".");
        assert_eq!(listing.cwd, ".");
    }

    #[test]
    fn test_resolve_empty_path_is_root() {
        let store = store_with(&["A/x.mp4", "B/y.mkv"]);
        assert_eq!(resolve(&store, "").unwrap(), resolve(&store, ".").unwrap());
        assert_eq!(resolve(&store, "/").unwrap(), resolve(&store, ".").unwrap());
    }

    #[test]
    fn test_resolve_intermediate_folder() {
        let store = store_with(&["A/x.mp4", "A/C/z.mkv"]);
        let listing = resolve(&store, "A").unwrap();

        assert_eq!(listing.folders, vec!["C"]);
        assert_eq!(listing.files.len(), 1);
        assert_eq!(listing.files[0].file_name, "x.mp4");
        assert_eq!(listing.parent, ".");
    }

    #[test]
    fn test_resolve_leaf_folder() {
        let store = store_with(&["A/x.mp4", "A/C/z.mkv"]);
        let listing = resolve(&store, "A/C").unwrap();

        assert!(listing.folders.is_empty());
        assert_eq!(listing.files.len(), 1);
        assert_eq!(listing.files[0].file_name, "z.mkv");
        assert_eq!(listing.parent, "A");
    }

    #[test]
    fn test_resolve_trailing_slashes_and_backslashes() {
        let store = store_with(&["A/x.mp4", "A/C/z.mkv"]);
        let canonical = resolve(&store, "A/C").unwrap();

        assert_eq!(resolve(&store, "/A/C/").unwrap(), canonical);
        assert_eq!(resolve(&store, "A\\C").unwrap(), canonical);
    }

    #[test]
    fn test_resolve_unknown_folder_is_empty() {
        let store = store_with(&["A/x.mp4"]);
        let listing = resolve(&store, "Nowhere/Deep").unwrap();

        assert!(listing.folders.is_empty());
        assert!(listing.files.is_empty());
        assert_eq!(listing.parent, "Nowhere");
    }

    #[test]
    fn test_resolve_root_includes_root_level_files() {
        let store = store_with(&["intro.mp4", "A/x.mp4"]);
        let listing = resolve(&store, ".").unwrap();

        assert_eq!(listing.folders, vec!["A"]);
        assert_eq!(listing.files.len(), 1);
        assert_eq!(listing.files[0].file_name, "intro.mp4");
    }

    #[test]
    fn test_resolve_skips_empty_intermediate_levels() {
        // No files live in "A" itself, but it must still show "B" as a child
        let store = store_with(&["A/B/C/deep.mkv"]);

        assert_eq!(resolve(&store, ".").unwrap().folders, vec!["A"]);
        assert_eq!(resolve(&store, "A").unwrap().folders, vec!["B"]);
        assert_eq!(resolve(&store, "A/B").unwrap().folders, vec!["C"]);
    }

    #[test]
    fn test_resolve_folder_match_is_case_sensitive() {
        let store = store_with(&["Movies/x.mp4"]);
        let listing = resolve(&store, "movies").unwrap();
        assert!(listing.files.is_empty());
    }

    #[test]
    fn test_search_matches_substring_ignoring_case() {
        let store = store_with(&["MyMovie.mp4", "clip.mkv"]);
        let results = search(&store, "mov").unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].file_name, "MyMovie.mp4");
    }

    #[test]
    fn test_search_empty_query_is_client_error() {
        let store = store_with(&["MyMovie.mp4"]);
        let err = search(&store, "").unwrap_err();

        assert!(matches!(err, ReelError::EmptyQuery));
        assert!(err.is_client_error());
    }

    #[test]
    fn test_find_exact_name() {
        let store = store_with(&["A/x.mp4"]);
        assert_eq!(find(&store, "x.mp4").unwrap().unwrap().path, "A/x.mp4");
        assert!(find(&store, "X.MP4").unwrap().is_none());
    }
}
