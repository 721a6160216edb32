//! Folder hierarchy derived from flat folder paths.
//!
//! The store keeps one `folder` string per file. A directory tree is never
//! stored; these helpers rebuild one level of it from prefix matches.

use crate::record::ROOT_FOLDER;
use std::collections::BTreeSet;

/// Canonical form of a caller-supplied folder path.
///
/// Backslashes become `/`, empty and `.` segments are dropped, and an empty
/// result is the root `"."`.
pub fn normalize_folder(input: &str) -> String {
    let replaced = input.replace('\\', "/");
    let segments: Vec<&str> = replaced
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect();

    if segments.is_empty() {
        ROOT_FOLDER.to_string()
    } else {
        segments.join("/")
    }
}

/// Names one level below `target`, sorted and deduplicated.
///
/// `folders` are folder values already known to be `target` or below it.
/// A value equal to `target` is the node itself and contributes nothing.
pub fn immediate_children<'a, I>(target: &str, folders: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let prefix = format!("{target}/");
    let mut children = BTreeSet::new();

    for folder in folders {
        if folder == target {
            continue;
        }

        let remainder = if target == ROOT_FOLDER {
            folder
        } else {
            match folder.strip_prefix(&prefix) {
                Some(rest) => rest,
                None => continue,
            }
        };

        if let Some(child) = remainder.split('/').next() {
            if !child.is_empty() {
                children.insert(child.to_string());
            }
        }
    }

    children.into_iter().collect()
}

/// Folder one level above `target`; the root is its own parent.
pub fn parent_of(target: &str) -> String {
    let parent = match target.replace('\\', "/").trim_end_matches('/').rsplit_once('/') {
        Some((parent, _)) => parent.to_string(),
        None => String::new(),
    };

    match parent.as_str() {
        "" | "." | ".." | "/" => ROOT_FOLDER.to_string(),
        _ => parent,
    }
}
