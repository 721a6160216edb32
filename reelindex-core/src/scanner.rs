//! Video file discovery under a scan root.

use crate::config::Config;
use crate::error::ReelError;
use crate::record::MediaRecord;
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::{DirEntry, WalkBuilder};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// A filesystem entry the scanner had to skip.
#[derive(Debug, Clone)]
pub struct ScanWarning {
    /// Offending path, when the walker could report one
    pub path: Option<PathBuf>,
    pub reason: String,
}

/// Output of a scan: the records found plus everything that was skipped.
#[derive(Debug, Default)]
pub struct ScanReport {
    pub records: Vec<MediaRecord>,
    pub warnings: Vec<ScanWarning>,
}

/// Walks a directory tree and collects video files.
pub struct Scanner {
    root: PathBuf,
    extensions: Vec<String>,
    ignore_set: GlobSet,
    follow_links: bool,
}

impl Scanner {
    /// Build a scanner for `root` using the `[scan]` and `[ignore]` config sections
    pub fn new(root: &Path, config: &Config) -> crate::Result<Self> {
        if !root.is_dir() {
            return Err(ReelError::RootNotFound(root.to_path_buf()));
        }

        let extensions = config
            .scan
            .extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();

        // Bare names match at any depth
        let mut ignore_builder = GlobSetBuilder::new();
        for pattern in &config.ignore.patterns {
            let glob_pattern = if pattern.contains('*') || pattern.contains('?') {
                pattern.clone()
            } else {
                format!("**/{}", pattern)
            };
            let glob =
                Glob::new(&glob_pattern).map_err(|e| ReelError::GlobPattern(e.to_string()))?;
            ignore_builder.add(glob);
        }
        let ignore_set = ignore_builder
            .build()
            .map_err(|e| ReelError::GlobPattern(e.to_string()))?;

        Ok(Self {
            root: root.to_path_buf(),
            extensions,
            ignore_set,
            follow_links: config.scan.follow_links,
        })
    }

    /// Scan root used by this scanner
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the whole tree. Never fails: unreadable entries become warnings.
    pub fn scan(&self) -> ScanReport {
        let mut builder = WalkBuilder::new(&self.root);
        // Visit everything, hidden and git-ignored entries included
        builder.standard_filters(false);
        builder.follow_links(self.follow_links);

        if !self.ignore_set.is_empty() {
            let root = self.root.clone();
            let ignore_set = self.ignore_set.clone();
            builder.filter_entry(move |entry| {
                let relative = entry.path().strip_prefix(&root).unwrap_or(entry.path());
                relative.as_os_str().is_empty() || !ignore_set.is_match(relative)
            });
        }

        let mut report = ScanReport::default();

        for entry in builder.build() {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    report.warn(error_path(&err), err.to_string());
                    continue;
                }
            };

            if entry.depth() == 0 || !self.has_video_extension(entry.path()) {
                continue;
            }

            match self.record_for(&entry) {
                Ok(Some(record)) => report.records.push(record),
                Ok(None) => {}
                Err(reason) => report.warn(Some(entry.path().to_path_buf()), reason),
            }
        }

        // Deterministic seeding order
        report.records.sort_by(|a, b| a.path.cmp(&b.path));

        debug!(
            root = %self.root.display(),
            found = report.records.len(),
            skipped = report.warnings.len(),
            "scan finished"
        );
        report
    }

    fn has_video_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
            .unwrap_or(false)
    }

    /// `Ok(None)` for directories, `Err(reason)` for entries that must be skipped.
    fn record_for(&self, entry: &DirEntry) -> Result<Option<MediaRecord>, String> {
        let metadata = entry
            .metadata()
            .map_err(|e| format!("cannot stat entry: {e}"))?;
        if metadata.is_dir() {
            return Ok(None);
        }

        let relative = entry
            .path()
            .strip_prefix(&self.root)
            .map_err(|_| "path is not under the scan root".to_string())?;
        let normalized = normalize_relative(relative)?;

        MediaRecord::from_relative_path(&normalized)
            .map(Some)
            .ok_or_else(|| format!("cannot derive a file name from {normalized:?}"))
    }
}

impl ScanReport {
    fn warn(&mut self, path: Option<PathBuf>, reason: String) {
        match &path {
            Some(p) => warn!(path = %p.display(), %reason, "skipping entry"),
            None => warn!(%reason, "skipping entry"),
        }
        self.warnings.push(ScanWarning { path, reason });
    }
}

/// Join the normal components of a relative path with `/`.
fn normalize_relative(relative: &Path) -> Result<String, String> {
    let mut segments = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(segment) => {
                let segment = segment
                    .to_str()
                    .ok_or_else(|| format!("non UTF-8 path {}", relative.display()))?;
                segments.push(segment);
            }
            Component::CurDir => {}
            _ => return Err(format!("unexpected component in {}", relative.display())),
        }
    }
    Ok(segments.join("/"))
}

fn error_path(err: &ignore::Error) -> Option<PathBuf> {
    match err {
        ignore::Error::WithPath { path, .. } => Some(path.clone()),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            error_path(err)
        }
        ignore::Error::Loop { child, .. } => Some(child.clone()),
        _ => None,
    }
}
