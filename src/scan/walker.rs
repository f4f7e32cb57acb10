//! Directory walking with include/exclude globs.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use thiserror::Error;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::analysis::AnalysisError;

/// Errors that abort a whole scan operation.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Search root does not exist: {0}")]
    RootNotFound(String),

    #[error("Failed to read {path}: {source}")]
    Walk {
        path: String,
        #[source]
        source: walkdir::Error,
    },

    #[error("Invalid glob pattern '{pattern}': {source}")]
    Glob {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

/// Result type for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;

fn build_globset(patterns: &[String]) -> ScanResult<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        if pattern.trim().is_empty() {
            continue;
        }
        let glob = Glob::new(pattern).map_err(|source| ScanError::Glob {
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| ScanError::Glob {
        pattern: patterns.join(", "),
        source,
    })
}

/// All files under `root` matching `include` and not `exclude`, sorted.
///
/// Globs are matched against the path relative to `root`. Excluded
/// directories are not descended into. An unreadable entry below the root
/// is skipped; a missing or unreadable root is an error.
pub fn find_files(root: &Path, include: &[String], exclude: &[String]) -> ScanResult<Vec<PathBuf>> {
    if !root.exists() {
        return Err(ScanError::RootNotFound(root.display().to_string()));
    }

    let include = build_globset(include)?;
    let exclude = build_globset(exclude)?;

    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    let relative = |entry: &DirEntry| -> PathBuf {
        let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
        PathBuf::from(rel.to_string_lossy().replace('\\', "/"))
    };

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !exclude.is_match(relative(e)));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => {
                return Err(ScanError::Walk {
                    path: root.display().to_string(),
                    source: err,
                })
            }
            Err(err) => {
                debug!(%err, "skipping unreadable entry");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }
        if include.is_match(relative(&entry)) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    debug!(root = %root.display(), count = files.len(), "enumerated files");
    Ok(files)
}
