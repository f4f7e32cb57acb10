//! Combined project report: search, unused files and import-map stats from
//! a single scan.

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::config::ScanOptions;
use super::context::{BatchHooks, FailedFile, ScanContext};
use super::find::{search_in, SearchReport};
use super::map::{import_map_in, MapStats};
use super::unused::{unused_in, UnusedFile};
use super::walker::{find_files, ScanResult};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectReport {
    pub root: PathBuf,
    pub files_scanned: usize,
    pub search: SearchReport,
    pub unused: Vec<UnusedFile>,
    pub stats: MapStats,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<FailedFile>,
}

/// Scan `root` once and run every analysis over the same parsed corpus.
pub fn build_report(
    module_name: Option<&str>,
    root: &Path,
    options: &ScanOptions,
    hooks: &mut dyn BatchHooks,
) -> ScanResult<ProjectReport> {
    let root = &options.absolute(root);
    let files = find_files(root, &options.include, &options.exclude)?;
    let mut ctx = ScanContext::for_root(root, options)?;
    ctx.load_all(&files, options.batch_size, hooks);

    let mut search = search_in(&ctx, module_name, options);
    search.files_scanned = files.len();
    let unused = unused_in(&ctx, None);
    let stats = import_map_in(&ctx, options).stats;

    Ok(ProjectReport {
        root: root.to_path_buf(),
        files_scanned: files.len(),
        search,
        unused,
        stats,
        failed: ctx.into_failed(),
    })
}
