//! Unused-file detection.
//!
//! A file is used when some other file imports it, or when an `index.*`
//! barrel that is itself used re-exports it. Files reachable only through
//! barrels nobody imports are still unused.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use super::config::ScanOptions;
use super::context::{BatchHooks, FailedFile, ScanContext};
use super::walker::{find_files, ScanResult};
use crate::analysis::{FileModule, ImportRecord};
use crate::resolve::{path_key, ModuleResolver};

/// Why a file was reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum UnusedReason {
    NotImported,
    OnlyViaUnusedBarrel { barrel: PathBuf },
}

impl fmt::Display for UnusedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotImported => write!(f, "not imported by any file"),
            Self::OnlyViaUnusedBarrel { barrel } => {
                write!(f, "only re-exported through unused barrel {}", barrel.display())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnusedFile {
    pub file: PathBuf,
    pub reason: UnusedReason,
}

/// Unused files plus scan bookkeeping.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnusedReport {
    pub roots: Vec<PathBuf>,
    pub unused: Vec<UnusedFile>,
    pub files_scanned: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<FailedFile>,
}

impl UnusedReport {
    pub fn merge(&mut self, other: UnusedReport) {
        self.roots.extend(other.roots);
        self.unused.extend(other.unused);
        self.files_scanned += other.files_scanned;
        self.failed.extend(other.failed);
    }
}

/// Files under `root` that nothing imports. When `filter` is given, only
/// files whose path contains it are considered at all.
pub fn find_unused_files(
    root: &Path,
    filter: Option<&str>,
    options: &ScanOptions,
    hooks: &mut dyn BatchHooks,
) -> ScanResult<Vec<UnusedFile>> {
    Ok(unused_report(root, filter, options, hooks)?.unused)
}

pub fn unused_report(
    root: &Path,
    filter: Option<&str>,
    options: &ScanOptions,
    hooks: &mut dyn BatchHooks,
) -> ScanResult<UnusedReport> {
    let root = &options.absolute(root);
    let files = find_files(root, &options.include, &options.exclude)?;
    let mut ctx = ScanContext::for_root(root, options)?;
    ctx.load_all(&files, options.batch_size, hooks);

    let unused = unused_in(&ctx, filter);
    Ok(UnusedReport {
        roots: vec![root.to_path_buf()],
        unused,
        files_scanned: files.len(),
        failed: ctx.into_failed(),
    })
}

/// Unused-file pass over an already loaded context.
pub(crate) fn unused_in(ctx: &ScanContext, filter: Option<&str>) -> Vec<UnusedFile> {
    let modules: HashMap<String, &FileModule> =
        ctx.corpus().map(|m| (path_key(&m.path), m)).collect();
    let resolver = ctx.resolver();

    // Imports an aggregator only forwards do not count as uses of their target.
    let mut imported: HashSet<String> = HashSet::new();
    for module in ctx.corpus() {
        let aggregator = is_aggregator(&module.path);
        for import in &module.imports {
            if aggregator && forwards(module, import) {
                continue;
            }
            if let Some(path) = import.resolved.as_ref().and_then(|id| id.as_file()) {
                if path_key(path) != path_key(&module.path) {
                    imported.insert(path_key(path));
                }
            }
        }
    }

    let aggregators: Vec<(&FileModule, BTreeSet<String>)> = ctx
        .corpus()
        .filter(|m| is_aggregator(&m.path))
        .map(|m| (m, re_exported_files(m, &modules, resolver)))
        .collect();

    let reachable_via_used: HashSet<&String> = aggregators
        .iter()
        .filter(|(barrel, _)| imported.contains(&path_key(&barrel.path)))
        .flat_map(|(_, files)| files.iter())
        .collect();

    let unused: Vec<UnusedFile> = ctx
        .corpus()
        .filter(|m| filter.map_or(true, |f| m.path.to_string_lossy().contains(f)))
        .filter_map(|module| {
            let key = path_key(&module.path);
            if imported.contains(&key) || reachable_via_used.contains(&key) {
                return None;
            }
            let reason = aggregators
                .iter()
                .find(|(_, files)| files.contains(&key))
                .map(|(barrel, _)| UnusedReason::OnlyViaUnusedBarrel {
                    barrel: barrel.path.clone(),
                })
                .unwrap_or(UnusedReason::NotImported);
            Some(UnusedFile {
                file: module.path.clone(),
                reason,
            })
        })
        .collect();

    info!(
        root = %ctx.root().display(),
        unused = unused.len(),
        aggregators = aggregators.len(),
        "unused scan complete"
    );
    unused
}

/// `index.<ext>` files.
fn is_aggregator(path: &Path) -> bool {
    path.file_stem().is_some_and(|stem| stem == "index")
}

/// True when `import` only exists to be exported again by `module`.
fn forwards(module: &FileModule, import: &ImportRecord) -> bool {
    module.exports.iter().any(|export| match &export.re_export_source {
        Some(source) => *source == import.specifier,
        None => import.bound_names().any(|local| local == export.local_name),
    })
}

/// Keys of every file `barrel` re-exports, following nested `index.*` files.
fn re_exported_files(
    barrel: &FileModule,
    modules: &HashMap<String, &FileModule>,
    resolver: &ModuleResolver,
) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    let mut seen = HashSet::from([path_key(&barrel.path)]);
    let mut stack = vec![barrel];

    while let Some(current) = stack.pop() {
        for import in current.imports.iter().filter(|i| forwards(current, i)) {
            let resolved = import
                .resolved
                .clone()
                .or_else(|| resolver.resolve(&import.specifier, &current.path));
            let Some(path) = resolved.as_ref().and_then(|id| id.as_file()) else {
                continue;
            };
            let key = path_key(path);
            found.insert(key.clone());
            if is_aggregator(path) && seen.insert(key.clone()) {
                if let Some(nested) = modules.get(&key) {
                    stack.push(nested);
                }
            }
        }
    }

    found.remove(&path_key(&barrel.path));
    found
}
