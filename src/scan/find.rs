//! The search operation: which files import a module, and how.

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use super::config::ScanOptions;
use super::context::{BatchHooks, FailedFile, ScanContext};
use super::walker::{find_files, ScanResult};
use crate::analysis::{ImportRecord, ImporterResult};
use crate::graph::{find_consumers, is_barrel_for, is_barrel_for_names, uses_any, VisitedBarrels};
use crate::resolve::{basename_without_extension, module_matches, path_key};

/// Outcome of one search, with enough context to render it.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchReport {
    pub roots: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<PathBuf>,
    pub results: Vec<ImporterResult>,
    pub files_scanned: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<FailedFile>,
}

impl SearchReport {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Total matching imports across all files.
    pub fn import_count(&self) -> usize {
        self.results.iter().map(|r| r.imports.len()).sum()
    }

    /// Fold the report of another root into this one.
    pub fn merge(&mut self, other: SearchReport) {
        let mut merged = MergedResults::from(std::mem::take(&mut self.results));
        for result in other.results {
            merged.add(result);
        }
        self.results = merged.into_results();
        self.roots.extend(other.roots);
        self.files_scanned += other.files_scanned;
        self.failed.extend(other.failed);
        if self.module.is_none() {
            self.module = other.module;
        }
        if self.target.is_none() {
            self.target = other.target;
        }
    }
}

/// Files under `root` importing `module_name` or the target in
/// `options.module_path`. With neither, every file with an import.
pub fn find_files_importing(
    module_name: Option<&str>,
    root: &Path,
    options: &ScanOptions,
    hooks: &mut dyn BatchHooks,
) -> ScanResult<Vec<ImporterResult>> {
    Ok(search(module_name, root, options, hooks)?.results)
}

/// Like [`find_files_importing`], returning the full report.
pub fn search(
    module_name: Option<&str>,
    root: &Path,
    options: &ScanOptions,
    hooks: &mut dyn BatchHooks,
) -> ScanResult<SearchReport> {
    let root = &options.absolute(root);
    let files = find_files(root, &options.include, &options.exclude)?;
    let mut ctx = ScanContext::for_root(root, options)?;
    ctx.load_all(&files, options.batch_size, hooks);
    let mut report = search_in(&ctx, module_name, options);
    report.files_scanned = files.len();
    report.failed = ctx.into_failed();
    Ok(report)
}

#[cfg(feature = "async")]
pub async fn find_files_importing_async(
    module_name: Option<&str>,
    root: &Path,
    options: &ScanOptions,
    hooks: &mut (dyn BatchHooks + Send),
) -> ScanResult<Vec<ImporterResult>> {
    Ok(search_async(module_name, root, options, hooks).await?.results)
}

/// Like [`search`], yielding to the tokio scheduler between batches.
#[cfg(feature = "async")]
pub async fn search_async(
    module_name: Option<&str>,
    root: &Path,
    options: &ScanOptions,
    hooks: &mut (dyn BatchHooks + Send),
) -> ScanResult<SearchReport> {
    let root = &options.absolute(root);
    let files = find_files(root, &options.include, &options.exclude)?;
    let mut ctx = ScanContext::for_root(root, options)?;
    ctx.load_all_async(&files, options.batch_size, hooks).await;
    let mut report = search_in(&ctx, module_name, options);
    report.files_scanned = files.len();
    report.failed = ctx.into_failed();
    Ok(report)
}

/// Run the matching passes over an already loaded context.
///
/// `files_scanned` and `failed` are left for the caller to fill in.
pub(crate) fn search_in(
    ctx: &ScanContext,
    module_name: Option<&str>,
    options: &ScanOptions,
) -> SearchReport {
    let query = Query::build(ctx, module_name, options);

    let mut merged = MergedResults::default();
    for module in ctx.corpus() {
        let imports: Vec<ImportRecord> = module
            .imports
            .iter()
            .filter(|import| options.styles.allows(import.style))
            .filter(|import| query.matches(import))
            .cloned()
            .collect();
        if !imports.is_empty() {
            merged.add(ImporterResult::new(module.path.clone(), imports));
        }
    }
    let direct = merged.len();

    if let Some(target) = &query.target {
        trace_barrels(ctx, target, options, &mut merged);
    }

    info!(
        root = %ctx.root().display(),
        direct,
        total = merged.len(),
        "search complete"
    );

    SearchReport {
        roots: vec![ctx.root().to_path_buf()],
        module: module_name.map(str::to_string),
        target: query.target,
        results: merged.into_results(),
        ..SearchReport::default()
    }
}

/// A file whose barrel-ness is still to be checked, and the module it
/// was matched through.
struct Pending {
    file: PathBuf,
    via: PathBuf,
    /// Names `via` carries; `None` means everything.
    names: Option<BTreeSet<String>>,
}

/// Follow barrels outward from the direct matches until nothing new is found.
fn trace_barrels(ctx: &ScanContext, target: &Path, options: &ScanOptions, merged: &mut MergedResults) {
    let mut visited = VisitedBarrels::new();
    let mut queue: VecDeque<Pending> = merged
        .files()
        .map(|file| Pending {
            file: file.to_path_buf(),
            via: target.to_path_buf(),
            names: None,
        })
        .collect();

    while let Some(pending) = queue.pop_front() {
        if visited.contains(&pending.file) {
            continue;
        }
        let Some(module) = ctx.module(&pending.file) else {
            continue;
        };
        let info = is_barrel_for_names(module, &pending.via, ctx.resolver(), pending.names.as_ref());
        if !info.is_barrel {
            continue;
        }
        debug!(
            barrel = %pending.file.display(),
            names = ?info.re_exported_names,
            "expanding barrel"
        );

        let consumers = find_consumers(
            &pending.file,
            &info.re_exported_names,
            ctx.corpus(),
            ctx.resolver(),
            &mut visited,
        );
        for consumer in consumers {
            let imports: Vec<ImportRecord> = consumer
                .imports
                .into_iter()
                .filter(|import| options.styles.allows(import.style))
                .collect();
            if imports.is_empty() {
                continue;
            }
            queue.push_back(Pending {
                file: consumer.file.clone(),
                via: pending.file.clone(),
                names: Some(info.re_exported_names.clone()),
            });
            merged.add(ImporterResult::new(consumer.file, imports));
        }
    }
}

/// What a search is looking for.
struct Query<'a> {
    name: Option<&'a str>,
    target: Option<PathBuf>,
    /// `index.*` files beside the target that re-export it, with the names
    /// they forward.
    sibling_barrels: Vec<(PathBuf, BTreeSet<String>)>,
}

impl<'a> Query<'a> {
    fn build(ctx: &ScanContext, name: Option<&'a str>, options: &ScanOptions) -> Self {
        let target = options
            .module_path
            .as_deref()
            .map(|path| ctx.resolver().resolve_target(path, &options.cwd));

        let mut sibling_barrels = Vec::new();
        if let Some(target) = &target {
            debug!(target = %target.display(), "resolved search target");
            // Only barrels the walker returned; excluded files stay out.
            for barrel in ctx.resolver().sibling_barrels(target) {
                let Some(module) = ctx.module(&barrel) else {
                    continue;
                };
                let info = is_barrel_for(module, target, ctx.resolver());
                if info.is_barrel {
                    sibling_barrels.push((barrel, info.re_exported_names));
                }
            }
        }

        Self {
            name,
            target,
            sibling_barrels,
        }
    }

    fn matches(&self, import: &ImportRecord) -> bool {
        if let Some(target) = &self.target {
            let Some(resolved) = &import.resolved else {
                return false;
            };
            return module_matches(resolved, target)
                || self
                    .sibling_barrels
                    .iter()
                    .any(|(barrel, names)| module_matches(resolved, barrel) && uses_any(import, names));
        }

        match self.name {
            Some(name) => matches_name(import, name),
            None => true,
        }
    }
}

fn matches_name(import: &ImportRecord, name: &str) -> bool {
    import.specifier == name
        || import.bound_names().any(|bound| bound == name)
        || basename_without_extension(&import.specifier) == name
        || import
            .resolved
            .as_ref()
            .and_then(|id| id.as_file())
            .is_some_and(|path| basename_without_extension(&path.to_string_lossy()) == name)
}

/// Results deduplicated by file identity, in insertion order.
#[derive(Default)]
struct MergedResults {
    results: Vec<ImporterResult>,
    index: HashMap<String, usize>,
}

impl From<Vec<ImporterResult>> for MergedResults {
    fn from(results: Vec<ImporterResult>) -> Self {
        let mut merged = Self::default();
        for result in results {
            merged.add(result);
        }
        merged
    }
}

impl MergedResults {
    fn add(&mut self, result: ImporterResult) {
        let key = path_key(&result.file);
        match self.index.get(&key) {
            Some(&idx) => self.results[idx].merge_imports(result.imports),
            None => {
                self.index.insert(key, self.results.len());
                self.results.push(result);
            }
        }
    }

    fn files(&self) -> impl Iterator<Item = &Path> {
        self.results.iter().map(|r| r.file.as_path())
    }

    fn len(&self) -> usize {
        self.results.len()
    }

    fn into_results(self) -> Vec<ImporterResult> {
        self.results
    }
}
