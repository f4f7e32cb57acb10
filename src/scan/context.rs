//! Per-operation scan state.
//!
//! A [`ScanContext`] owns the parse cache and the resolver for exactly one
//! top-level operation. Each file is read and parsed at most once; the whole
//! context is dropped when the operation returns.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use super::config::ScanOptions;
use super::walker::ScanResult;
use crate::analysis::{FileModule, ImportAnalyzer};
use crate::resolve::{discover_base_dir, ModuleResolver};

/// A file that could not be read or parsed.
#[derive(Debug, Clone, Serialize)]
pub struct FailedFile {
    pub path: PathBuf,
    pub error: String,
}

/// Progress handed to [`BatchHooks`] after every batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanProgress {
    pub batch: usize,
    pub processed: usize,
    pub total: usize,
    pub failed: usize,
}

/// The scheduling boundary between two batches.
///
/// Called once after each batch has been parsed. Hosts use it to repaint
/// progress or to hand control back to their scheduler.
pub trait BatchHooks {
    fn batch_done(&mut self, _progress: &ScanProgress) {}
}

/// Hooks that do nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHooks;

impl BatchHooks for NoHooks {}

impl<F: FnMut(&ScanProgress)> BatchHooks for F {
    fn batch_done(&mut self, progress: &ScanProgress) {
        self(progress)
    }
}

/// Parse cache and resolver for one operation.
pub struct ScanContext {
    root: PathBuf,
    resolver: ModuleResolver,
    analyzer: ImportAnalyzer,
    modules: BTreeMap<PathBuf, FileModule>,
    failed: Vec<FailedFile>,
    failed_paths: HashSet<PathBuf>,
    verbose: bool,
}

impl ScanContext {
    /// Build the context for `root`, discovering the base directory.
    pub fn for_root(root: &Path, options: &ScanOptions) -> ScanResult<Self> {
        let base_dir = discover_base_dir(
            options.base_url.as_deref(),
            options.tsconfig.as_deref(),
            root,
            &options.cwd,
        );
        let resolver = ModuleResolver::new(base_dir).with_extensions(options.extensions.iter().cloned());
        Self::with_resolver(root, resolver, options.verbose)
    }

    pub fn with_resolver(root: &Path, resolver: ModuleResolver, verbose: bool) -> ScanResult<Self> {
        Ok(Self {
            root: root.to_path_buf(),
            resolver,
            analyzer: ImportAnalyzer::new()?,
            modules: BTreeMap::new(),
            failed: Vec::new(),
            failed_paths: HashSet::new(),
            verbose,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolver(&self) -> &ModuleResolver {
        &self.resolver
    }

    /// Parse `path` unless it is already cached, and resolve its imports.
    ///
    /// Returns `None` for files that failed; the failure is recorded once.
    pub fn load(&mut self, path: &Path) -> Option<&FileModule> {
        if self.failed_paths.contains(path) {
            return None;
        }
        if !self.modules.contains_key(path) {
            match self.analyzer.analyze_file(path) {
                Ok(mut module) => {
                    for import in &mut module.imports {
                        import.resolved = self.resolver.resolve(&import.specifier, path);
                    }
                    debug!(path = %path.display(), imports = module.imports.len(), "parsed");
                    self.modules.insert(path.to_path_buf(), module);
                }
                Err(err) => {
                    if self.verbose {
                        warn!(path = %path.display(), %err, "skipping file");
                    } else {
                        debug!(path = %path.display(), %err, "skipping file");
                    }
                    self.failed.push(FailedFile {
                        path: path.to_path_buf(),
                        error: err.to_string(),
                    });
                    self.failed_paths.insert(path.to_path_buf());
                    return None;
                }
            }
        }
        self.modules.get(path)
    }

    /// Parse one batch of files.
    pub fn load_batch(&mut self, batch: &[PathBuf]) {
        for path in batch {
            self.load(path);
        }
    }

    /// Parse every file, calling `hooks` after each batch of `batch_size`.
    pub fn load_all(&mut self, files: &[PathBuf], batch_size: usize, hooks: &mut dyn BatchHooks) {
        let mut progress = ScanProgress {
            total: files.len(),
            ..ScanProgress::default()
        };
        for batch in files.chunks(batch_size.max(1)) {
            self.load_batch(batch);
            progress = self.advance(progress, batch.len());
            hooks.batch_done(&progress);
        }
    }

    /// Async variant of [`ScanContext::load_all`] that also yields to the
    /// tokio scheduler between batches.
    #[cfg(feature = "async")]
    pub async fn load_all_async(
        &mut self,
        files: &[PathBuf],
        batch_size: usize,
        hooks: &mut (dyn BatchHooks + Send),
    ) {
        let mut progress = ScanProgress {
            total: files.len(),
            ..ScanProgress::default()
        };
        for batch in files.chunks(batch_size.max(1)) {
            self.load_batch(batch);
            progress = self.advance(progress, batch.len());
            hooks.batch_done(&progress);
            tokio::task::yield_now().await;
        }
    }

    fn advance(&self, progress: ScanProgress, batch_len: usize) -> ScanProgress {
        ScanProgress {
            batch: progress.batch + 1,
            processed: progress.processed + batch_len,
            total: progress.total,
            failed: self.failed.len(),
        }
    }

    /// A cached module.
    pub fn module(&self, path: &Path) -> Option<&FileModule> {
        self.modules.get(path)
    }

    /// Every parsed file, in path order.
    pub fn corpus(&self) -> impl Iterator<Item = &FileModule> {
        self.modules.values()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn failed(&self) -> &[FailedFile] {
        &self.failed
    }

    pub fn into_failed(self) -> Vec<FailedFile> {
        self.failed
    }
}
