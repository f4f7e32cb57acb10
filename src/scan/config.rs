//! Options shared by every scan operation.

use std::path::{Path, PathBuf};

use crate::analysis::ImportStyle;
use crate::resolve::DEFAULT_EXTENSIONS;

/// Files parsed between two yield points.
pub const DEFAULT_BATCH_SIZE: usize = 20;

/// Entries kept in the most/least imported lists of the import map.
pub const DEFAULT_STATS_LIMIT: usize = 10;

/// Files scanned unless `include` is overridden.
pub const DEFAULT_INCLUDE: &[&str] = &["**/*.{ts,tsx,js,jsx,mjs,cjs,mts,cts,vue,svelte}"];

/// Directories skipped unless `exclude` is overridden.
pub const DEFAULT_EXCLUDE: &[&str] = &[
    "**/node_modules",
    "**/node_modules/**",
    "**/dist",
    "**/dist/**",
    "**/build",
    "**/build/**",
    "**/.git",
    "**/.git/**",
    "**/.next",
    "**/.next/**",
    "**/coverage",
    "**/coverage/**",
    "**/.turbo",
    "**/.turbo/**",
];

/// Which import styles are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleFilter {
    pub static_imports: bool,
    pub dynamic: bool,
    pub lazy: bool,
    pub require: bool,
}

impl Default for StyleFilter {
    fn default() -> Self {
        Self {
            static_imports: true,
            dynamic: true,
            lazy: true,
            require: true,
        }
    }
}

impl StyleFilter {
    pub fn allows(&self, style: ImportStyle) -> bool {
        match style {
            ImportStyle::Static => self.static_imports,
            ImportStyle::Dynamic => self.dynamic,
            ImportStyle::Lazy => self.lazy,
            ImportStyle::Require => self.require,
        }
    }

    /// Filter with one style switched off.
    pub fn without(mut self, style: ImportStyle) -> Self {
        match style {
            ImportStyle::Static => self.static_imports = false,
            ImportStyle::Dynamic => self.dynamic = false,
            ImportStyle::Lazy => self.lazy = false,
            ImportStyle::Require => self.require = false,
        }
        self
    }
}

/// Configuration for one scan operation.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Globs, relative to the search root, a file must match.
    pub include: Vec<String>,
    /// Globs, relative to the search root, that drop a file or directory.
    pub exclude: Vec<String>,
    pub styles: StyleFilter,
    pub batch_size: usize,
    /// Probing order for extension-less specifiers.
    pub extensions: Vec<String>,
    /// Explicit base directory for non-relative specifiers.
    pub base_url: Option<PathBuf>,
    /// Explicit `tsconfig.json` to read `baseUrl` from.
    pub tsconfig: Option<PathBuf>,
    /// File whose importers are searched for.
    pub module_path: Option<PathBuf>,
    /// Directory relative paths on the command line are taken from.
    pub cwd: PathBuf,
    pub verbose: bool,
    pub stats_limit: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            include: DEFAULT_INCLUDE.iter().map(|s| s.to_string()).collect(),
            exclude: DEFAULT_EXCLUDE.iter().map(|s| s.to_string()).collect(),
            styles: StyleFilter::default(),
            batch_size: DEFAULT_BATCH_SIZE,
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            base_url: None,
            tsconfig: None,
            module_path: None,
            cwd: std::env::current_dir().unwrap_or_default(),
            verbose: false,
            stats_limit: DEFAULT_STATS_LIMIT,
        }
    }
}

impl ScanOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_module_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.module_path = Some(path.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<PathBuf>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_tsconfig(mut self, tsconfig: impl Into<PathBuf>) -> Self {
        self.tsconfig = Some(tsconfig.into());
        self
    }

    pub fn with_styles(mut self, styles: StyleFilter) -> Self {
        self.styles = styles;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = cwd.into();
        self
    }

    /// Replace the include globs; an empty list keeps the defaults.
    pub fn with_include(mut self, include: Vec<String>) -> Self {
        if !include.is_empty() {
            self.include = include;
        }
        self
    }

    /// Add exclude globs on top of the defaults.
    pub fn with_exclude(mut self, exclude: Vec<String>) -> Self {
        self.exclude.extend(exclude);
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// `path` made absolute against `cwd`.
    pub fn absolute(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            crate::resolve::normalize_path(path)
        } else {
            crate::resolve::normalize_path(&self.cwd.join(path))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_filter_default_allows_all() {
        let filter = StyleFilter::default();
        for style in [
            ImportStyle::Static,
            ImportStyle::Dynamic,
            ImportStyle::Lazy,
            ImportStyle::Require,
        ] {
            assert!(filter.allows(style));
        }
    }

    #[test]
    fn test_style_filter_without() {
        let filter = StyleFilter::default()
            .without(ImportStyle::Require)
            .without(ImportStyle::Lazy);
        assert!(filter.allows(ImportStyle::Static));
        assert!(!filter.allows(ImportStyle::Require));
        assert!(!filter.allows(ImportStyle::Lazy));
    }

    #[test]
    fn test_batch_size_never_zero() {
        assert_eq!(ScanOptions::new().with_batch_size(0).batch_size, 1);
        assert_eq!(ScanOptions::new().batch_size, DEFAULT_BATCH_SIZE);
    }

    #[test]
    fn test_absolute_uses_cwd() {
        let options = ScanOptions::new().with_cwd("/work/app");
        assert_eq!(options.absolute(Path::new("src/../lib")), PathBuf::from("/work/app/lib"));
        assert_eq!(options.absolute(Path::new("/abs")), PathBuf::from("/abs"));
    }

    #[test]
    fn test_include_and_exclude_builders() {
        let options = ScanOptions::new()
            .with_include(vec![])
            .with_exclude(vec!["**/generated/**".to_string()]);
        assert_eq!(options.include.len(), DEFAULT_INCLUDE.len());
        assert!(options.exclude.contains(&"**/generated/**".to_string()));
        assert!(options.exclude.contains(&"**/node_modules/**".to_string()));
    }
}
