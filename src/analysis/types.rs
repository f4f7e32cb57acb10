//! Record types produced by the syntax extractor.
//!
//! These mirror what a single source file says about its module
//! dependencies: which specifiers it imports, how, under which local names,
//! and what it exports or re-exports.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};

/// How an import is written in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportStyle {
    /// `import ... from 'module'`, `import 'module'`, `export ... from 'module'`
    Static,
    /// `import('module')`
    Dynamic,
    /// `lazy(() => import('module'))`, `dynamic(() => import('module'))`
    Lazy,
    /// `require('module')`
    Require,
}

impl fmt::Display for ImportStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static => write!(f, "static"),
            Self::Dynamic => write!(f, "dynamic"),
            Self::Lazy => write!(f, "lazy"),
            Self::Require => write!(f, "require"),
        }
    }
}

/// What part of the source module an import binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportKind {
    Named,
    Default,
    Namespace,
}

impl fmt::Display for ImportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named => write!(f, "named"),
            Self::Default => write!(f, "default"),
            Self::Namespace => write!(f, "namespace"),
        }
    }
}

/// A single name bound by an import.
///
/// `imported` is the name as the source module exports it (`default` for a
/// default binding, `*` for a namespace binding); `local` is the name bound in
/// the importing file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Binding {
    pub imported: String,
    pub local: String,
}

impl Binding {
    pub const DEFAULT: &'static str = "default";
    pub const NAMESPACE: &'static str = "*";

    pub fn new(imported: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            imported: imported.into(),
            local: local.into(),
        }
    }

    /// `import Foo from '...'`
    pub fn default_as(local: impl Into<String>) -> Self {
        Self::new(Self::DEFAULT, local)
    }

    /// `import * as ns from '...'`
    pub fn namespace_as(local: impl Into<String>) -> Self {
        Self::new(Self::NAMESPACE, local)
    }

    /// `import { name } from '...'`
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(name.clone(), name)
    }

    pub fn is_namespace(&self) -> bool {
        self.imported == Self::NAMESPACE
    }
}

/// The module an import specifier denotes once resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ModuleId {
    /// A project file: absolute, normalized, with a concrete extension.
    File(PathBuf),
    /// A bare package specifier, passed through unchanged.
    Package(String),
}

impl ModuleId {
    pub fn as_file(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            Self::Package(_) => None,
        }
    }

    pub fn is_package(&self) -> bool {
        matches!(self, Self::Package(_))
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Package(name) => write!(f, "{}", name),
        }
    }
}

impl Serialize for ModuleId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One import of one module in one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRecord {
    /// Literal text between the quotes; never resolved at extraction time.
    pub specifier: String,
    pub style: ImportStyle,
    /// 1-indexed
    pub line: usize,
    /// 1-indexed
    pub column: usize,
    pub bindings: Vec<Binding>,
    pub kind: ImportKind,
    /// The statement or call expression the import was read from.
    pub source_text: String,
    /// Filled in by the orchestrators, not by the extractor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved: Option<ModuleId>,
}

impl ImportRecord {
    /// Local names bound in the importing file, in source order.
    pub fn bound_names(&self) -> impl Iterator<Item = &str> {
        self.bindings.iter().map(|b| b.local.as_str())
    }

    /// Names as exported by the source module, in source order.
    pub fn imported_names(&self) -> impl Iterator<Item = &str> {
        self.bindings.iter().map(|b| b.imported.as_str())
    }

    /// True when nothing is bound (`import './styles.css'`, bare `require`).
    pub fn is_side_effect_only(&self) -> bool {
        self.bindings.is_empty()
    }

    /// True when the whole module object is bound, so individual names used
    /// downstream are unknown.
    pub fn binds_whole_module(&self) -> bool {
        self.kind == ImportKind::Namespace || self.bindings.iter().any(Binding::is_namespace)
    }

    /// Key used to collapse the same import reached twice.
    pub fn dedup_key(&self) -> (&str, usize, ImportStyle) {
        (self.specifier.as_str(), self.line, self.style)
    }
}

/// Whether an export is the module's default export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    Named,
    Default,
}

/// One exported name of a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRecord {
    pub exported_name: String,
    pub local_name: String,
    pub kind: ExportKind,
    /// Set only for `export ... from '...'`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub re_export_source: Option<String>,
}

impl ExportRecord {
    pub fn is_re_export(&self) -> bool {
        self.re_export_source.is_some()
    }

    /// `export * from '...'`
    pub fn is_star(&self) -> bool {
        self.exported_name == Binding::NAMESPACE
    }
}

/// Everything extracted from one file; the unit of the per-operation cache.
#[derive(Debug, Clone, Default)]
pub struct FileModule {
    pub path: PathBuf,
    pub imports: Vec<ImportRecord>,
    pub exports: Vec<ExportRecord>,
}

impl FileModule {
    pub fn has_re_exports(&self) -> bool {
        self.exports.iter().any(ExportRecord::is_re_export)
    }
}

/// All matching imports found in one consuming file.
#[derive(Debug, Clone, Serialize)]
pub struct ImporterResult {
    pub file: PathBuf,
    pub imports: Vec<ImportRecord>,
}

impl ImporterResult {
    pub fn new(file: impl Into<PathBuf>, imports: Vec<ImportRecord>) -> Self {
        Self {
            file: file.into(),
            imports,
        }
    }

    /// Append imports not already present by `(specifier, line, style)`.
    pub fn merge_imports(&mut self, imports: impl IntoIterator<Item = ImportRecord>) {
        for import in imports {
            if !self.imports.iter().any(|i| i.dedup_key() == import.dedup_key()) {
                self.imports.push(import);
            }
        }
    }
}
