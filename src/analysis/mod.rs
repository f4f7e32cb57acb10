//! Source code analysis module for importscope.
//!
//! This module turns JavaScript/TypeScript source files into import and
//! export records. Parsing is done with tree-sitter; the adapter in
//! [`syntax`] reduces the tree to a closed set of [`syntax::ModuleItem`]
//! variants and [`extract`] turns those into records.
//!
//! # Features
//!
//! - Static `import` statements (default, named, namespace, side-effect)
//! - Dynamic `import()` calls, including destructured bindings
//! - Lazy wrappers: `lazy(() => import(...))`, `dynamic(...)`, `loadable(...)`
//! - CommonJS `require()` calls
//! - Local exports and `export ... from` re-exports
//! - `<script>` blocks of `.vue` and `.svelte` files
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use importscope::analysis::ImportAnalyzer;
//!
//! let mut analyzer = ImportAnalyzer::new()?;
//! let module = analyzer.analyze_file(Path::new("src/index.ts"))?;
//!
//! for import in &module.imports {
//!     println!("{} ({}) line {}", import.specifier, import.style, import.line);
//! }
//! ```

pub mod extract;
pub mod syntax;
pub mod types;

pub use extract::{AnalysisError, AnalysisResult, ImportAnalyzer};
pub use syntax::SourceLanguage;
pub use types::{
    Binding, ExportKind, ExportRecord, FileModule, ImportKind, ImportRecord, ImportStyle,
    ImporterResult, ModuleId,
};
