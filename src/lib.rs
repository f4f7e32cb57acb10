//! importscope - find every file that imports a JavaScript/TypeScript module
//!
//! Given a module name or a target file, importscope scans a project tree and
//! reports each file that imports it, with the exact import records. Imports
//! that arrive through barrel files (`index.ts` re-exporting a component) are
//! traced back to their real consumers.
//!
//! The same parsed corpus also answers which files nothing imports and what
//! the full import graph looks like.
//!
//! ```ignore
//! use std::path::Path;
//! use importscope::scan::{find_files_importing, NoHooks, ScanOptions};
//!
//! let options = ScanOptions::new().with_module_path("src/components/Button.tsx");
//! let results = find_files_importing(None, Path::new("src"), &options, &mut NoHooks)?;
//! for result in &results {
//!     println!("{}: {} import(s)", result.file.display(), result.imports.len());
//! }
//! ```

pub mod analysis;
pub mod export;
pub mod graph;
pub mod resolve;
pub mod scan;

pub use analysis::{Binding, ImportKind, ImportRecord, ImportStyle, ImporterResult, ModuleId};
pub use resolve::{paths_match, ModuleResolver};
pub use scan::{
    build_import_map, build_report, find_files_importing, find_unused_files, ScanError,
    ScanOptions, ScanResult,
};
