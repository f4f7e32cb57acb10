//! Project scanning.
//!
//! Every operation here walks a search root, parses each file once into a
//! per-operation [`ScanContext`], and then runs its own pass over the parsed
//! corpus:
//!
//! - [`find_files_importing`]: which files import a module, following barrels
//! - [`find_unused_files`]: files nothing imports
//! - [`build_import_map`]: forward and reverse import edges with stats
//! - [`build_report`]: all of the above from one scan
//!
//! Files are parsed in batches; [`BatchHooks`] is called between batches.

pub mod config;
pub mod context;
pub mod find;
pub mod map;
pub mod report;
pub mod unused;
pub mod walker;

pub use config::{ScanOptions, StyleFilter, DEFAULT_BATCH_SIZE, DEFAULT_EXCLUDE, DEFAULT_INCLUDE};
pub use context::{BatchHooks, FailedFile, NoHooks, ScanContext, ScanProgress};
pub use find::{find_files_importing, search, SearchReport};
#[cfg(feature = "async")]
pub use find::{find_files_importing_async, search_async};
pub use map::{build_import_map, FileCount, ImportMap, MapStats};
pub use report::{build_report, ProjectReport};
pub use unused::{find_unused_files, unused_report, UnusedFile, UnusedReason, UnusedReport};
pub use walker::{find_files, ScanError, ScanResult};
