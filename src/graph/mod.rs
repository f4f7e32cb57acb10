//! Relationships between parsed files.
//!
//! [`barrel`] decides whether a file forwards another file's exports,
//! [`consumers`] finds the files importing through such a barrel, and
//! [`import_map`] holds the whole corpus as a directed graph.
//!
//! # Example
//!
//! ```rust
//! use importscope::analysis::{ImportStyle, ModuleId};
//! use importscope::graph::{ImportEdge, ImportGraph};
//! use std::path::{Path, PathBuf};
//!
//! let mut graph = ImportGraph::new();
//! let utils = ModuleId::File(PathBuf::from("/app/utils.ts"));
//! graph.add_import(Path::new("/app/a.ts"), &utils, ImportEdge::new(ImportStyle::Static, 1));
//! graph.add_import(Path::new("/app/b.ts"), &utils, ImportEdge::new(ImportStyle::Require, 4));
//!
//! assert_eq!(graph.import_count(Path::new("/app/utils.ts")), 2);
//! ```

pub mod barrel;
pub mod consumers;
pub mod import_map;

pub use barrel::{is_barrel_for, is_barrel_for_names, BarrelInfo};
pub use consumers::{find_consumers, uses_any, VisitedBarrels};
pub use import_map::{ImportEdge, ImportGraph};
