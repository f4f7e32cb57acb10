//! Module resolution.
//!
//! Maps import specifiers to canonical file identities and decides whether
//! two paths denote the same file.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use importscope::resolve::{ModuleResolver, paths_match};
//!
//! let resolver = ModuleResolver::new(None);
//! let id = resolver.resolve("./components/Test", Path::new("/app/src/App.tsx"));
//! assert!(paths_match(Path::new("/app/src/Foo.ts"), Path::new("/app/src/Foo.tsx")));
//! ```

pub mod resolver;
pub mod tsconfig;

pub use resolver::{
    basename_without_extension, is_relative, module_matches, normalize_path, path_key, paths_match,
    ModuleResolver, DEFAULT_EXTENSIONS,
};
pub use tsconfig::discover_base_dir;
