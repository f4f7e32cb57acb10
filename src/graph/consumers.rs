//! Consumers of a barrel.
//!
//! Given a barrel and the names it forwards from a target, find every other
//! file in the already parsed corpus that imports one of those names through
//! the barrel. Nothing here parses files.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use tracing::trace;

use super::barrel::resolved;
use crate::analysis::{Binding, FileModule, ImportRecord, ImporterResult};
use crate::resolve::{module_matches, path_key, paths_match, ModuleResolver};

/// Barrels already expanded within one operation.
#[derive(Debug, Default, Clone)]
pub struct VisitedBarrels {
    keys: HashSet<String>,
}

impl VisitedBarrels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `barrel` visited; false when it already was.
    pub fn insert(&mut self, barrel: &Path) -> bool {
        self.keys.insert(path_key(barrel))
    }

    pub fn contains(&self, barrel: &Path) -> bool {
        self.keys.contains(&path_key(barrel))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Could `import` be using one of `re_exported_names`?
///
/// Imports that bind nothing or the whole module cannot be proven unrelated
/// and count as uses.
pub fn uses_any(import: &ImportRecord, re_exported_names: &BTreeSet<String>) -> bool {
    import.is_side_effect_only()
        || import.binds_whole_module()
        || re_exported_names.contains(Binding::NAMESPACE)
        || import.imported_names().any(|name| re_exported_names.contains(name))
}

/// Every file importing forwarded names from `barrel`, in corpus order.
///
/// Returns nothing when `barrel` was already expanded, which stops circular
/// barrel chains.
pub fn find_consumers<'a>(
    barrel: &Path,
    re_exported_names: &BTreeSet<String>,
    corpus: impl IntoIterator<Item = &'a FileModule>,
    resolver: &ModuleResolver,
    visited: &mut VisitedBarrels,
) -> Vec<ImporterResult> {
    if !visited.insert(barrel) {
        trace!(barrel = %barrel.display(), "already expanded");
        return Vec::new();
    }

    corpus
        .into_iter()
        .filter(|module| !paths_match(&module.path, barrel))
        .filter_map(|module| {
            let imports: Vec<ImportRecord> = module
                .imports
                .iter()
                .filter(|import| {
                    resolved(import, &module.path, resolver)
                        .is_some_and(|id| module_matches(&id, barrel))
                })
                .filter(|import| uses_any(import, re_exported_names))
                .cloned()
                .collect();
            (!imports.is_empty()).then(|| ImporterResult::new(module.path.clone(), imports))
        })
        .collect()
}
