//! Barrel detection.
//!
//! A barrel (usually `index.ts`) imports from sibling modules and exports
//! them again so consumers can import from the directory. A file is a barrel
//! *for a given target* only when one of its exports actually forwards
//! something it imported from that target.

use std::collections::BTreeSet;
use std::path::Path;

use crate::analysis::{Binding, FileModule, ImportRecord, ModuleId};
use crate::resolve::{module_matches, ModuleResolver};

/// Outcome of checking one candidate against one target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BarrelInfo {
    pub is_barrel: bool,
    /// Names under which the candidate exports the target's bindings. `*`
    /// means `export * from` the target.
    pub re_exported_names: BTreeSet<String>,
}

impl BarrelInfo {
    fn from_names(re_exported_names: BTreeSet<String>) -> Self {
        Self {
            is_barrel: !re_exported_names.is_empty(),
            re_exported_names,
        }
    }
}

/// Does `candidate` re-export anything from `target`?
pub fn is_barrel_for(candidate: &FileModule, target: &Path, resolver: &ModuleResolver) -> BarrelInfo {
    is_barrel_for_names(candidate, target, resolver, None)
}

/// Like [`is_barrel_for`], but only bindings whose name in `target` is in
/// `source_names` count. Used when `target` is itself a barrel that carries
/// just those names.
pub fn is_barrel_for_names(
    candidate: &FileModule,
    target: &Path,
    resolver: &ModuleResolver,
    source_names: Option<&BTreeSet<String>>,
) -> BarrelInfo {
    let target_imports: Vec<&ImportRecord> = candidate
        .imports
        .iter()
        .filter(|import| {
            resolved(import, &candidate.path, resolver).is_some_and(|id| module_matches(&id, target))
        })
        .collect();

    if target_imports.is_empty() {
        return BarrelInfo::default();
    }

    let carries = |name: &str| {
        name == Binding::NAMESPACE
            || source_names.map_or(true, |names| {
                names.contains(Binding::NAMESPACE) || names.contains(name)
            })
    };

    let mut names = BTreeSet::new();
    for export in &candidate.exports {
        match &export.re_export_source {
            Some(source) => {
                let from_target = resolver
                    .resolve(source, &candidate.path)
                    .is_some_and(|id| module_matches(&id, target));
                if !from_target {
                    continue;
                }
                if export.is_star() {
                    // `export * from` forwards whatever the target carries.
                    match source_names {
                        Some(carried) if !carried.contains(Binding::NAMESPACE) => {
                            names.extend(carried.iter().cloned())
                        }
                        _ => {
                            names.insert(Binding::NAMESPACE.to_string());
                        }
                    }
                } else if carries(&export.local_name) {
                    names.insert(export.exported_name.clone());
                }
            }
            None => {
                let forwards = target_imports.iter().any(|import| {
                    import
                        .bindings
                        .iter()
                        .any(|b| b.local == export.local_name && carries(&b.imported))
                });
                if forwards {
                    names.insert(export.exported_name.clone());
                }
            }
        }
    }

    BarrelInfo::from_names(names)
}

/// The import's resolution, computing it when the record was never resolved.
pub(crate) fn resolved(import: &ImportRecord, file: &Path, resolver: &ModuleResolver) -> Option<ModuleId> {
    import
        .resolved
        .clone()
        .or_else(|| resolver.resolve(&import.specifier, file))
}
