//! Bidirectional import map of a project.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use super::config::ScanOptions;
use super::context::{BatchHooks, FailedFile, ScanContext};
use super::walker::{find_files, ScanResult};
use crate::analysis::{ImportRecord, ModuleId};
use crate::graph::{ImportEdge, ImportGraph};

/// A file and how often it is imported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileCount {
    pub file: PathBuf,
    pub count: usize,
}

/// Summary numbers of an [`ImportMap`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapStats {
    pub total_files: usize,
    pub total_imports: usize,
    pub resolved_imports: usize,
    pub unresolved_imports: usize,
    pub package_imports: usize,
    pub most_imported: Vec<FileCount>,
    pub least_imported: Vec<FileCount>,
    /// Groups of files importing each other.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub circular: Vec<Vec<PathBuf>>,
}

/// Forward and reverse import edges of every parsed file.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportMap {
    pub root: PathBuf,
    pub imports: BTreeMap<PathBuf, Vec<ImportRecord>>,
    pub imported_by: BTreeMap<PathBuf, Vec<PathBuf>>,
    pub stats: MapStats,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<FailedFile>,
}

pub fn build_import_map(
    root: &Path,
    options: &ScanOptions,
    hooks: &mut dyn BatchHooks,
) -> ScanResult<ImportMap> {
    let root = &options.absolute(root);
    let files = find_files(root, &options.include, &options.exclude)?;
    let mut ctx = ScanContext::for_root(root, options)?;
    ctx.load_all(&files, options.batch_size, hooks);

    let mut map = import_map_in(&ctx, options);
    map.failed = ctx.into_failed();
    Ok(map)
}

/// Import map of an already loaded context.
pub(crate) fn import_map_in(ctx: &ScanContext, options: &ScanOptions) -> ImportMap {
    let mut graph = ImportGraph::with_capacity(ctx.len(), ctx.len() * 4);
    let mut imports = BTreeMap::new();
    let mut stats = MapStats {
        total_files: ctx.len(),
        ..MapStats::default()
    };

    for module in ctx.corpus() {
        graph.add_file(&module.path);
        let kept: Vec<ImportRecord> = module
            .imports
            .iter()
            .filter(|import| options.styles.allows(import.style))
            .cloned()
            .collect();

        for import in &kept {
            stats.total_imports += 1;
            match &import.resolved {
                Some(id @ ModuleId::File(_)) => {
                    stats.resolved_imports += 1;
                    graph.add_import(&module.path, id, ImportEdge::new(import.style, import.line));
                }
                Some(ModuleId::Package(_)) => stats.package_imports += 1,
                None => stats.unresolved_imports += 1,
            }
        }
        imports.insert(module.path.clone(), kept);
    }

    let counts = graph.file_counts();
    let mut imported_by = BTreeMap::new();
    for (file, count) in &counts {
        if *count == 0 {
            continue;
        }
        let importers: Vec<PathBuf> = graph
            .importers_of(file)
            .into_iter()
            .map(Path::to_path_buf)
            .collect();
        imported_by.insert(file.to_path_buf(), importers);
    }

    let mut ranked: Vec<FileCount> = counts
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(file, count)| FileCount {
            file: file.to_path_buf(),
            count,
        })
        .collect();

    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.file.cmp(&b.file)));
    stats.most_imported = ranked.iter().take(options.stats_limit).cloned().collect();

    ranked.sort_by(|a, b| a.count.cmp(&b.count).then_with(|| a.file.cmp(&b.file)));
    stats.least_imported = ranked.iter().take(options.stats_limit).cloned().collect();

    stats.circular = graph.detect_cycles();

    info!(
        root = %ctx.root().display(),
        files = stats.total_files,
        imports = stats.total_imports,
        edges = graph.edge_count(),
        "import map built"
    );

    ImportMap {
        root: ctx.root().to_path_buf(),
        imports,
        imported_by,
        stats,
        failed: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ImportStyle;
    use crate::resolve::paths_match;
    use crate::scan::config::StyleFilter;
    use crate::scan::context::NoHooks;
    use std::collections::BTreeSet;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, files: &[(&str, &str)]) {
        for (rel, source) in files {
            let path = dir.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, source).unwrap();
        }
    }

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            &[
                ("src/App.tsx", "import React from 'react';\nimport { Button } from './ui/Button';\nimport { format } from './utils';\nconst Page = lazy(() => import('./Page'));"),
                ("src/Page.tsx", "import { Button } from './ui/Button';\nimport { missing } from './nope';"),
                ("src/ui/Button.tsx", "import { format } from '../utils';\nexport const Button = 1;"),
                ("src/utils.ts", "const path = require('path');\nexport const format = 1;"),
                ("src/ui/Card.tsx", "import { Button } from './Button';\nimport { Button as B } from './Button';"),
            ],
        );
        dir
    }

    fn build(dir: &TempDir, options: ScanOptions) -> ImportMap {
        build_import_map(dir.path(), &options.with_cwd(dir.path()), &mut NoHooks).unwrap()
    }

    #[test]
    fn test_bidirectional_consistency() {
        let dir = project();
        let map = build(&dir, ScanOptions::new());

        // Every forward edge to a file appears as a reverse edge.
        for (file, imports) in &map.imports {
            for import in imports {
                if let Some(ModuleId::File(target)) = &import.resolved {
                    let key = map
                        .imported_by
                        .keys()
                        .find(|k| paths_match(k, target))
                        .expect("target missing from imported_by");
                    assert!(map.imported_by[key].contains(file));
                }
            }
        }

        // Every reverse edge is backed by a forward edge.
        for (target, importers) in &map.imported_by {
            let expected: BTreeSet<&PathBuf> = map
                .imports
                .iter()
                .filter(|(_, imports)| {
                    imports.iter().any(|i| {
                        matches!(&i.resolved, Some(ModuleId::File(p)) if paths_match(p, target))
                    })
                })
                .map(|(file, _)| file)
                .collect();
            let actual: BTreeSet<&PathBuf> = importers.iter().collect();
            assert_eq!(actual, expected, "importers of {}", target.display());
        }
    }

    #[test]
    fn test_relative_root_keys_are_absolute() {
        let dir = project();
        let options = ScanOptions::new().with_cwd(dir.path());
        let map = build_import_map(Path::new("src"), &options, &mut NoHooks).unwrap();

        assert_eq!(map.root, dir.path().join("src"));
        assert!(map.imports.keys().all(|file| file.is_absolute()));
        assert_eq!(map.imported_by[&dir.path().join("src/ui/Button.tsx")].len(), 3);
    }

    #[test]
    fn test_counts_and_stats() {
        let dir = project();
        let map = build(&dir, ScanOptions::new());
        let root = dir.path();

        assert_eq!(map.stats.total_files, 5);
        assert_eq!(map.stats.total_imports, 10);
        assert_eq!(map.stats.package_imports, 2);
        assert_eq!(map.stats.unresolved_imports, 1);
        assert_eq!(map.stats.resolved_imports, 7);

        assert_eq!(
            map.stats.most_imported[0],
            FileCount {
                file: root.join("src/ui/Button.tsx"),
                count: 4,
            }
        );
        assert_eq!(
            map.imported_by[&root.join("src/ui/Button.tsx")],
            vec![
                root.join("src/App.tsx"),
                root.join("src/Page.tsx"),
                root.join("src/ui/Card.tsx"),
            ]
        );
        assert_eq!(
            map.stats.least_imported[0],
            FileCount {
                file: root.join("src/Page.tsx"),
                count: 1,
            }
        );
        assert!(!map.imported_by.contains_key(&root.join("src/App.tsx")));
        assert!(map.stats.circular.is_empty());
    }

    #[test]
    fn test_every_parsed_file_has_forward_entry() {
        let dir = project();
        let map = build(&dir, ScanOptions::new());
        assert_eq!(map.imports.len(), 5);
        assert!(map.imports[&dir.path().join("src/utils.ts")]
            .iter()
            .any(|i| i.style == ImportStyle::Require));
    }

    #[test]
    fn test_style_filter_and_limit() {
        let dir = project();
        let options = ScanOptions::new().with_styles(
            StyleFilter::default()
                .without(ImportStyle::Require)
                .without(ImportStyle::Lazy),
        );
        let options = ScanOptions {
            stats_limit: 1,
            ..options
        };
        let map = build(&dir, options);

        assert_eq!(map.stats.total_imports, 8);
        assert_eq!(map.stats.package_imports, 1);
        assert!(!map.imported_by.contains_key(&dir.path().join("src/Page.tsx")));
        assert_eq!(map.stats.most_imported.len(), 1);
        assert_eq!(map.stats.least_imported.len(), 1);
    }

    #[test]
    fn test_circular_imports_reported() {
        let dir = TempDir::new().unwrap();
        write(&dir, &[("a.ts", "import './b';"), ("b.ts", "import './a';"), ("c.ts", "import './a';")]);
        let map = build(&dir, ScanOptions::new());

        assert_eq!(
            map.stats.circular,
            vec![vec![dir.path().join("a.ts"), dir.path().join("b.ts")]]
        );
    }
}
