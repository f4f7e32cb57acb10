//! File-level import graph using petgraph.
//!
//! Nodes are module identities (project files and bare packages), edges point
//! from the importing file to what it imports. One edge per import record, so
//! a file importing the same module twice contributes two edges.

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::analysis::{ImportStyle, ModuleId};
use crate::resolve::path_key;

/// One import edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportEdge {
    pub style: ImportStyle,
    /// 1-indexed line of the import in the importing file
    pub line: usize,
}

impl ImportEdge {
    pub fn new(style: ImportStyle, line: usize) -> Self {
        Self { style, line }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum NodeKey {
    File(String),
    Package(String),
}

impl NodeKey {
    fn of(id: &ModuleId) -> Self {
        match id {
            ModuleId::File(path) => Self::File(path_key(path)),
            ModuleId::Package(name) => Self::Package(name.clone()),
        }
    }
}

/// A directed graph of imports between modules.
///
/// Files are keyed by [`path_key`], so `Foo.ts` and `Foo` are one node.
///
/// # Example
///
/// ```rust
/// use importscope::analysis::{ImportStyle, ModuleId};
/// use importscope::graph::{ImportEdge, ImportGraph};
/// use std::path::{Path, PathBuf};
///
/// let mut graph = ImportGraph::new();
/// let button = ModuleId::File(PathBuf::from("/app/Button.tsx"));
/// graph.add_import(Path::new("/app/App.tsx"), &button, ImportEdge::new(ImportStyle::Static, 1));
/// graph.add_import(Path::new("/app/App.tsx"), &ModuleId::Package("react".into()), ImportEdge::new(ImportStyle::Static, 2));
///
/// assert_eq!(graph.node_count(), 3);
/// assert_eq!(graph.importers_of(Path::new("/app/Button.tsx")), vec![Path::new("/app/App.tsx")]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ImportGraph {
    graph: DiGraph<ModuleId, ImportEdge>,
    node_indices: HashMap<NodeKey, NodeIndex>,
}

impl ImportGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate for a corpus of roughly `files` files and `imports` edges.
    pub fn with_capacity(files: usize, imports: usize) -> Self {
        Self {
            graph: DiGraph::with_capacity(files, imports),
            node_indices: HashMap::with_capacity(files),
        }
    }

    /// Adds a module, returning the existing node if it is already present.
    pub fn add_module(&mut self, id: &ModuleId) -> NodeIndex {
        let key = NodeKey::of(id);
        if let Some(&idx) = self.node_indices.get(&key) {
            return idx;
        }
        let idx = self.graph.add_node(id.clone());
        self.node_indices.insert(key, idx);
        idx
    }

    pub fn add_file(&mut self, path: &Path) -> NodeIndex {
        self.add_module(&ModuleId::File(path.to_path_buf()))
    }

    /// Records that `from` imports `to`. Both nodes are created as needed.
    pub fn add_import(&mut self, from: &Path, to: &ModuleId, edge: ImportEdge) {
        let from_idx = self.add_file(from);
        let to_idx = self.add_module(to);
        self.graph.add_edge(from_idx, to_idx, edge);
    }

    fn file_index(&self, path: &Path) -> Option<NodeIndex> {
        self.node_indices.get(&NodeKey::File(path_key(path))).copied()
    }

    pub fn contains_file(&self, path: &Path) -> bool {
        self.file_index(path).is_some()
    }

    /// Modules imported by `path`, deduplicated, in insertion order.
    pub fn imports_of(&self, path: &Path) -> Vec<&ModuleId> {
        let Some(idx) = self.file_index(path) else {
            return Vec::new();
        };
        let mut targets: Vec<NodeIndex> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|edge| edge.target())
            .collect();
        // petgraph walks edges newest first
        targets.reverse();
        let mut seen = HashSet::new();
        targets
            .into_iter()
            .filter(|t| seen.insert(*t))
            .filter_map(|t| self.graph.node_weight(t))
            .collect()
    }

    /// Files importing `path`, deduplicated and sorted.
    pub fn importers_of(&self, path: &Path) -> Vec<&Path> {
        let Some(idx) = self.file_index(path) else {
            return Vec::new();
        };
        let mut importers: Vec<&Path> = self
            .graph
            .edges_directed(idx, Direction::Incoming)
            .filter_map(|edge| self.graph.node_weight(edge.source()))
            .filter_map(ModuleId::as_file)
            .collect();
        importers.sort();
        importers.dedup();
        importers
    }

    /// Number of import edges pointing at `path`.
    pub fn import_count(&self, path: &Path) -> usize {
        self.file_index(path)
            .map(|idx| self.graph.edges_directed(idx, Direction::Incoming).count())
            .unwrap_or(0)
    }

    /// Every file node with the number of edges pointing at it.
    pub fn file_counts(&self) -> Vec<(&Path, usize)> {
        self.graph
            .node_indices()
            .filter_map(|idx| {
                let path = self.graph.node_weight(idx)?.as_file()?;
                Some((path, self.graph.edges_directed(idx, Direction::Incoming).count()))
            })
            .collect()
    }

    /// Groups of files that import each other, directly or indirectly.
    ///
    /// Each group is sorted; groups are sorted by their first file. A file
    /// importing itself is a group of one.
    pub fn detect_cycles(&self) -> Vec<Vec<PathBuf>> {
        let mut cycles: Vec<Vec<PathBuf>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| scc.len() > 1 || self.graph.contains_edge(scc[0], scc[0]))
            .map(|scc| {
                let mut files: Vec<PathBuf> = scc
                    .iter()
                    .filter_map(|&idx| self.graph.node_weight(idx))
                    .filter_map(|id| id.as_file().map(Path::to_path_buf))
                    .collect();
                files.sort();
                files
            })
            .filter(|files| !files.is_empty())
            .collect();
        cycles.sort();
        cycles
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str) -> ModuleId {
        ModuleId::File(PathBuf::from(path))
    }

    fn edge(line: usize) -> ImportEdge {
        ImportEdge::new(ImportStyle::Static, line)
    }

    #[test]
    fn test_create_empty_graph() {
        let graph = ImportGraph::new();
        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_nodes_unified_by_path_key() {
        let mut graph = ImportGraph::new();
        let a = graph.add_module(&file("/p/src/Foo.ts"));
        let b = graph.add_module(&file("/p/src/./Foo"));
        assert_eq!(a, b);
        assert_eq!(graph.node_count(), 1);
        assert!(graph.contains_file(Path::new("/p/src/Foo.tsx")));
    }

    #[test]
    fn test_package_and_file_nodes_are_distinct() {
        let mut graph = ImportGraph::new();
        graph.add_module(&ModuleId::Package("react".into()));
        graph.add_module(&file("react"));
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn test_imports_and_importers() {
        let mut graph = ImportGraph::new();
        graph.add_import(Path::new("/p/App.tsx"), &file("/p/Button.tsx"), edge(1));
        graph.add_import(Path::new("/p/App.tsx"), &file("/p/Card.tsx"), edge(2));
        graph.add_import(Path::new("/p/App.tsx"), &file("/p/Button.tsx"), edge(3));
        graph.add_import(Path::new("/p/Page.tsx"), &file("/p/Button.tsx"), edge(1));

        let imports: Vec<String> = graph
            .imports_of(Path::new("/p/App.tsx"))
            .iter()
            .map(|id| id.to_string())
            .collect();
        assert_eq!(imports, vec!["/p/Button.tsx", "/p/Card.tsx"]);

        assert_eq!(
            graph.importers_of(Path::new("/p/Button.tsx")),
            vec![Path::new("/p/App.tsx"), Path::new("/p/Page.tsx")]
        );
        assert_eq!(graph.import_count(Path::new("/p/Button.tsx")), 3);
        assert_eq!(graph.import_count(Path::new("/p/Missing.tsx")), 0);
    }

    #[test]
    fn test_detect_cycles() {
        let mut graph = ImportGraph::new();
        graph.add_import(Path::new("/p/a.ts"), &file("/p/b.ts"), edge(1));
        graph.add_import(Path::new("/p/b.ts"), &file("/p/c.ts"), edge(1));
        graph.add_import(Path::new("/p/c.ts"), &file("/p/a.ts"), edge(1));
        graph.add_import(Path::new("/p/a.ts"), &file("/p/d.ts"), edge(2));
        graph.add_import(Path::new("/p/self.ts"), &file("/p/self.ts"), edge(1));

        let cycles = graph.detect_cycles();
        assert_eq!(
            cycles,
            vec![
                vec![PathBuf::from("/p/a.ts"), PathBuf::from("/p/b.ts"), PathBuf::from("/p/c.ts")],
                vec![PathBuf::from("/p/self.ts")],
            ]
        );
    }

    #[test]
    fn test_no_cycles() {
        let mut graph = ImportGraph::new();
        graph.add_import(Path::new("/p/a.ts"), &file("/p/b.ts"), edge(1));
        graph.add_import(Path::new("/p/a.ts"), &ModuleId::Package("react".into()), edge(2));
        assert!(graph.detect_cycles().is_empty());
    }
}
