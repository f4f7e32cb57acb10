//! tree-sitter adapter.
//!
//! Walks a parsed tree and reduces every import- or export-shaped node to a
//! [`ModuleItem`]. Nothing outside this module looks at tree-sitter node
//! kinds, so the extractor works on a closed set of variants instead of the
//! grammar's internal shapes.

use std::path::Path;

use tree_sitter::{Language, Node, Parser, Tree, TreeCursor};

use super::extract::{AnalysisError, AnalysisResult};
use super::types::{Binding, ImportKind};

/// Call names that wrap a dynamic `import()` in a lazily loaded component.
const LAZY_WRAPPERS: &[&str] = &["lazy", "dynamic", "loadable", "lazyWithPreload", "defineAsyncComponent"];

/// Language type for file analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLanguage {
    JavaScript,
    Jsx,
    TypeScript,
    Tsx,
    /// Single-file component; `<script>` blocks are parsed.
    Vue,
    Svelte,
}

impl SourceLanguage {
    /// Determine language from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "js" | "mjs" | "cjs" => Some(SourceLanguage::JavaScript),
            "jsx" => Some(SourceLanguage::Jsx),
            "ts" | "mts" | "cts" => Some(SourceLanguage::TypeScript),
            "tsx" => Some(SourceLanguage::Tsx),
            "vue" => Some(SourceLanguage::Vue),
            "svelte" => Some(SourceLanguage::Svelte),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Markup files embed their code in `<script>` blocks.
    pub fn is_markup(&self) -> bool {
        matches!(self, SourceLanguage::Vue | SourceLanguage::Svelte)
    }
}

/// Grammar used for one chunk of script source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    JavaScript,
    TypeScript,
    Tsx,
}

impl Dialect {
    fn language(self) -> Language {
        match self {
            Dialect::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Dialect::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Dialect::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

impl From<SourceLanguage> for Dialect {
    fn from(language: SourceLanguage) -> Self {
        match language {
            SourceLanguage::JavaScript | SourceLanguage::Jsx => Dialect::JavaScript,
            SourceLanguage::TypeScript => Dialect::TypeScript,
            SourceLanguage::Tsx => Dialect::Tsx,
            SourceLanguage::Vue | SourceLanguage::Svelte => Dialect::JavaScript,
        }
    }
}

/// 1-indexed position in the original file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourcePos {
    pub line: usize,
    pub column: usize,
}

impl SourcePos {
    fn of(node: &Node, line_offset: usize) -> Self {
        let point = node.start_position();
        Self {
            line: point.row + 1 + line_offset,
            column: point.column + 1,
        }
    }
}

/// Where an import-shaped node came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSite {
    pub specifier: String,
    pub bindings: Vec<Binding>,
    pub kind: ImportKind,
    pub pos: SourcePos,
    pub text: String,
}

/// The import/export constructs the rest of the crate understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleItem {
    /// `import x, { y } from 'm'`, `import 'm'`, `import x = require('m')`
    StaticImport(ImportSite),
    /// `import('m')` not wrapped in a lazy loader
    DynamicImport(ImportSite),
    /// `lazy(() => import('m'))` and friends
    LazyImport(ImportSite),
    /// `require('m')`
    Require(ImportSite),
    /// `export const a = 1`, `export function f() {}`
    ExportDeclaration { names: Vec<String> },
    /// `export { a, b as c }`; pairs are `(local, exported)`
    ExportClause { specifiers: Vec<(String, String)> },
    /// `export default x`; `local` is the bound identifier when there is one
    ExportDefault { local: Option<String> },
    /// `export { a as b } from 'm'`; pairs are `(name in m, exported)`
    ReExport { site: ImportSite, specifiers: Vec<(String, String)> },
    /// `export * from 'm'` or `export * as ns from 'm'`
    ReExportAll { site: ImportSite, alias: Option<String> },
}

/// Holds one tree-sitter parser per dialect.
pub struct SyntaxParser {
    js_parser: Parser,
    ts_parser: Parser,
    tsx_parser: Parser,
}

impl SyntaxParser {
    pub fn new() -> AnalysisResult<Self> {
        Ok(Self {
            js_parser: parser_for(Dialect::JavaScript)?,
            ts_parser: parser_for(Dialect::TypeScript)?,
            tsx_parser: parser_for(Dialect::Tsx)?,
        })
    }

    /// Parse one chunk of script source and reduce it to module items.
    ///
    /// `line_offset` shifts reported lines, for script blocks embedded in
    /// markup files.
    pub fn parse(
        &mut self,
        source: &str,
        dialect: Dialect,
        line_offset: usize,
        path: &Path,
    ) -> AnalysisResult<Vec<ModuleItem>> {
        let parser = match dialect {
            Dialect::JavaScript => &mut self.js_parser,
            Dialect::TypeScript => &mut self.ts_parser,
            Dialect::Tsx => &mut self.tsx_parser,
        };

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| AnalysisError::ParseError {
                path: path.display().to_string(),
                line: 0,
                column: 0,
            })?;

        if tree.root_node().has_error() {
            let pos = first_error(tree.root_node())
                .map(|n| SourcePos::of(&n, line_offset))
                .unwrap_or_default();
            return Err(AnalysisError::ParseError {
                path: path.display().to_string(),
                line: pos.line,
                column: pos.column,
            });
        }

        Ok(collect_items(&tree, source, line_offset))
    }
}

fn parser_for(dialect: Dialect) -> AnalysisResult<Parser> {
    let mut parser = Parser::new();
    parser
        .set_language(&dialect.language())
        .map_err(|_| AnalysisError::LanguageInit)?;
    Ok(parser)
}

fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|c| c.has_error() || c.is_missing())
        .find_map(first_error)
}

fn collect_items(tree: &Tree, source: &str, line_offset: usize) -> Vec<ModuleItem> {
    let visitor = Visitor {
        source,
        line_offset,
    };
    let mut items = Vec::new();
    let mut cursor = tree.root_node().walk();
    visitor.visit_node(&mut cursor, &mut items);
    items
}

struct Visitor<'s> {
    source: &'s str,
    line_offset: usize,
}

impl<'s> Visitor<'s> {
    /// Recursively visit nodes to find imports and exports.
    fn visit_node(&self, cursor: &mut TreeCursor, items: &mut Vec<ModuleItem>) {
        let node = cursor.node();

        match node.kind() {
            "import_statement" => {
                if let Some(site) = self.parse_import_statement(&node) {
                    items.push(ModuleItem::StaticImport(site));
                }
            }
            "export_statement" => {
                if let Some(item) = self.parse_export_statement(&node) {
                    items.push(item);
                }
            }
            "call_expression" => {
                if let Some(item) = self.parse_call(&node) {
                    items.push(item);
                }
            }
            _ => {}
        }

        if cursor.goto_first_child() {
            loop {
                self.visit_node(cursor, items);
                if !cursor.goto_next_sibling() {
                    break;
                }
            }
            cursor.goto_parent();
        }
    }

    fn site(&self, node: &Node, specifier: String, bindings: Vec<Binding>, kind: ImportKind) -> ImportSite {
        ImportSite {
            specifier,
            bindings,
            kind,
            pos: SourcePos::of(node, self.line_offset),
            text: self.node_text(node).unwrap_or_default().to_string(),
        }
    }

    fn parse_import_statement(&self, node: &Node) -> Option<ImportSite> {
        let mut bindings = Vec::new();
        let mut specifier = node
            .child_by_field_name("source")
            .and_then(|s| self.string_value(&s));

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "import_clause" => self.parse_import_clause(&child, &mut bindings),
                "import_require_clause" => {
                    // import x = require('m')
                    let mut inner = child.walk();
                    for part in child.children(&mut inner) {
                        match part.kind() {
                            "identifier" => {
                                if let Some(name) = self.node_text(&part) {
                                    bindings.push(Binding::namespace_as(name));
                                }
                            }
                            "string" => specifier = self.string_value(&part),
                            _ => {}
                        }
                    }
                }
                "string" if specifier.is_none() => specifier = self.string_value(&child),
                _ => {}
            }
        }

        let specifier = specifier?;
        let kind = kind_of(&bindings);
        Some(self.site(node, specifier, bindings, kind))
    }

    /// Parse the import clause (everything between 'import' and 'from').
    fn parse_import_clause(&self, node: &Node, bindings: &mut Vec<Binding>) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "identifier" => {
                    if let Some(name) = self.node_text(&child) {
                        bindings.push(Binding::default_as(name));
                    }
                }
                "namespace_import" => {
                    let mut inner = child.walk();
                    let name = child
                        .children(&mut inner)
                        .find(|c| c.kind() == "identifier")
                        .and_then(|c| self.node_text(&c));
                    if let Some(name) = name {
                        bindings.push(Binding::namespace_as(name));
                    }
                }
                "named_imports" => {
                    let mut inner = child.walk();
                    for spec in child.children(&mut inner) {
                        if spec.kind() != "import_specifier" {
                            continue;
                        }
                        if let Some((name, alias)) = self.name_and_alias(&spec) {
                            bindings.push(Binding::new(name, alias));
                        }
                    }
                }
                _ => {}
            }
        }
    }

    /// `name` / `name as alias` in import and export specifiers.
    fn name_and_alias(&self, node: &Node) -> Option<(String, String)> {
        let name = node
            .child_by_field_name("name")
            .and_then(|n| self.identifier_or_string(&n))?;
        let alias = node
            .child_by_field_name("alias")
            .and_then(|n| self.identifier_or_string(&n))
            .unwrap_or_else(|| name.clone());
        Some((name, alias))
    }

    fn parse_export_statement(&self, node: &Node) -> Option<ModuleItem> {
        let source = node
            .child_by_field_name("source")
            .and_then(|s| self.string_value(&s));

        let mut cursor = node.walk();
        let children: Vec<_> = node.children(&mut cursor).collect();

        if let Some(source) = source {
            if let Some(clause) = children.iter().find(|c| c.kind() == "export_clause") {
                let specifiers = self.export_specifiers(clause);
                let bindings = specifiers
                    .iter()
                    .map(|(name, _)| match name.as_str() {
                        Binding::DEFAULT => Binding::default_as(Binding::DEFAULT),
                        _ => Binding::named(name.clone()),
                    })
                    .collect::<Vec<_>>();
                let kind = kind_of(&bindings);
                return Some(ModuleItem::ReExport {
                    site: self.site(node, source, bindings, kind),
                    specifiers,
                });
            }

            let alias = children
                .iter()
                .find(|c| c.kind() == "namespace_export")
                .and_then(|ns| {
                    let mut inner = ns.walk();
                    let found = ns
                        .children(&mut inner)
                        .find(|c| matches!(c.kind(), "identifier" | "string"))
                        .and_then(|c| self.identifier_or_string(&c));
                    found
                });
            let bindings = vec![Binding::namespace_as(
                alias.clone().unwrap_or_else(|| Binding::NAMESPACE.to_string()),
            )];
            return Some(ModuleItem::ReExportAll {
                site: self.site(node, source, bindings, ImportKind::Namespace),
                alias,
            });
        }

        if children.iter().any(|c| c.kind() == "default") {
            let local = node
                .child_by_field_name("declaration")
                .or_else(|| node.child_by_field_name("value"))
                .and_then(|target| match target.kind() {
                    "identifier" => Some(target),
                    _ => target.child_by_field_name("name"),
                })
                .and_then(|n| self.node_text(&n))
                .map(str::to_string);
            return Some(ModuleItem::ExportDefault { local });
        }

        if let Some(clause) = children.iter().find(|c| c.kind() == "export_clause") {
            return Some(ModuleItem::ExportClause {
                specifiers: self.export_specifiers(clause),
            });
        }

        let declaration = node.child_by_field_name("declaration")?;
        let names = self.declared_names(&declaration);
        if names.is_empty() {
            return None;
        }
        Some(ModuleItem::ExportDeclaration { names })
    }

    fn export_specifiers(&self, clause: &Node) -> Vec<(String, String)> {
        let mut cursor = clause.walk();
        clause
            .children(&mut cursor)
            .filter(|c| c.kind() == "export_specifier")
            .filter_map(|c| self.name_and_alias(&c))
            .collect()
    }

    fn declared_names(&self, declaration: &Node) -> Vec<String> {
        match declaration.kind() {
            "lexical_declaration" | "variable_declaration" => {
                let mut cursor = declaration.walk();
                declaration
                    .children(&mut cursor)
                    .filter(|c| c.kind() == "variable_declarator")
                    .filter_map(|d| d.child_by_field_name("name"))
                    .filter(|n| n.kind() == "identifier")
                    .filter_map(|n| self.node_text(&n).map(str::to_string))
                    .collect()
            }
            _ => declaration
                .child_by_field_name("name")
                .and_then(|n| self.node_text(&n))
                .map(|name| vec![name.to_string()])
                .unwrap_or_default(),
        }
    }

    /// Parse require() calls or dynamic import().
    fn parse_call(&self, node: &Node) -> Option<ModuleItem> {
        let func = node.child_by_field_name("function")?;
        let is_require = match func.kind() {
            "import" => false,
            "identifier" if self.node_text(&func) == Some("require") => true,
            _ => return None,
        };

        let args = node.child_by_field_name("arguments")?;
        let mut cursor = args.walk();
        let specifier = args
            .named_children(&mut cursor)
            .find(|a| a.kind() != "comment")
            .and_then(|a| self.string_value(&a))?;

        if is_require {
            let bindings = self.assigned_bindings(node).unwrap_or_default();
            let kind = kind_of(&bindings);
            return Some(ModuleItem::Require(self.site(node, specifier, bindings, kind)));
        }

        if let Some(wrapper) = self.lazy_wrapper(node) {
            let bindings = self
                .declarator_name(&wrapper)
                .map(|name| vec![Binding::default_as(name)])
                .unwrap_or_default();
            return Some(ModuleItem::LazyImport(self.site(
                &wrapper,
                specifier,
                bindings,
                ImportKind::Default,
            )));
        }

        let bindings = self.assigned_bindings(node).unwrap_or_default();
        let kind = kind_of(&bindings);
        Some(ModuleItem::DynamicImport(self.site(node, specifier, bindings, kind)))
    }

    /// Returns the enclosing `lazy(() => import(...))` call, if any.
    fn lazy_wrapper<'t>(&self, import_call: &Node<'t>) -> Option<Node<'t>> {
        let mut current = import_call.parent()?;
        while !matches!(current.kind(), "arrow_function" | "function_expression" | "function") {
            match current.kind() {
                "statement_block" | "return_statement" | "parenthesized_expression"
                | "await_expression" | "expression_statement" | "call_expression"
                | "member_expression" | "arguments" | "variable_declarator"
                | "lexical_declaration" | "variable_declaration" => current = current.parent()?,
                _ => return None,
            }
        }

        let args = current.parent().filter(|p| p.kind() == "arguments")?;
        let call = args.parent().filter(|p| p.kind() == "call_expression")?;
        let callee = call.child_by_field_name("function")?;
        let name = match callee.kind() {
            "identifier" => self.node_text(&callee),
            "member_expression" => callee
                .child_by_field_name("property")
                .and_then(|p| self.node_text(&p)),
            _ => None,
        }?;

        LAZY_WRAPPERS.contains(&name).then_some(call)
    }

    /// Name in `const Name = <expr>` for an expression node.
    fn declarator_name(&self, expr: &Node) -> Option<String> {
        let parent = expr.parent()?;
        if parent.kind() != "variable_declarator" {
            return None;
        }
        let name = parent.child_by_field_name("name")?;
        (name.kind() == "identifier")
            .then(|| self.node_text(&name).map(str::to_string))
            .flatten()
    }

    /// Bindings for `const x = require('m')`, `const { a, b: c } = await import('m')`.
    fn assigned_bindings(&self, call: &Node) -> Option<Vec<Binding>> {
        let mut expr = *call;
        let mut parent = call.parent()?;
        if parent.kind() == "await_expression" {
            expr = parent;
            parent = parent.parent()?;
        }
        if parent.kind() != "variable_declarator" {
            return None;
        }
        let value = parent.child_by_field_name("value")?;
        if value.id() != expr.id() {
            return None;
        }

        let pattern = parent.child_by_field_name("name")?;
        match pattern.kind() {
            "identifier" => {
                let name = self.node_text(&pattern)?;
                Some(vec![Binding::namespace_as(name)])
            }
            "object_pattern" => {
                let mut cursor = pattern.walk();
                let bindings = pattern
                    .named_children(&mut cursor)
                    .filter_map(|prop| match prop.kind() {
                        "shorthand_property_identifier_pattern" => {
                            self.node_text(&prop).map(Binding::named)
                        }
                        "pair_pattern" => {
                            let key = prop
                                .child_by_field_name("key")
                                .and_then(|k| self.identifier_or_string(&k))?;
                            let value = prop
                                .child_by_field_name("value")
                                .filter(|v| v.kind() == "identifier")
                                .and_then(|v| self.node_text(&v))?;
                            Some(Binding::new(key, value))
                        }
                        _ => None,
                    })
                    .collect();
                Some(bindings)
            }
            _ => None,
        }
    }

    fn identifier_or_string(&self, node: &Node) -> Option<String> {
        match node.kind() {
            "string" => self.string_value(node),
            _ => self.node_text(node).map(str::to_string),
        }
    }

    /// Extract the text content of a node.
    fn node_text(&self, node: &Node) -> Option<&'s str> {
        self.source.get(node.start_byte()..node.end_byte())
    }

    /// Extract string value (removes quotes). Template strings with
    /// substitutions are not static specifiers.
    fn string_value(&self, node: &Node) -> Option<String> {
        match node.kind() {
            "string" => {}
            "template_string" => {
                let mut cursor = node.walk();
                let has_substitution = node
                    .named_children(&mut cursor)
                    .any(|c| c.kind() == "template_substitution");
                if has_substitution {
                    return None;
                }
            }
            _ => return None,
        }
        let text = self.node_text(node)?;
        let trimmed = text
            .trim_start_matches(['"', '\'', '`'])
            .trim_end_matches(['"', '\'', '`']);
        Some(trimmed.to_string())
    }
}

/// Side-effect imports (no bindings) count as default imports of the module.
fn kind_of(bindings: &[Binding]) -> ImportKind {
    if bindings.iter().any(Binding::is_namespace) {
        ImportKind::Namespace
    } else if bindings.iter().all(|b| b.imported == Binding::DEFAULT) {
        ImportKind::Default
    } else {
        ImportKind::Named
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str, dialect: Dialect) -> Vec<ModuleItem> {
        let mut parser = SyntaxParser::new().unwrap();
        parser.parse(source, dialect, 0, Path::new("test")).unwrap()
    }

    fn only_site(items: &[ModuleItem]) -> &ImportSite {
        assert_eq!(items.len(), 1, "{:?}", items);
        match &items[0] {
            ModuleItem::StaticImport(site)
            | ModuleItem::DynamicImport(site)
            | ModuleItem::LazyImport(site)
            | ModuleItem::Require(site) => site,
            other => panic!("not an import: {:?}", other),
        }
    }

    #[test]
    fn test_default_and_named_import() {
        let items = parse("import React, { useState as state } from 'react';", Dialect::JavaScript);
        let site = only_site(&items);
        assert_eq!(site.specifier, "react");
        assert_eq!(
            site.bindings,
            vec![Binding::default_as("React"), Binding::new("useState", "state")]
        );
        assert_eq!(site.kind, ImportKind::Named);
        assert_eq!(site.pos, SourcePos { line: 1, column: 1 });
    }

    #[test]
    fn test_side_effect_import_has_no_bindings() {
        let items = parse("import './styles.css';", Dialect::JavaScript);
        assert!(only_site(&items).bindings.is_empty());
    }

    #[test]
    fn test_renamed_lazy_wrappers() {
        let source = r#"
const Foo = SomeAlias.lazy(() => import('./Bar'));
const Page = dynamic(() => import('./Bar'), { ssr: false });
"#;
        let items = parse(source, Dialect::Tsx);
        assert_eq!(items.len(), 2);
        for (item, local) in items.iter().zip(["Foo", "Page"]) {
            match item {
                ModuleItem::LazyImport(site) => {
                    assert_eq!(site.specifier, "./Bar");
                    assert_eq!(site.bindings, vec![Binding::default_as(local)]);
                }
                other => panic!("expected lazy import, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_lazy_with_block_body() {
        let source = "const X = lazy(() => { return import('./X'); });";
        let items = parse(source, Dialect::JavaScript);
        assert!(matches!(&items[0], ModuleItem::LazyImport(s) if s.specifier == "./X"));
    }

    #[test]
    fn test_lazy_with_awaited_local() {
        let source = "const X = React.lazy(async () => { const m = await import('./X'); return m; });";
        let items = parse(source, Dialect::JavaScript);
        assert_eq!(items.len(), 1, "{:?}", items);
        match &items[0] {
            ModuleItem::LazyImport(site) => {
                assert_eq!(site.specifier, "./X");
                assert_eq!(site.bindings, vec![Binding::default_as("X")]);
            }
            other => panic!("expected lazy import, got {:?}", other),
        }
    }

    #[test]
    fn test_awaited_import_in_plain_function_is_dynamic() {
        let source = "async function load() { const m = await import('./X'); return m; }";
        let items = parse(source, Dialect::JavaScript);
        assert!(matches!(&items[0], ModuleItem::DynamicImport(s) if s.specifier == "./X"));
    }

    #[test]
    fn test_dynamic_import_destructured() {
        let items = parse("const { a, b: c } = await import('./mod');", Dialect::JavaScript);
        match &items[0] {
            ModuleItem::DynamicImport(site) => {
                assert_eq!(site.bindings, vec![Binding::named("a"), Binding::new("b", "c")]);
                assert_eq!(site.kind, ImportKind::Named);
            }
            other => panic!("expected dynamic import, got {:?}", other),
        }
    }

    #[test]
    fn test_require_binds_whole_module() {
        let items = parse("const fs = require('fs');", Dialect::JavaScript);
        let site = only_site(&items);
        assert_eq!(site.bindings, vec![Binding::namespace_as("fs")]);
        assert_eq!(site.kind, ImportKind::Namespace);
    }

    #[test]
    fn test_template_specifier_with_substitution_is_skipped() {
        let items = parse("const m = import(`./locale/${lang}`);", Dialect::JavaScript);
        assert!(items.is_empty());
    }

    #[test]
    fn test_re_exports() {
        let source = r#"
export { default as Button, Size } from './Button';
export * from './theme';
export * as icons from './icons';
"#;
        let items = parse(source, Dialect::TypeScript);
        assert_eq!(items.len(), 3);
        match &items[0] {
            ModuleItem::ReExport { site, specifiers } => {
                assert_eq!(site.specifier, "./Button");
                assert_eq!(
                    specifiers,
                    &vec![
                        ("default".to_string(), "Button".to_string()),
                        ("Size".to_string(), "Size".to_string())
                    ]
                );
            }
            other => panic!("expected re-export, got {:?}", other),
        }
        assert!(matches!(&items[1], ModuleItem::ReExportAll { alias: None, .. }));
        assert!(matches!(&items[2], ModuleItem::ReExportAll { alias: Some(a), .. } if a == "icons"));
    }

    #[test]
    fn test_local_exports() {
        let source = r#"
import Widget from './Widget';
export const a = 1, b = 2;
export function helper() {}
export { Widget as Thing };
export default Widget;
"#;
        let items = parse(source, Dialect::TypeScript);
        assert!(items.contains(&ModuleItem::ExportDeclaration {
            names: vec!["a".into(), "b".into()]
        }));
        assert!(items.contains(&ModuleItem::ExportDeclaration {
            names: vec!["helper".into()]
        }));
        assert!(items.contains(&ModuleItem::ExportClause {
            specifiers: vec![("Widget".into(), "Thing".into())]
        }));
        assert!(items.contains(&ModuleItem::ExportDefault {
            local: Some("Widget".into())
        }));
    }

    #[test]
    fn test_type_only_import_is_static() {
        let items = parse("import type { FC } from 'react';", Dialect::TypeScript);
        assert_eq!(only_site(&items).specifier, "react");
    }

    #[test]
    fn test_syntax_error_reports_position() {
        let mut parser = SyntaxParser::new().unwrap();
        let result = parser.parse("import { from ;;;\nconst = ;", Dialect::JavaScript, 0, Path::new("bad.js"));
        assert!(matches!(result, Err(AnalysisError::ParseError { line, .. }) if line >= 1));
    }

    #[test]
    fn test_line_offset() {
        let mut parser = SyntaxParser::new().unwrap();
        let items = parser
            .parse("\nimport x from './x';", Dialect::JavaScript, 10, Path::new("a.vue"))
            .unwrap();
        assert_eq!(only_site(&items).pos.line, 12);
    }

    #[test]
    fn test_from_extension() {
        assert_eq!(SourceLanguage::from_extension("TSX"), Some(SourceLanguage::Tsx));
        assert_eq!(SourceLanguage::from_extension("cjs"), Some(SourceLanguage::JavaScript));
        assert!(SourceLanguage::from_extension("css").is_none());
        assert!(SourceLanguage::Vue.is_markup());
    }
}
