//! Import and export extraction for JavaScript/TypeScript files.
//!
//! Turns the [`ModuleItem`]s produced by the tree-sitter adapter into
//! [`ImportRecord`]s and [`ExportRecord`]s. Specifiers are stored exactly as
//! written; resolution happens later so the same records can be resolved
//! against different base directories without re-parsing.

use std::fs;
use std::path::Path;

use thiserror::Error;

use super::syntax::{Dialect, ImportSite, ModuleItem, SourceLanguage, SyntaxParser};
use super::types::{
    Binding, ExportKind, ExportRecord, FileModule, ImportRecord, ImportStyle,
};

/// Errors that can occur during import analysis.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse {path} at {line}:{column}")]
    ParseError {
        path: String,
        line: usize,
        column: usize,
    },

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Tree-sitter language initialization failed")]
    LanguageInit,
}

/// Result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Extracts import and export records from source files.
pub struct ImportAnalyzer {
    parser: SyntaxParser,
}

impl ImportAnalyzer {
    /// Create a new ImportAnalyzer.
    pub fn new() -> AnalysisResult<Self> {
        Ok(Self {
            parser: SyntaxParser::new()?,
        })
    }

    /// Read, parse and extract a single file.
    pub fn analyze_file(&mut self, path: &Path) -> AnalysisResult<FileModule> {
        let language = SourceLanguage::from_path(path).ok_or_else(|| {
            AnalysisError::UnsupportedFileType(
                path.extension()
                    .map(|e| e.to_string_lossy().to_string())
                    .unwrap_or_default(),
            )
        })?;

        let content = fs::read_to_string(path)?;
        self.analyze_source(&content, language, path)
    }

    /// Analyze source code directly.
    pub fn analyze_source(
        &mut self,
        source: &str,
        language: SourceLanguage,
        path: &Path,
    ) -> AnalysisResult<FileModule> {
        let mut items = Vec::new();
        if language.is_markup() {
            for block in script_blocks(source) {
                items.extend(self.parser.parse(block.body, block.dialect, block.line_offset, path)?);
            }
        } else {
            items = self.parser.parse(source, language.into(), 0, path)?;
        }

        let (imports, exports) = extract_records(items);
        Ok(FileModule {
            path: path.to_path_buf(),
            imports,
            exports,
        })
    }
}

/// Split module items into import and export records.
pub fn extract_records(items: Vec<ModuleItem>) -> (Vec<ImportRecord>, Vec<ExportRecord>) {
    let mut imports = Vec::new();
    let mut exports = Vec::new();

    for item in items {
        match item {
            ModuleItem::StaticImport(site) => imports.push(import_record(site, ImportStyle::Static)),
            ModuleItem::DynamicImport(site) => {
                imports.push(import_record(site, ImportStyle::Dynamic))
            }
            ModuleItem::LazyImport(site) => imports.push(import_record(site, ImportStyle::Lazy)),
            ModuleItem::Require(site) => imports.push(import_record(site, ImportStyle::Require)),
            ModuleItem::ExportDeclaration { names } => {
                exports.extend(names.into_iter().map(|name| ExportRecord {
                    exported_name: name.clone(),
                    local_name: name,
                    kind: ExportKind::Named,
                    re_export_source: None,
                }));
            }
            ModuleItem::ExportClause { specifiers } => {
                exports.extend(specifiers.into_iter().map(|(local, exported)| ExportRecord {
                    kind: export_kind(&exported),
                    exported_name: exported,
                    local_name: local,
                    re_export_source: None,
                }));
            }
            ModuleItem::ExportDefault { local } => exports.push(ExportRecord {
                exported_name: Binding::DEFAULT.to_string(),
                local_name: local.unwrap_or_else(|| Binding::DEFAULT.to_string()),
                kind: ExportKind::Default,
                re_export_source: None,
            }),
            ModuleItem::ReExport { site, specifiers } => {
                exports.extend(specifiers.into_iter().map(|(name, exported)| ExportRecord {
                    kind: export_kind(&exported),
                    exported_name: exported,
                    local_name: name,
                    re_export_source: Some(site.specifier.clone()),
                }));
                imports.push(import_record(site, ImportStyle::Static));
            }
            ModuleItem::ReExportAll { site, alias } => {
                exports.push(ExportRecord {
                    exported_name: alias.unwrap_or_else(|| Binding::NAMESPACE.to_string()),
                    local_name: Binding::NAMESPACE.to_string(),
                    kind: ExportKind::Named,
                    re_export_source: Some(site.specifier.clone()),
                });
                imports.push(import_record(site, ImportStyle::Static));
            }
        }
    }

    (imports, exports)
}

fn import_record(site: ImportSite, style: ImportStyle) -> ImportRecord {
    ImportRecord {
        specifier: site.specifier,
        style,
        line: site.pos.line,
        column: site.pos.column,
        bindings: site.bindings,
        kind: site.kind,
        source_text: site.text,
        resolved: None,
    }
}

fn export_kind(exported: &str) -> ExportKind {
    if exported == Binding::DEFAULT {
        ExportKind::Default
    } else {
        ExportKind::Named
    }
}

/// A `<script>` block inside a `.vue` or `.svelte` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptBlock<'a> {
    pub body: &'a str,
    pub dialect: Dialect,
    /// Newlines before the body in the whole file.
    pub line_offset: usize,
}

/// Find every `<script ...>...</script>` block in a markup file.
pub fn script_blocks(source: &str) -> Vec<ScriptBlock<'_>> {
    let mut blocks = Vec::new();
    let mut rest_start = 0;

    while let Some(open) = source[rest_start..].find("<script") {
        let tag_start = rest_start + open;
        let Some(tag_len) = source[tag_start..].find('>') else {
            break;
        };
        let body_start = tag_start + tag_len + 1;
        let Some(body_len) = source[body_start..].find("</script>") else {
            break;
        };
        let body_end = body_start + body_len;

        let tag = &source[tag_start..body_start];
        let dialect = if tag.contains("lang=\"ts\"") || tag.contains("lang='ts'") {
            Dialect::TypeScript
        } else if tag.contains("lang=\"tsx\"") || tag.contains("lang='tsx'") {
            Dialect::Tsx
        } else {
            Dialect::JavaScript
        };

        blocks.push(ScriptBlock {
            body: &source[body_start..body_end],
            dialect,
            line_offset: source[..body_start].matches('\n').count(),
        });
        rest_start = body_end + "</script>".len();
    }

    blocks
}
