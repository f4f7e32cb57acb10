//! Plain text export.
//!
//! Search results are grouped per file, one line per import:
//!
//! ```text
//! src/pages/Home.tsx
//!   L3  ../components/Test  [static/default]  { Test }
//! ```
//!
//! Paths are shown relative to the search root they were found under.

use super::{ExportData, Exporter};
use crate::analysis::{Binding, ImportRecord};
use crate::scan::{FailedFile, ImportMap, MapStats, ProjectReport, SearchReport, UnusedFile, UnusedReport};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Text exporter implementation.
pub struct TextExporter;

impl Exporter for TextExporter {
    fn export<W: Write>(&self, data: &ExportData<'_>, writer: &mut W) -> io::Result<()> {
        match data {
            ExportData::Search(report) => write_search(report, writer),
            ExportData::Unused(report) => write_unused(report, writer),
            ExportData::Map(maps) => {
                for (i, map) in maps.iter().enumerate() {
                    if i > 0 {
                        writeln!(writer)?;
                    }
                    write_map(map, writer)?;
                }
                Ok(())
            }
            ExportData::Report(reports) => {
                for (i, report) in reports.iter().enumerate() {
                    if i > 0 {
                        writeln!(writer)?;
                    }
                    write_report(report, writer)?;
                }
                Ok(())
            }
        }
    }
}

fn display(path: &Path, roots: &[PathBuf]) -> String {
    roots
        .iter()
        .find_map(|root| path.strip_prefix(root).ok())
        .filter(|rel| !rel.as_os_str().is_empty())
        .unwrap_or(path)
        .display()
        .to_string()
}

/// `{ a, b as c, * as ns }`, or nothing for side-effect imports.
fn format_bindings(bindings: &[Binding]) -> String {
    if bindings.is_empty() {
        return String::new();
    }
    let names: Vec<String> = bindings
        .iter()
        .map(|b| {
            if b.imported == b.local || b.imported == Binding::DEFAULT {
                b.local.clone()
            } else {
                format!("{} as {}", b.imported, b.local)
            }
        })
        .collect();
    format!("  {{ {} }}", names.join(", "))
}

/// One import line: `  L<line>  <specifier>  [<style>/<kind>]  { names }`
pub fn format_import(import: &ImportRecord) -> String {
    format!(
        "  L{}  {}  [{}/{}]{}",
        import.line,
        import.specifier,
        import.style,
        import.kind,
        format_bindings(&import.bindings)
    )
}

fn write_failed<W: Write>(failed: &[FailedFile], roots: &[PathBuf], writer: &mut W) -> io::Result<()> {
    if failed.is_empty() {
        return Ok(());
    }
    writeln!(writer)?;
    writeln!(writer, "Skipped {} file(s) that could not be parsed:", failed.len())?;
    for file in failed {
        writeln!(writer, "  {}: {}", display(&file.path, roots), file.error)?;
    }
    Ok(())
}

fn write_search<W: Write>(report: &SearchReport, writer: &mut W) -> io::Result<()> {
    if report.results.is_empty() {
        writeln!(
            writer,
            "No matching imports found ({} files scanned)",
            report.files_scanned
        )?;
        return write_failed(&report.failed, &report.roots, writer);
    }

    for result in &report.results {
        writeln!(writer, "{}", display(&result.file, &report.roots))?;
        for import in &result.imports {
            writeln!(writer, "{}", format_import(import))?;
        }
        writeln!(writer)?;
    }

    writeln!(
        writer,
        "{} file(s), {} import(s) ({} files scanned)",
        report.results.len(),
        report.import_count(),
        report.files_scanned
    )?;
    write_failed(&report.failed, &report.roots, writer)
}

fn write_unused_list<W: Write>(unused: &[UnusedFile], roots: &[PathBuf], writer: &mut W) -> io::Result<()> {
    for file in unused {
        writeln!(writer, "  {}  ({})", display(&file.file, roots), file.reason)?;
    }
    Ok(())
}

fn write_unused<W: Write>(report: &UnusedReport, writer: &mut W) -> io::Result<()> {
    if report.unused.is_empty() {
        writeln!(writer, "No unused files found ({} files scanned)", report.files_scanned)?;
    } else {
        writeln!(writer, "Unused files:")?;
        write_unused_list(&report.unused, &report.roots, writer)?;
        writeln!(writer)?;
        writeln!(
            writer,
            "{} unused file(s) ({} files scanned)",
            report.unused.len(),
            report.files_scanned
        )?;
    }
    write_failed(&report.failed, &report.roots, writer)
}

/// `a -> b -> a`
fn cycle_path(files: &[PathBuf], roots: &[PathBuf]) -> String {
    let Some(first) = files.first() else {
        return String::new();
    };
    let mut parts: Vec<String> = files.iter().map(|f| display(f, roots)).collect();
    parts.push(display(first, roots));
    parts.join(" -> ")
}

fn write_stats<W: Write>(stats: &MapStats, roots: &[PathBuf], writer: &mut W) -> io::Result<()> {
    writeln!(
        writer,
        "  files: {}  imports: {}  resolved: {}  packages: {}  unresolved: {}",
        stats.total_files,
        stats.total_imports,
        stats.resolved_imports,
        stats.package_imports,
        stats.unresolved_imports
    )?;

    if !stats.most_imported.is_empty() {
        writeln!(writer, "  Most imported:")?;
        for entry in &stats.most_imported {
            writeln!(writer, "    {:>4}  {}", entry.count, display(&entry.file, roots))?;
        }
    }
    if !stats.least_imported.is_empty() {
        writeln!(writer, "  Least imported:")?;
        for entry in &stats.least_imported {
            writeln!(writer, "    {:>4}  {}", entry.count, display(&entry.file, roots))?;
        }
    }
    if !stats.circular.is_empty() {
        writeln!(writer, "  Circular imports:")?;
        for cycle in &stats.circular {
            writeln!(writer, "    {}", cycle_path(cycle, roots))?;
        }
    }
    Ok(())
}

fn write_map<W: Write>(map: &ImportMap, writer: &mut W) -> io::Result<()> {
    let roots = std::slice::from_ref(&map.root);
    writeln!(writer, "Import map for {}", map.root.display())?;
    write_stats(&map.stats, roots, writer)?;

    for (file, imports) in &map.imports {
        let importers = map.imported_by.get(file).map_or(0, Vec::len);
        writeln!(writer)?;
        writeln!(writer, "{}  (imported by {})", display(file, roots), importers)?;
        for import in imports {
            let target = match &import.resolved {
                Some(id) => id.as_file().map_or_else(|| id.to_string(), |p| display(p, roots)),
                None => "unresolved".to_string(),
            };
            writeln!(writer, "  L{}  {} -> {}", import.line, import.specifier, target)?;
        }
    }
    write_failed(&map.failed, roots, writer)
}

fn write_report<W: Write>(report: &ProjectReport, writer: &mut W) -> io::Result<()> {
    let roots = std::slice::from_ref(&report.root);
    writeln!(
        writer,
        "Report for {} ({} files scanned)",
        report.root.display(),
        report.files_scanned
    )?;
    writeln!(writer)?;

    writeln!(writer, "Imports:")?;
    if report.search.results.is_empty() {
        writeln!(writer, "  none")?;
    }
    for result in &report.search.results {
        writeln!(writer, "  {}", display(&result.file, roots))?;
        for import in &result.imports {
            writeln!(writer, "  {}", format_import(import))?;
        }
    }
    writeln!(writer)?;

    writeln!(writer, "Unused files: {}", report.unused.len())?;
    write_unused_list(&report.unused, roots, writer)?;
    writeln!(writer)?;

    writeln!(writer, "Stats:")?;
    write_stats(&report.stats, roots, writer)?;
    write_failed(&report.failed, roots, writer)
}
