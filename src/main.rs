//! importscope CLI entry point

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use importscope::analysis::ImportStyle;
use importscope::export::{export, ExportData, ExportFormat};
use importscope::scan::{
    build_import_map, build_report, search, unused_report, ScanOptions, ScanProgress,
    SearchReport, StyleFilter, UnusedReport,
};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "importscope")]
#[command(author = "Zachary Woods <143150513+zach-fau@users.noreply.github.com>")]
#[command(version)]
#[command(about = "Find every file that imports a JavaScript/TypeScript module", long_about = None)]
struct Cli {
    /// Log per-file detail and parse failures to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find files importing a module, following barrel re-exports
    Find {
        /// Module name or specifier to search for
        module: Option<String>,

        /// Directories to search (defaults to the current directory)
        paths: Vec<PathBuf>,

        #[command(flatten)]
        common: CommonArgs,
    },
    /// List every import in every file
    List {
        paths: Vec<PathBuf>,

        #[command(flatten)]
        common: CommonArgs,
    },
    /// Search results, unused files and import statistics in one document
    Report {
        paths: Vec<PathBuf>,

        /// Module name to search for
        #[arg(long)]
        module: Option<String>,

        #[command(flatten)]
        common: CommonArgs,
    },
    /// Files that no other file imports
    Unused {
        paths: Vec<PathBuf>,

        /// Only consider files whose path contains this text
        #[arg(long)]
        filter: Option<String>,

        #[command(flatten)]
        common: CommonArgs,
    },
    /// Forward and reverse import map with statistics
    Map {
        paths: Vec<PathBuf>,

        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Args)]
struct CommonArgs {
    /// Additional directory to search
    #[arg(short, long)]
    path: Vec<PathBuf>,

    /// File whose importers are searched for
    #[arg(short = 'm', long)]
    module_path: Option<PathBuf>,

    /// Base directory for non-relative specifiers
    #[arg(long)]
    base_url: Option<PathBuf>,

    /// tsconfig.json to read baseUrl from
    #[arg(long)]
    tsconfig: Option<PathBuf>,

    /// Include glob (repeatable, replaces the defaults)
    #[arg(long)]
    include: Vec<String>,

    /// Exclude glob (repeatable, added to the defaults)
    #[arg(long)]
    exclude: Vec<String>,

    /// Output format: json or text
    #[arg(short, long)]
    format: Option<ExportFormat>,

    /// Write output to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(long)]
    no_static: bool,

    #[arg(long)]
    no_dynamic: bool,

    #[arg(long)]
    no_lazy: bool,

    #[arg(long)]
    no_require: bool,
}

impl CommonArgs {
    fn roots(&self, paths: &[PathBuf]) -> Vec<PathBuf> {
        let roots: Vec<PathBuf> = paths.iter().chain(&self.path).cloned().collect();
        if roots.is_empty() {
            vec![PathBuf::from(".")]
        } else {
            roots
        }
    }

    fn styles(&self) -> StyleFilter {
        let mut styles = StyleFilter::default();
        for (off, style) in [
            (self.no_static, ImportStyle::Static),
            (self.no_dynamic, ImportStyle::Dynamic),
            (self.no_lazy, ImportStyle::Lazy),
            (self.no_require, ImportStyle::Require),
        ] {
            if off {
                styles = styles.without(style);
            }
        }
        styles
    }

    fn options(&self, verbose: bool) -> ScanOptions {
        let mut options = ScanOptions::new()
            .with_styles(self.styles())
            .with_include(self.include.clone())
            .with_exclude(self.exclude.clone())
            .verbose(verbose);
        if let Some(module_path) = &self.module_path {
            options = options.with_module_path(module_path);
        }
        if let Some(base_url) = &self.base_url {
            options = options.with_base_url(base_url);
        }
        if let Some(tsconfig) = &self.tsconfig {
            options = options.with_tsconfig(tsconfig);
        }
        options
    }

    fn write(&self, default: ExportFormat, data: &ExportData<'_>) -> Result<()> {
        let format = self.format.unwrap_or(default);
        match &self.output {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create {}", path.display()))?;
                let mut writer = BufWriter::new(file);
                export(format, data, &mut writer)?;
                writer.flush()?;
            }
            None => {
                let stdout = io::stdout();
                let mut writer = stdout.lock();
                export(format, data, &mut writer)?;
            }
        }
        Ok(())
    }
}

fn log_progress(progress: &ScanProgress) {
    debug!(
        "Batch {}: {}/{} files parsed ({} failed)",
        progress.batch, progress.processed, progress.total, progress.failed
    );
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("importscope=debug")
    } else {
        EnvFilter::try_from_env("IMPORTSCOPE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn run_search(
    module: Option<&str>,
    roots: &[PathBuf],
    options: &ScanOptions,
) -> Result<SearchReport> {
    let mut report = SearchReport::default();
    for root in roots {
        let found = search(module, root, options, &mut log_progress)
            .with_context(|| format!("Failed to scan {}", root.display()))?;
        report.merge(found);
    }
    Ok(report)
}

/// Runs the command; `Ok(false)` means the command found nothing.
fn run(cli: Cli) -> Result<bool> {
    let verbose = cli.verbose;

    match cli.command {
        Commands::Find {
            module,
            paths,
            common,
        } => {
            let options = common.options(verbose);
            let report = run_search(module.as_deref(), &common.roots(&paths), &options)?;
            common.write(ExportFormat::Text, &ExportData::Search(&report))?;
            Ok(!report.is_empty())
        }
        Commands::List { paths, common } => {
            let mut options = common.options(verbose);
            options.module_path = None;
            let report = run_search(None, &common.roots(&paths), &options)?;
            common.write(ExportFormat::Text, &ExportData::Search(&report))?;
            Ok(true)
        }
        Commands::Report {
            paths,
            module,
            common,
        } => {
            let options = common.options(verbose);
            let mut reports = Vec::new();
            for root in common.roots(&paths) {
                let report = build_report(module.as_deref(), &root, &options, &mut log_progress)
                    .with_context(|| format!("Failed to scan {}", root.display()))?;
                reports.push(report);
            }
            common.write(ExportFormat::Json, &ExportData::Report(&reports))?;
            Ok(true)
        }
        Commands::Unused {
            paths,
            filter,
            common,
        } => {
            let options = common.options(verbose);
            let mut report = UnusedReport::default();
            for root in common.roots(&paths) {
                let found = unused_report(&root, filter.as_deref(), &options, &mut log_progress)
                    .with_context(|| format!("Failed to scan {}", root.display()))?;
                report.merge(found);
            }
            common.write(ExportFormat::Text, &ExportData::Unused(&report))?;
            Ok(true)
        }
        Commands::Map { paths, common } => {
            let options = common.options(verbose);
            let mut maps = Vec::new();
            for root in common.roots(&paths) {
                let map = build_import_map(&root, &options, &mut log_progress)
                    .with_context(|| format!("Failed to scan {}", root.display()))?;
                maps.push(map);
            }
            common.write(ExportFormat::Text, &ExportData::Map(&maps))?;
            Ok(true)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
