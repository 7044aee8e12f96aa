//! Command-line front end.
//!
//! A run is: load the spec, compile patterns and template, point a
//! directory store at the root, synchronize the document list, print the
//! report. The exit status is the contract scripts rely on: zero only when
//! nothing failed and nothing expected was missing.

mod config;
mod report;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use restitch_engine::{DirStore, SyncEngine, SyncOptions, Summary};

use crate::config::RunSpec;
use crate::report::ReportMode;

/// Keep a shared fragment canonical across a document set.
///
/// Reads a YAML run spec describing the fragment's known shapes, its
/// canonical template, and per-document contexts, then locates and
/// restitches the fragment in every listed document. Documents that fail
/// are reported and skipped; the batch always finishes.
#[derive(Debug, Parser)]
#[command(name = "restitch", version)]
struct Cli {
    /// Documents to synchronize; defaults to the run spec's list.
    #[arg(value_name = "DOC")]
    documents: Vec<String>,

    /// Run spec file.
    #[arg(short, long, default_value = "restitch.yaml", value_name = "FILE")]
    config: PathBuf,

    /// Directory documents resolve against; overrides the run spec.
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Classify every document but write nothing back.
    #[arg(long)]
    check: bool,

    /// Report format.
    #[arg(short, long, value_enum, default_value = "text")]
    output: ReportMode,

    /// Only report documents that need attention, plus totals.
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(summary) if summary.exit_ok() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("restitch: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<Summary> {
    let spec = RunSpec::load(&cli.config)?;
    let base = match cli.config.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let root = spec.resolve_root(base, cli.root.as_deref());

    let patterns = spec.build_patterns()?;
    let template = spec.build_template(base)?;
    let documents = if cli.documents.is_empty() {
        spec.document_list()
    } else {
        cli.documents.clone()
    };

    let store = DirStore::new(root);
    let mut engine = SyncEngine::new(Box::new(store), patterns, template, spec.pages)
        .with_options(SyncOptions { check: cli.check });

    let summary = engine.run(&documents);
    report::print(&summary, cli.output, cli.quiet)?;
    Ok(summary)
}
