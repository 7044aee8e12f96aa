//! Run report rendering.
//!
//! Text mode prints one styled line per document and a totals line, the
//! shape scripts grep and humans scan. JSON mode dumps the whole summary
//! for anything that wants structure.

use anyhow::Result;
use clap::ValueEnum;
use console::Style;

use restitch_engine::{DocumentOutcome, OutcomeKind, Summary};

/// Report format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportMode {
    /// One line per document plus totals.
    Text,
    /// The full summary as pretty-printed JSON.
    Json,
}

/// Prints the report for one finished run.
///
/// With `quiet`, text mode drops the lines for healthy documents and keeps
/// the ones someone has to act on, plus the totals.
pub fn print(summary: &Summary, mode: ReportMode, quiet: bool) -> Result<()> {
    match mode {
        ReportMode::Text => {
            for outcome in &summary.outcomes {
                if quiet && !worth_showing(outcome.kind) {
                    continue;
                }
                println!("{}", line_for(outcome, summary.check));
            }
            println!("{}", totals_line(summary));
        }
        ReportMode::Json => {
            println!("{}", serde_json::to_string_pretty(summary)?);
        }
    }
    Ok(())
}

fn worth_showing(kind: OutcomeKind) -> bool {
    kind.is_error() || kind == OutcomeKind::FragmentNotFound
}

fn style_for(kind: OutcomeKind) -> Style {
    match kind {
        OutcomeKind::Updated => Style::new().green(),
        OutcomeKind::AlreadyCanonical => Style::new().dim(),
        OutcomeKind::FragmentNotFound => Style::new().yellow(),
        OutcomeKind::NoContext | OutcomeKind::WriteError => Style::new().red(),
    }
}

fn line_for(outcome: &DocumentOutcome, check: bool) -> String {
    let label = if check && outcome.kind == OutcomeKind::Updated {
        "pending"
    } else {
        outcome.kind.label()
    };
    let label = style_for(outcome.kind).apply_to(format!("{label:>11}"));
    match &outcome.message {
        Some(message) => format!("{label}  {}  ({message})", outcome.document),
        None => format!("{label}  {}", outcome.document),
    }
}

fn totals_line(summary: &Summary) -> String {
    let mut line = format!(
        "{} updated, {} canonical, {} not found, {} errors ({} documents)",
        summary.updated, summary.skipped, summary.not_found, summary.errors, summary.total
    );
    if summary.check {
        line.push_str(" [check only, nothing written]");
    }
    line
}
