//! Command-line interface for pyoutline.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::analysis::Analyzer;
use crate::bridge::{EnvEditorContext, VimBridge};
use crate::report;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;

/// Python structural analysis for editor integration.
///
/// Pyoutline parses one Python file with tree-sitter and reports its
/// definitions, imports, and structural counts: as a JSON document or a
/// quickfix list for the vim plugin to parse, or as a plain report for
/// humans.
#[derive(Parser)]
#[command(name = "pyoutline")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the full analysis document as JSON (editor mode)
    Analyze(TargetArgs),
    /// Print definitions as a quickfix list in JSON (editor mode)
    Outline(TargetArgs),
    /// Print a human-readable structural report
    Report(ReportArgs),
}

/// Arguments for the editor-mode commands.
#[derive(Parser)]
pub struct TargetArgs {
    /// File to analyze (defaults to the editor's active buffer)
    pub path: Option<PathBuf>,
}

/// Arguments for the report command.
#[derive(Parser)]
pub struct ReportArgs {
    /// Python file to analyze
    pub path: PathBuf,
}

/// Run the analyze command.
///
/// Resolution failures are soft aborts: the message is printed for the
/// editor to display and the process still exits cleanly.
pub fn run_analyze(args: &TargetArgs) -> anyhow::Result<i32> {
    let editor = EnvEditorContext;
    let bridge = VimBridge::new(Some(&editor), args.path.clone());

    match bridge.analyze_current_file() {
        Ok(document) => {
            report::write_document(&document)?;
            Ok(EXIT_SUCCESS)
        }
        Err(e) => {
            println!("{}", e);
            Ok(EXIT_SUCCESS)
        }
    }
}

/// Run the outline command.
pub fn run_outline(args: &TargetArgs) -> anyhow::Result<i32> {
    let editor = EnvEditorContext;
    let bridge = VimBridge::new(Some(&editor), args.path.clone());

    match bridge.quickfix_entries() {
        Ok(entries) => {
            report::write_quickfix(&entries)?;
            Ok(EXIT_SUCCESS)
        }
        Err(e) => {
            println!("{}", e);
            Ok(EXIT_SUCCESS)
        }
    }
}

/// Run the report command.
pub fn run_report(args: &ReportArgs) -> anyhow::Result<i32> {
    if !args.path.exists() {
        eprintln!("Error: file {} does not exist", args.path.display());
        return Ok(EXIT_FAILED);
    }

    let analyzer = Analyzer::new(&args.path);
    report::write_report(&analyzer);
    Ok(EXIT_SUCCESS)
}
