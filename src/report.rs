//! Output formatting for analysis results.
//!
//! Two JSON shapes are consumed by the vim plugin (the full document and the
//! quickfix array); the plain report is for humans running the binary
//! directly.

use colored::*;

use crate::analysis::{Analyzer, Definition, ImportRecord};
use crate::bridge::{AnalysisDocument, QuickfixEntry};

/// Write the full analysis document as indented JSON.
pub fn write_document(document: &AnalysisDocument) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(document)?;
    println!("{}", json);
    Ok(())
}

/// Write quickfix entries as a compact JSON array.
pub fn write_quickfix(entries: &[QuickfixEntry]) -> anyhow::Result<()> {
    let json = serde_json::to_string(entries)?;
    println!("{}", json);
    Ok(())
}

/// Write the human-readable report.
///
/// Syntax errors preempt everything else; otherwise definitions, imports,
/// and the complexity summary are printed in order.
pub fn write_report(analyzer: &Analyzer) {
    let errors = analyzer.syntax_errors();
    if !errors.is_empty() {
        println!("{}", "Syntax Errors:".red().bold());
        for error in errors {
            println!("  Line {}: {}", error.line, error.message);
        }
        return;
    }

    println!("{}", "Definitions:".bold());
    for definition in &analyzer.definitions() {
        match definition {
            Definition::Class {
                name,
                line,
                methods,
                ..
            } => {
                println!("  Class: {} (Line {})", name, line);
                for method in methods {
                    println!("    Method: {} (Line {})", method.name, method.line);
                }
            }
            Definition::Callable {
                kind,
                name,
                line,
                args,
                ..
            } => {
                println!(
                    "  {}: {}({}) (Line {})",
                    kind.label(),
                    name,
                    args.join(", "),
                    line
                );
            }
        }
    }

    println!();
    println!("{}", "Imports:".bold());
    for import in &analyzer.imports() {
        println!("  {}", format_import(import));
    }

    let metrics = analyzer.complexity();
    println!();
    println!(
        "Complexity: {} functions, {} classes, {} imports",
        metrics.function_count, metrics.class_count, metrics.import_count
    );
}

/// Render an import record the way it would appear in source.
fn format_import(import: &ImportRecord) -> String {
    match import {
        ImportRecord::Import {
            module,
            alias: Some(alias),
        } => format!("import {} as {}", module, alias),
        ImportRecord::Import { module, alias: None } => format!("import {}", module),
        ImportRecord::FromImport { module, names, .. } => format!(
            "from {} import {}",
            module.as_deref().unwrap_or("."),
            names.join(", ")
        ),
    }
}
