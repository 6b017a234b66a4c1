//! Pyoutline - Python structural analysis for editor integration.
//!
//! Pyoutline extracts structural information from a single Python source
//! file and surfaces it to an editor: definitions (functions, async
//! functions, classes with their methods), top-level imports, docstrings,
//! and structural counts.
//!
//! # Architecture
//!
//! - `analysis`: tree-sitter backed analyzer; parses once at construction
//!   and answers read-only queries, degrading to empty results when the
//!   file cannot be parsed
//! - `bridge`: resolves the analysis target (editor buffer or CLI argument)
//!   and shapes results for vim consumption
//! - `report`: output formatting (JSON document, quickfix JSON, plain text)
//! - `cli`: command-line interface
//!
//! The vim plugin spawns the binary with the active buffer path in the
//! `PYOUTLINE_BUFFER` environment variable and parses the JSON it prints.

pub mod analysis;
pub mod bridge;
pub mod cli;
pub mod report;

pub use analysis::{
    Analyzer, ComplexityMetrics, Definition, DefinitionKind, ImportRecord, Method, ParseError,
    ParseErrorKind,
};
pub use bridge::{
    AnalysisDocument, EditorContext, EnvEditorContext, QuickfixEntry, TargetError, VimBridge,
};
