//! Editor bridge: resolve the file to analyze and shape results for vim.
//!
//! The bridge never talks to the editor process directly. The editor-side
//! plugin spawns the binary with the active buffer path in the
//! `PYOUTLINE_BUFFER` environment variable and parses the JSON printed to
//! stdout; in standalone use the target comes from the command line instead.

use std::env;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::analysis::{
    Analyzer, ComplexityMetrics, Definition, ImportRecord, ParseError,
};

/// Environment variable the editor plugin sets to the active buffer path.
pub const BUFFER_ENV_VAR: &str = "PYOUTLINE_BUFFER";

/// Target resolution failures. Both abort before any analyzer is built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetError {
    #[error("No file specified")]
    NoFileSpecified,
    #[error("Not a Python file")]
    NotPythonFile,
}

/// Capability supplied by a host editor integration: where is the file the
/// user is looking at?
pub trait EditorContext {
    fn current_file(&self) -> Option<PathBuf>;
}

/// Production editor capability, backed by [`BUFFER_ENV_VAR`].
pub struct EnvEditorContext;

impl EditorContext for EnvEditorContext {
    fn current_file(&self) -> Option<PathBuf> {
        env::var_os(BUFFER_ENV_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }
}

/// The full analysis document emitted for the editor to parse.
#[derive(Debug, Serialize)]
pub struct AnalysisDocument {
    pub file: String,
    pub errors: Vec<ParseError>,
    pub definitions: Vec<Definition>,
    pub imports: Vec<ImportRecord>,
    pub complexity: ComplexityMetrics,
}

/// One quickfix entry: a location plus a label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuickfixEntry {
    pub filename: String,
    /// 1-indexed line number.
    pub lnum: usize,
    pub text: String,
}

/// Resolves the analysis target and runs the analyzer over it.
pub struct VimBridge<'a> {
    editor: Option<&'a dyn EditorContext>,
    fallback: Option<PathBuf>,
}

impl<'a> VimBridge<'a> {
    /// An editor capability takes precedence over the command-line fallback.
    pub fn new(editor: Option<&'a dyn EditorContext>, fallback: Option<PathBuf>) -> Self {
        Self { editor, fallback }
    }

    /// Editor context first, CLI argument second; the target must carry the
    /// `.py` extension.
    pub fn resolve_target(&self) -> Result<PathBuf, TargetError> {
        let path = self
            .editor
            .and_then(|e| e.current_file())
            .or_else(|| self.fallback.clone())
            .ok_or(TargetError::NoFileSpecified)?;

        if path.extension().and_then(|e| e.to_str()) != Some("py") {
            return Err(TargetError::NotPythonFile);
        }
        Ok(path)
    }

    /// Analyze the resolved target and bundle every query result into one
    /// document.
    pub fn analyze_current_file(&self) -> Result<AnalysisDocument, TargetError> {
        let target = self.resolve_target()?;
        let analyzer = Analyzer::new(&target);
        Ok(AnalysisDocument {
            file: analyzer.file_path().to_string(),
            errors: analyzer.syntax_errors().to_vec(),
            definitions: analyzer.definitions(),
            imports: analyzer.imports(),
            complexity: analyzer.complexity(),
        })
    }

    /// Analyze the resolved target and flatten its definitions into quickfix
    /// entries.
    pub fn quickfix_entries(&self) -> Result<Vec<QuickfixEntry>, TargetError> {
        let target = self.resolve_target()?;
        let analyzer = Analyzer::new(&target);
        Ok(quickfix_for(
            analyzer.file_path(),
            &analyzer.definitions(),
        ))
    }
}

/// Flatten definitions into quickfix entries: classes contribute one entry
/// plus one per method; callables contribute one entry labeled by kind.
pub fn quickfix_for(filename: &str, definitions: &[Definition]) -> Vec<QuickfixEntry> {
    let mut entries = Vec::new();
    for definition in definitions {
        match definition {
            Definition::Class {
                name,
                line,
                methods,
                ..
            } => {
                entries.push(QuickfixEntry {
                    filename: filename.to_string(),
                    lnum: *line,
                    text: format!("Class: {}", name),
                });
                for method in methods {
                    entries.push(QuickfixEntry {
                        filename: filename.to_string(),
                        lnum: method.line,
                        text: format!("Method: {} in {}", method.name, name),
                    });
                }
            }
            Definition::Callable {
                kind, name, line, ..
            } => {
                entries.push(QuickfixEntry {
                    filename: filename.to_string(),
                    lnum: *line,
                    text: format!("{}: {}", kind.label(), name),
                });
            }
        }
    }
    entries
}
