//! Single-file Python analysis.
//!
//! The [`Analyzer`] reads and parses one source file at construction time and
//! answers read-only structural queries against the resulting tree:
//!
//! - [`Analyzer::definitions`]: functions, async functions, classes
//! - [`Analyzer::imports`]: top-level import statements
//! - [`Analyzer::complexity`]: structural counts over the whole tree
//!
//! Construction is fail-soft: read, decode, and parse failures are captured
//! as [`ParseError`] records retrievable via [`Analyzer::syntax_errors`], and
//! every query degrades to an empty result when the tree is absent.

mod facts;
mod python;

pub use facts::{
    ComplexityMetrics, Definition, DefinitionKind, ImportRecord, Method, ParseError,
    ParseErrorKind,
};

use std::fs;
use std::path::Path;

use tree_sitter::{Parser, Tree};

/// Structural analyzer for one Python source file.
///
/// Immutable after construction; the tree is built exactly once and queries
/// are idempotent.
pub struct Analyzer {
    file_path: String,
    source: Vec<u8>,
    tree: Option<Tree>,
    errors: Vec<ParseError>,
}

impl Analyzer {
    /// Read and parse a file. Never fails; failures are recorded as errors.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let file_path = path.as_ref().to_string_lossy().to_string();
        let bytes = match fs::read(path.as_ref()) {
            Ok(b) => b,
            Err(e) => return Self::failed(file_path, e.to_string()),
        };
        let text = match String::from_utf8(bytes) {
            Ok(t) => t,
            Err(e) => return Self::failed(file_path, e.to_string()),
        };
        Self::from_source(file_path, text)
    }

    /// Parse in-memory source under the given display path.
    pub fn from_source(path: impl Into<String>, source: impl Into<String>) -> Self {
        let file_path = path.into();
        let source = source.into().into_bytes();

        let mut parser = Parser::new();
        if let Err(e) = parser.set_language(&python::language()) {
            let mut analyzer = Self::failed(file_path, e.to_string());
            analyzer.source = source;
            return analyzer;
        }

        let tree = match parser.parse(&source, None) {
            Some(t) => t,
            None => {
                let mut analyzer = Self::failed(file_path, "parser produced no tree".to_string());
                analyzer.source = source;
                return analyzer;
            }
        };

        // Tree-sitter recovers from syntax errors instead of failing; a tree
        // containing an error node is treated as absent so every query
        // degrades to empty
        if let Some((line, message)) = python::first_error(&tree) {
            let error = ParseError {
                kind: ParseErrorKind::SyntaxError,
                line,
                message,
                filename: file_path.clone(),
            };
            return Self {
                file_path,
                source,
                tree: None,
                errors: vec![error],
            };
        }

        Self {
            file_path,
            source,
            tree: Some(tree),
            errors: Vec::new(),
        }
    }

    fn failed(file_path: String, message: String) -> Self {
        let error = ParseError {
            kind: ParseErrorKind::GenericError,
            line: 0,
            message,
            filename: file_path.clone(),
        };
        Self {
            file_path,
            source: Vec::new(),
            tree: None,
            errors: vec![error],
        }
    }

    /// The path this analyzer was constructed for.
    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    /// Errors captured at construction; empty when parsing succeeded.
    pub fn syntax_errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// All function, async function, and class definitions in the tree, in
    /// source position order.
    ///
    /// The walk visits every definition node, so a method appears both in
    /// its class's `methods` list and as an independent flat entry.
    pub fn definitions(&self) -> Vec<Definition> {
        match &self.tree {
            Some(tree) => {
                python::collect_definitions(tree, &self.source).unwrap_or_default()
            }
            None => Vec::new(),
        }
    }

    /// Top-level import statements, in source order.
    pub fn imports(&self) -> Vec<ImportRecord> {
        match &self.tree {
            Some(tree) => python::collect_imports(tree, &self.source),
            None => Vec::new(),
        }
    }

    /// Definition and import counts over the whole tree.
    pub fn complexity(&self) -> ComplexityMetrics {
        match &self.tree {
            Some(tree) => python::count_metrics(tree, &self.source).unwrap_or_default(),
            None => ComplexityMetrics::default(),
        }
    }
}
