//! Record types produced by file analysis.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Kind of definition found in a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DefinitionKind {
    Function,
    AsyncFunction,
    Class,
}

impl DefinitionKind {
    /// Convert to a string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            DefinitionKind::Function => "function",
            DefinitionKind::AsyncFunction => "async_function",
            DefinitionKind::Class => "class",
        }
    }

    /// Title-cased label used in quickfix entries and report output.
    pub fn label(&self) -> &'static str {
        match self {
            DefinitionKind::Function => "Function",
            DefinitionKind::AsyncFunction => "Async_Function",
            DefinitionKind::Class => "Class",
        }
    }

    /// Check if this is a callable (plain or async function).
    pub fn is_callable(&self) -> bool {
        matches!(
            self,
            DefinitionKind::Function | DefinitionKind::AsyncFunction
        )
    }
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A function or class definition extracted from source code.
///
/// Callables carry their parameter list and return annotation; classes carry
/// their direct methods. A method belonging to an emitted class also appears
/// as an independent `Callable` entry in the flat definition list, since the
/// walk visits every definition node in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Definition {
    Callable {
        kind: DefinitionKind,
        name: String,
        line: usize,
        docstring: Option<String>,
        args: Vec<String>,
        returns: Option<String>,
    },
    Class {
        kind: DefinitionKind,
        name: String,
        line: usize,
        docstring: Option<String>,
        methods: Vec<Method>,
    },
}

impl Definition {
    pub fn kind(&self) -> DefinitionKind {
        match self {
            Definition::Callable { kind, .. } => *kind,
            Definition::Class { kind, .. } => *kind,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Definition::Callable { name, .. } => name,
            Definition::Class { name, .. } => name,
        }
    }

    /// 1-indexed line of the `def` / `class` keyword.
    pub fn line(&self) -> usize {
        match self {
            Definition::Callable { line, .. } => *line,
            Definition::Class { line, .. } => *line,
        }
    }
}

/// A method listed under its class definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Method {
    pub name: String,
    /// 1-indexed line of the `def` keyword.
    pub line: usize,
    pub docstring: Option<String>,
    /// Name starts with an underscore.
    pub is_private: bool,
}

/// An import statement record.
///
/// A plain `import a, b` statement yields one record per imported name, each
/// with its own alias. A `from m import ...` statement yields a single record
/// listing all names together with a name-to-alias mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImportRecord {
    Import {
        module: String,
        alias: Option<String>,
    },
    FromImport {
        /// None for relative imports with no module segment (`from . import x`).
        module: Option<String>,
        names: Vec<String>,
        alias: BTreeMap<String, Option<String>>,
    },
}

/// Kind of failure captured at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseErrorKind {
    SyntaxError,
    GenericError,
}

/// A parse or read failure. Captured as data, never raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// 1-indexed failure line; 0 when unknown (read/decode failures).
    pub line: usize,
    pub message: String,
    pub filename: String,
}

/// Structural counts over the whole tree.
///
/// Each import statement counts once regardless of how many names it imports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ComplexityMetrics {
    pub function_count: usize,
    pub class_count: usize,
    pub import_count: usize,
}
