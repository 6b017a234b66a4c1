//! Python structural extraction using tree-sitter.
//!
//! Definition discovery runs a query over the whole tree; record details
//! (docstrings, parameters, return annotations, class methods) are read by
//! walking the captured nodes. Imports are collected from the module's direct
//! children only, so nested and conditional imports are not discovered.

use std::collections::BTreeMap;

use streaming_iterator::StreamingIterator;
use tree_sitter::{Language, Node, Query, QueryCursor, Tree};

use crate::analysis::{
    ComplexityMetrics, Definition, DefinitionKind, ImportRecord, Method,
};

/// Tree-sitter query for finding definition nodes anywhere in the tree.
///
/// Decorated definitions are reached through their inner nodes, so the
/// captured node always starts at the `def` / `class` keyword (or the
/// `async` keyword for async functions).
const DEFINITION_QUERY: &str = r#"
(function_definition) @definition
(class_definition) @definition
"#;

/// Tree-sitter query for structural counts.
///
/// Each import statement matches once regardless of how many names it
/// imports; `function_definition` covers both plain and async functions.
const METRIC_QUERY: &str = r#"
(function_definition) @function
(class_definition) @class
(import_statement) @import
(import_from_statement) @import
(future_import_statement) @import
"#;

pub(crate) fn language() -> Language {
    tree_sitter_python::LANGUAGE.into()
}

/// Get text for a node, tolerating invalid ranges.
fn node_text<'a>(node: Node<'a>, source: &'a [u8]) -> &'a str {
    node.utf8_text(source).unwrap_or("")
}

/// Find the first direct child with the given kind.
fn child_by_kind<'a>(node: Node<'a>, kind: &str) -> Option<Node<'a>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|c| c.kind() == kind);
    found
}

/// 1-indexed start line of a node.
fn start_line(node: Node) -> usize {
    node.start_position().row + 1
}

/// Locate the first ERROR or MISSING node, returning its line and a
/// best-effort diagnostic.
pub(crate) fn first_error(tree: &Tree) -> Option<(usize, String)> {
    let node = find_error_node(tree.root_node())?;
    let message = if node.is_missing() {
        format!("missing {}", node.kind())
    } else {
        "invalid syntax".to_string()
    };
    Some((start_line(node), message))
}

fn find_error_node(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    // has_error covers the whole subtree, so clean branches are skipped
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = find_error_node(child) {
            return Some(found);
        }
    }
    None
}

/// Collect every function and class definition in the tree, in source
/// position order (pre-order: a class precedes its methods, an outer
/// function precedes the ones nested in it).
pub(crate) fn collect_definitions(tree: &Tree, source: &[u8]) -> anyhow::Result<Vec<Definition>> {
    let query = Query::new(&language(), DEFINITION_QUERY)?;
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&query, tree.root_node(), source);

    let mut nodes = Vec::new();
    while let Some(m) = matches.next() {
        for capture in m.captures {
            nodes.push(capture.node);
        }
    }
    nodes.sort_by_key(|n| n.start_byte());

    Ok(nodes
        .into_iter()
        .filter_map(|node| match node.kind() {
            "class_definition" => class_definition(node, source),
            _ => callable_definition(node, source),
        })
        .collect())
}

fn callable_definition(node: Node, source: &[u8]) -> Option<Definition> {
    let name = node
        .child_by_field_name("name")
        .map(|n| node_text(n, source).to_string())?;
    let kind = if is_async(node) {
        DefinitionKind::AsyncFunction
    } else {
        DefinitionKind::Function
    };
    Some(Definition::Callable {
        kind,
        name,
        line: start_line(node),
        docstring: docstring(node, source),
        args: parameter_names(node, source),
        returns: node
            .child_by_field_name("return_type")
            .and_then(|n| render_return_annotation(n, source)),
    })
}

fn class_definition(node: Node, source: &[u8]) -> Option<Definition> {
    let name = node
        .child_by_field_name("name")
        .map(|n| node_text(n, source).to_string())?;
    Some(Definition::Class {
        kind: DefinitionKind::Class,
        name,
        line: start_line(node),
        docstring: docstring(node, source),
        methods: class_methods(node, source),
    })
}

fn is_async(node: Node) -> bool {
    node.child(0).map(|c| c.kind() == "async").unwrap_or(false)
}

/// Direct children of the class body that are (possibly decorated) function
/// definitions.
fn class_methods(class_node: Node, source: &[u8]) -> Vec<Method> {
    let body = match class_node.child_by_field_name("body") {
        Some(b) => b,
        None => return Vec::new(),
    };

    let mut methods = Vec::new();
    let mut cursor = body.walk();
    for item in body.children(&mut cursor) {
        // A decorated method is still a method of the class
        let item = if item.kind() == "decorated_definition" {
            match item.child_by_field_name("definition") {
                Some(inner) => inner,
                None => continue,
            }
        } else {
            item
        };

        if item.kind() != "function_definition" {
            continue;
        }
        if let Some(name_node) = item.child_by_field_name("name") {
            let name = node_text(name_node, source).to_string();
            let is_private = name.starts_with('_');
            methods.push(Method {
                name,
                line: start_line(item),
                docstring: docstring(item, source),
                is_private,
            });
        }
    }
    methods
}

/// Extract the docstring: the first statement of the body, when it is a
/// standalone string literal.
fn docstring(def_node: Node, source: &[u8]) -> Option<String> {
    let body = def_node.child_by_field_name("body")?;
    let mut cursor = body.walk();
    for stmt in body.children(&mut cursor) {
        if stmt.kind() == "comment" {
            continue;
        }
        if stmt.kind() == "expression_statement" {
            if let Some(expr) = stmt.child(0) {
                return string_content(expr, source);
            }
        }
        // Only the first statement qualifies
        return None;
    }
    None
}

/// Content of a string literal (or adjacent-literal concatenation), with
/// prefixes and quotes stripped and surrounding whitespace trimmed.
fn string_content(node: Node, source: &[u8]) -> Option<String> {
    let content = match node.kind() {
        "string" => strip_quotes(strip_string_prefix(node_text(node, source))).to_string(),
        "concatenated_string" => {
            let mut out = String::new();
            let mut cursor = node.walk();
            for part in node.children(&mut cursor) {
                if part.kind() == "string" {
                    out.push_str(strip_quotes(strip_string_prefix(node_text(part, source))));
                }
            }
            out
        }
        _ => return None,
    };

    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Strip a string prefix (r, b, u, f and their combinations, any case).
/// Prefix characters only ever appear before the opening quote.
fn strip_string_prefix(text: &str) -> &str {
    text.trim_start_matches(|c: char| matches!(c, 'r' | 'R' | 'b' | 'B' | 'u' | 'U' | 'f' | 'F'))
}

/// Strip matching quotes from a string literal. Triple quotes are checked
/// first so `"""x"""` is not mistaken for an empty single-quoted string.
fn strip_quotes(text: &str) -> &str {
    for quote in ["\"\"\"", "'''", "\"", "'"] {
        if let Some(rest) = text.strip_prefix(quote) {
            return rest.strip_suffix(quote).unwrap_or(rest);
        }
    }
    text
}

/// Positional parameter names, with `self` filtered out.
///
/// Collection stops at a splat or bare `*` (keyword-only parameters follow),
/// and a `/` discards what precedes it (positional-only parameters are not
/// part of the positional-or-keyword list).
fn parameter_names(func_node: Node, source: &[u8]) -> Vec<String> {
    let params = match func_node.child_by_field_name("parameters") {
        Some(p) => p,
        None => return Vec::new(),
    };

    let mut names = Vec::new();
    let mut cursor = params.walk();
    for child in params.children(&mut cursor) {
        match child.kind() {
            "identifier" => push_param(&mut names, node_text(child, source)),
            "typed_parameter" => {
                // A typed splat nests its identifier inside the splat
                // pattern; everything after it is keyword-only
                if child_by_kind(child, "list_splat_pattern").is_some()
                    || child_by_kind(child, "dictionary_splat_pattern").is_some()
                {
                    break;
                }
                if let Some(id) = child_by_kind(child, "identifier") {
                    push_param(&mut names, node_text(id, source));
                }
            }
            "default_parameter" | "typed_default_parameter" => {
                if let Some(name) = child.child_by_field_name("name") {
                    if name.kind() == "identifier" {
                        push_param(&mut names, node_text(name, source));
                    }
                }
            }
            "keyword_separator" | "*" => break,
            "list_splat_pattern" | "dictionary_splat_pattern" => break,
            "positional_separator" | "/" => names.clear(),
            _ => {}
        }
    }
    names
}

fn push_param(names: &mut Vec<String>, name: &str) {
    if name != "self" {
        names.push(name.to_string());
    }
}

/// Best-effort rendering of a return annotation.
///
/// Simple identifiers and literal constants render as their text; a
/// subscripted generic with an identifier base renders as `Base[...]`.
/// Anything else renders as absent.
fn render_return_annotation(annotation: Node, source: &[u8]) -> Option<String> {
    let inner = if annotation.kind() == "type" {
        annotation.named_child(0)?
    } else {
        annotation
    };

    match inner.kind() {
        "identifier" => Some(node_text(inner, source).to_string()),
        "none" | "true" | "false" | "integer" | "float" => {
            Some(node_text(inner, source).to_string())
        }
        "string" => string_content(inner, source),
        "subscript" => {
            let value = inner.child_by_field_name("value")?;
            if value.kind() == "identifier" {
                Some(format!("{}[...]", node_text(value, source)))
            } else {
                None
            }
        }
        "generic_type" => {
            let base = inner.named_child(0)?;
            if base.kind() == "identifier" {
                Some(format!("{}[...]", node_text(base, source)))
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Scan the module's direct children for import statements.
pub(crate) fn collect_imports(tree: &Tree, source: &[u8]) -> Vec<ImportRecord> {
    let root = tree.root_node();
    let mut records = Vec::new();
    let mut cursor = root.walk();

    for stmt in root.children(&mut cursor) {
        match stmt.kind() {
            "import_statement" => {
                let mut names = stmt.walk();
                for name in stmt.children_by_field_name("name", &mut names) {
                    if let Some(record) = plain_import(name, source) {
                        records.push(record);
                    }
                }
            }
            "import_from_statement" => records.push(from_import(stmt, source)),
            "future_import_statement" => {
                let (names, alias) = imported_names(stmt, source);
                records.push(ImportRecord::FromImport {
                    module: Some("__future__".to_string()),
                    names,
                    alias,
                });
            }
            _ => {}
        }
    }
    records
}

fn plain_import(name: Node, source: &[u8]) -> Option<ImportRecord> {
    match name.kind() {
        "dotted_name" => Some(ImportRecord::Import {
            module: node_text(name, source).to_string(),
            alias: None,
        }),
        "aliased_import" => {
            let module = name.child_by_field_name("name")?;
            let alias = name.child_by_field_name("alias")?;
            Some(ImportRecord::Import {
                module: node_text(module, source).to_string(),
                alias: Some(node_text(alias, source).to_string()),
            })
        }
        _ => None,
    }
}

fn from_import(stmt: Node, source: &[u8]) -> ImportRecord {
    let module = stmt
        .child_by_field_name("module_name")
        .and_then(|m| match m.kind() {
            "dotted_name" => Some(node_text(m, source).to_string()),
            // `from .pkg import x` carries the module name after the dots;
            // `from . import x` has none
            "relative_import" => {
                child_by_kind(m, "dotted_name").map(|n| node_text(n, source).to_string())
            }
            _ => None,
        });

    let (names, alias) = imported_names(stmt, source);
    ImportRecord::FromImport {
        module,
        names,
        alias,
    }
}

fn imported_names(stmt: Node, source: &[u8]) -> (Vec<String>, BTreeMap<String, Option<String>>) {
    let mut names = Vec::new();
    let mut alias_map = BTreeMap::new();

    if child_by_kind(stmt, "wildcard_import").is_some() {
        names.push("*".to_string());
        alias_map.insert("*".to_string(), None);
        return (names, alias_map);
    }

    let mut cursor = stmt.walk();
    for name in stmt.children_by_field_name("name", &mut cursor) {
        match name.kind() {
            "dotted_name" => {
                let text = node_text(name, source).to_string();
                names.push(text.clone());
                alias_map.insert(text, None);
            }
            "aliased_import" => {
                if let Some(inner) = name.child_by_field_name("name") {
                    let text = node_text(inner, source).to_string();
                    let alias = name
                        .child_by_field_name("alias")
                        .map(|a| node_text(a, source).to_string());
                    names.push(text.clone());
                    alias_map.insert(text, alias);
                }
            }
            _ => {}
        }
    }
    (names, alias_map)
}

/// Count definitions and import statements over the whole tree.
pub(crate) fn count_metrics(tree: &Tree, source: &[u8]) -> anyhow::Result<ComplexityMetrics> {
    let query = Query::new(&language(), METRIC_QUERY)?;
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&query, tree.root_node(), source);

    let mut metrics = ComplexityMetrics::default();
    while let Some(m) = matches.next() {
        for capture in m.captures {
            match query.capture_names()[capture.index as usize] {
                "function" => metrics.function_count += 1,
                "class" => metrics.class_count += 1,
                "import" => metrics.import_count += 1,
                _ => {}
            }
        }
    }
    Ok(metrics)
}
