//! Tree-sitter front end for Go sources.
//!
//! This module provides:
//! - `ParsedFile`: a parse tree together with the source it was built from
//! - `GoParser`: turns Go source text into a `ParsedFile`, rejecting sources
//!   with syntax errors

use std::fs;
use std::path::Path;

use tree_sitter::{Language, Node, Parser, Tree};

use crate::error::{CallGraphError, Result};

/// Holds a parsed tree-sitter tree and associated metadata.
///
/// The tree is walked twice per file (declarations, then calls), so the
/// source is kept alongside it for node text extraction.
pub struct ParsedFile {
    /// The tree-sitter parse tree.
    pub tree: Tree,
    /// Raw source bytes.
    pub source: Vec<u8>,
    /// The file path exactly as it was given; recorded on every edge.
    pub path: String,
}

impl ParsedFile {
    /// Get text for a tree-sitter node.
    pub fn node_text(&self, node: Node) -> &str {
        node.utf8_text(&self.source).unwrap_or("")
    }

    /// Root node of the tree.
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }
}

/// Go parser backed by `tree-sitter-go`.
pub struct GoParser {
    language: Language,
}

impl GoParser {
    /// Create a new Go parser.
    pub fn new() -> Self {
        Self {
            language: tree_sitter_go::LANGUAGE.into(),
        }
    }

    /// The tree-sitter language, for building queries against parsed trees.
    pub fn language(&self) -> &Language {
        &self.language
    }

    /// Read and parse a file from disk.
    pub fn parse_file(&self, path: &Path) -> Result<ParsedFile> {
        let source = fs::read(path).map_err(|source| CallGraphError::Read {
            path: path.display().to_string(),
            source,
        })?;
        self.parse(path, &source)
    }

    /// Parse Go source text.
    ///
    /// Tree-sitter recovers from syntax errors by inserting ERROR and MISSING
    /// nodes; such trees are rejected so a malformed file aborts the run. So
    /// are sources that are not UTF-8 and files without a package clause.
    pub fn parse(&self, path: &Path, source: &[u8]) -> Result<ParsedFile> {
        let display = path.to_string_lossy().to_string();

        if let Err(e) = std::str::from_utf8(source) {
            return Err(CallGraphError::Parse {
                path: display,
                reason: format!("invalid UTF-8 at byte {}", e.valid_up_to()),
            });
        }

        let mut parser = Parser::new();
        parser.set_language(&self.language)?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| CallGraphError::Parse {
                path: display.clone(),
                reason: "parser produced no tree".to_string(),
            })?;

        if let Some(bad) = first_error(tree.root_node()) {
            let pos = bad.start_position();
            return Err(CallGraphError::Parse {
                path: display,
                reason: format!("syntax error at {}:{}", pos.row + 1, pos.column + 1),
            });
        }

        if !has_package_clause(tree.root_node()) {
            return Err(CallGraphError::Parse {
                path: display,
                reason: "expected 'package' clause".to_string(),
            });
        }

        Ok(ParsedFile {
            tree,
            source: source.to_vec(),
            path: display,
        })
    }
}

impl Default for GoParser {
    fn default() -> Self {
        Self::new()
    }
}

fn has_package_clause(root: Node) -> bool {
    let mut cursor = root.walk();
    let found = root
        .named_children(&mut cursor)
        .any(|child| child.kind() == "package_clause");
    found
}

/// Find the first ERROR or MISSING node in document order.
fn first_error(node: Node) -> Option<Node> {
    if !node.has_error() {
        return None;
    }
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find_map(first_error);
    // has_error() was true but no child owns it: report the node itself.
    Some(found.unwrap_or(node))
}
