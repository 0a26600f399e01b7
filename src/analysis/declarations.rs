//! Declaration pass: one node per function or method declaration.

use streaming_iterator::StreamingIterator;
use tracing::trace;
use tree_sitter::{Language, Node as TsNode, Query, QueryCursor};

use super::stringify::{render_type, UNKNOWN};
use super::CallGraphBuilder;
use crate::error::Result;
use crate::graph::Node;
use crate::parser::ParsedFile;

/// Tree-sitter query for function and method declarations.
///
/// Methods are included: receivers do not take part in node identity.
const DECLARATION_QUERY: &str = r#"
(function_declaration
  name: (identifier) @name
) @decl

(method_declaration
  name: (field_identifier) @name
) @decl
"#;

pub(super) fn compile_query(language: &Language) -> Result<Query> {
    Ok(Query::new(language, DECLARATION_QUERY)?)
}

impl CallGraphBuilder {
    /// Record every declaration in `parsed`, keeping the first signature
    /// seen for a name.
    pub(super) fn collect_declarations(&mut self, parsed: &ParsedFile) {
        let query = &self.declaration_query;
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(query, parsed.root(), &parsed.source[..]);

        while let Some(m) = matches.next() {
            let mut name = None;
            let mut decl = None;

            for capture in m.captures {
                match query.capture_names()[capture.index as usize] {
                    "name" => name = Some(parsed.node_text(capture.node).to_string()),
                    "decl" => decl = Some(capture.node),
                    _ => {}
                }
            }

            let (Some(name), Some(decl)) = (name, decl) else {
                continue;
            };

            self.current_function = name.clone();

            if self.graph.contains(&name) {
                trace!(function = %name, file = %parsed.path, "keeping earlier declaration");
                continue;
            }

            let args = formal_parameters(parsed, decl);
            let returns = return_types(parsed, decl);
            self.graph.insert_node(Node::with_signature(name, args, returns));
        }
    }
}

/// `"<name> <type>"` for every named parameter, in order.
fn formal_parameters(parsed: &ParsedFile, decl: TsNode) -> Vec<String> {
    let Some(list) = decl.child_by_field_name("parameters") else {
        return Vec::new();
    };

    let mut args = Vec::new();
    let mut cursor = list.walk();
    for param in list.named_children(&mut cursor) {
        match param.kind() {
            "parameter_declaration" => {
                let ty = param
                    .child_by_field_name("type")
                    .map(|t| render_type(parsed, t))
                    .unwrap_or_else(|| UNKNOWN.to_string());
                let mut names = param.walk();
                for name in param.children_by_field_name("name", &mut names) {
                    args.push(format!("{} {}", parsed.node_text(name), ty));
                }
            }
            // `...T` has no plain type rendering.
            "variadic_parameter_declaration" => {
                if let Some(name) = param.child_by_field_name("name") {
                    args.push(format!("{} {}", parsed.node_text(name), UNKNOWN));
                }
            }
            _ => {}
        }
    }
    args
}

/// One rendered type per result item; a named group `(a, b T)` counts once.
fn return_types(parsed: &ParsedFile, decl: TsNode) -> Vec<String> {
    let Some(result) = decl.child_by_field_name("result") else {
        return Vec::new();
    };

    if result.kind() != "parameter_list" {
        return vec![render_type(parsed, result)];
    }

    let mut cursor = result.walk();
    let returns = result
        .named_children(&mut cursor)
        .filter(|item| {
            matches!(
                item.kind(),
                "parameter_declaration" | "variadic_parameter_declaration"
            )
        })
        .map(|item| {
            item.child_by_field_name("type")
                .map(|t| render_type(parsed, t))
                .unwrap_or_else(|| UNKNOWN.to_string())
        })
        .collect();
    returns
}
