//! Call-site pass: one edge per call expression.

use tree_sitter::Node as TsNode;

use super::routes::HttpVerb;
use super::stringify::render_expr;
use super::CallGraphBuilder;
use crate::graph::{Edge, Node};
use crate::parser::ParsedFile;

/// How a call names its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Callee<'a> {
    /// `f(...)`
    Identifier(&'a str),
    /// `x.f(...)`; only the selected name is kept.
    Selector(&'a str),
}

impl<'a> Callee<'a> {
    pub(super) fn name(&self) -> &'a str {
        match *self {
            Callee::Identifier(name) | Callee::Selector(name) => name,
        }
    }
}

/// Resolve the callee of a `call_expression`.
///
/// Returns `None` for callee shapes that do not name a function directly:
/// parenthesized callees, function literals, index expressions and explicit
/// generic instantiations such as `Map[int](xs)`.
pub(super) fn resolve_callee<'a>(parsed: &'a ParsedFile, call: TsNode) -> Option<Callee<'a>> {
    if call.child_by_field_name("type_arguments").is_some() {
        return None;
    }
    let function = call.child_by_field_name("function")?;
    match function.kind() {
        "identifier" => Some(Callee::Identifier(parsed.node_text(function))),
        "selector_expression" => {
            let field = function.child_by_field_name("field")?;
            Some(Callee::Selector(parsed.node_text(field)))
        }
        _ => None,
    }
}

/// Argument expressions of a call, in order, with `xs...` unwrapped to `xs`.
pub(super) fn call_arguments<'tree>(call: TsNode<'tree>) -> Vec<TsNode<'tree>> {
    let Some(list) = call.child_by_field_name("arguments") else {
        return Vec::new();
    };
    let mut cursor = list.walk();
    let args = list
        .named_children(&mut cursor)
        .filter(|arg| arg.kind() != "comment")
        .filter_map(|arg| {
            if arg.kind() == "variadic_argument" {
                arg.named_child(0)
            } else {
                Some(arg)
            }
        })
        .collect();
    args
}

/// 1-indexed line a node starts on.
pub(super) fn line_of(node: TsNode) -> usize {
    node.start_position().row + 1
}

impl CallGraphBuilder {
    /// Walk the whole tree, recording calls against the current function.
    pub(super) fn collect_calls(&mut self, parsed: &ParsedFile) {
        self.visit(parsed, parsed.root());
    }

    fn visit(&mut self, parsed: &ParsedFile, node: TsNode) {
        match node.kind() {
            "function_declaration" | "method_declaration" => {
                if let Some(name) = node.child_by_field_name("name") {
                    self.current_function = parsed.node_text(name).to_string();
                }
            }
            "call_expression" => self.record_call(parsed, node),
            _ => {}
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.visit(parsed, child);
        }
    }

    fn record_call(&mut self, parsed: &ParsedFile, call: TsNode) {
        let Some(callee) = resolve_callee(parsed, call) else {
            return;
        };
        let target = callee.name();
        let line = line_of(call);
        let args = call_arguments(call);

        if !self.graph.contains(target) {
            let rendered = args.iter().map(|arg| render_expr(parsed, *arg)).collect();
            self.graph.insert_node(Node::with_signature(target, rendered, Vec::new()));
        }

        self.graph.add_edge(Edge {
            source: self.current_function.clone(),
            target: target.to_string(),
            line,
            file: parsed.path.clone(),
            endpoint: None,
        });

        if let Callee::Selector(method) = callee {
            if let Some(verb) = HttpVerb::from_method(method) {
                if let [path, handler, ..] = args.as_slice() {
                    self.record_route(parsed, verb, *path, *handler, line);
                }
            }
        }
    }
}
