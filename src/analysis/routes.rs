//! Route registration heuristic.
//!
//! A selector call such as `router.GET(path, handler)` whose method name is an
//! HTTP verb registers `handler` for `path`. The path becomes an endpoint node
//! linked to the handler; inline handlers get a synthetic `AnonFunc<N>` node.

use std::fmt;

use tracing::debug;
use tree_sitter::Node as TsNode;

use super::calls::{line_of, resolve_callee, Callee};
use super::stringify::render_expr;
use super::CallGraphBuilder;
use crate::graph::{Edge, Node};
use crate::parser::ParsedFile;

/// HTTP verbs recognized as route registration methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpVerb {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpVerb {
    /// Match a method name case-insensitively (`GET`, `Get`, `get`).
    pub fn from_method(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "get" => Some(HttpVerb::Get),
            "post" => Some(HttpVerb::Post),
            "put" => Some(HttpVerb::Put),
            "delete" => Some(HttpVerb::Delete),
            "patch" => Some(HttpVerb::Patch),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpVerb::Get => "GET",
            HttpVerb::Post => "POST",
            HttpVerb::Put => "PUT",
            HttpVerb::Delete => "DELETE",
            HttpVerb::Patch => "PATCH",
        }
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl CallGraphBuilder {
    /// Record a route registration made at `line`.
    ///
    /// Handler shapes other than `obj.Method` and `func(...) {...}` are
    /// skipped; the ordinary call edge has already been recorded.
    pub(super) fn record_route(
        &mut self,
        parsed: &ParsedFile,
        verb: HttpVerb,
        path: TsNode,
        handler: TsNode,
        line: usize,
    ) {
        let endpoint = render_expr(parsed, path);

        match handler.kind() {
            "selector_expression" => {
                let Some(field) = handler.child_by_field_name("field") else {
                    return;
                };
                let target = parsed.node_text(field).to_string();
                debug!(%verb, endpoint = %endpoint, handler = %target, line, "route registration");

                self.graph.insert_node(Node::endpoint(endpoint.clone()));
                self.graph.insert_node(Node::bare(target.clone()));
                self.add_route_edge(parsed, &endpoint, target, line);
            }
            "func_literal" => {
                let handler_name = self.next_anon_name();
                debug!(%verb, endpoint = %endpoint, handler = %handler_name, line, "inline route handler");

                self.graph.insert_node(Node::endpoint(endpoint.clone()));
                self.add_route_edge(parsed, &endpoint, handler_name.clone(), line);
                self.graph.insert_node(Node::bare(handler_name.clone()));

                if let Some(body) = handler.child_by_field_name("body") {
                    self.scan_handler_body(parsed, body, &handler_name);
                }
            }
            other => {
                debug!(%verb, endpoint = %endpoint, kind = other, line, "unsupported route handler");
            }
        }
    }

    fn add_route_edge(&mut self, parsed: &ParsedFile, endpoint: &str, target: String, line: usize) {
        self.graph.add_edge(Edge {
            source: endpoint.to_string(),
            target,
            line,
            file: parsed.path.clone(),
            endpoint: Some(endpoint.to_string()),
        });
    }

    /// Link an inline handler to every selector call in its body, including
    /// calls inside nested literals. Bare identifier calls are not linked.
    fn scan_handler_body(&mut self, parsed: &ParsedFile, node: TsNode, handler_name: &str) {
        if node.kind() == "call_expression" {
            if let Some(Callee::Selector(target)) = resolve_callee(parsed, node) {
                self.graph.insert_node(Node::bare(target));
                self.graph.add_edge(Edge {
                    source: handler_name.to_string(),
                    target: target.to_string(),
                    line: line_of(node),
                    file: parsed.path.clone(),
                    endpoint: None,
                });
            }
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.scan_handler_body(parsed, child, handler_name);
        }
    }
}
