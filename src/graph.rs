//! Call graph data model.
//!
//! Nodes are keyed by name: the first node created for a name wins and later
//! attempts to create the same name are no-ops. Edges are never deduplicated.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A vertex: a function, a route endpoint, or a synthetic handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub name: String,
    /// `"<param> <type>"` for declared functions, rendered argument
    /// expressions for nodes first seen at a call site.
    pub args: Vec<String>,
    #[serde(rename = "returns")]
    pub return_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl Node {
    /// A node with no arguments or return types.
    pub fn bare(name: impl Into<String>) -> Self {
        Self::with_signature(name, Vec::new(), Vec::new())
    }

    pub fn with_signature(
        name: impl Into<String>,
        args: Vec<String>,
        return_types: Vec<String>,
    ) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            args,
            return_types,
            endpoint: None,
        }
    }

    /// A route endpoint node; its id, name and endpoint are all the path.
    pub fn endpoint(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            endpoint: Some(path.clone()),
            ..Self::bare(path)
        }
    }
}

/// A directed call relationship with call-site provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    /// 1-indexed line of the call expression.
    pub line: usize,
    pub file: String,
    /// Set only on edges produced by a route registration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

/// The aggregate graph, in discovery order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CallGraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    #[serde(skip)]
    seen: HashSet<String>,
}

impl CallGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a node with this id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    /// Add a node unless one with the same id already exists.
    ///
    /// Returns true if the node was added.
    pub fn insert_node(&mut self, node: Node) -> bool {
        if self.seen.contains(&node.id) {
            return false;
        }
        self.seen.insert(node.id.clone());
        self.nodes.push(node);
        true
    }

    pub fn add_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Edges leaving `id`, in encounter order.
    pub fn edges_from<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.source == id)
    }

    /// Insert placeholder nodes for every edge endpoint that has none.
    ///
    /// Sources are checked before targets, edge by edge, so placeholder
    /// order follows edge order. Returns the number of nodes inserted.
    pub fn close(&mut self) -> usize {
        let mut pending = HashSet::new();
        let mut missing = Vec::new();
        for edge in &self.edges {
            for id in [&edge.source, &edge.target] {
                if !self.seen.contains(id.as_str()) && pending.insert(id.as_str()) {
                    missing.push(id.clone());
                }
            }
        }

        let inserted = missing.len();
        for id in missing {
            self.insert_node(Node::bare(id));
        }
        inserted
    }
}
