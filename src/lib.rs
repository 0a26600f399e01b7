//! callgraph - function-level call graphs for Go code.
//!
//! Given a list of Go source files, callgraph records every function
//! declaration and every call site, and recognizes HTTP route registrations
//! such as `router.GET("/users", handlers.List)`. The result is a graph of
//! nodes (functions, endpoints, inline handlers) and edges (call sites with
//! file and line) serialized as JSON.
//!
//! # Architecture
//!
//! - `parser`: tree-sitter front end producing `ParsedFile`s
//! - `analysis`: declaration pass, call-site pass, route heuristic
//! - `graph`: `Node`, `Edge`, `CallGraph` and the closure pass
//! - `report`: JSON output
//! - `config`, `cli`: YAML configuration and command-line handling
//!
//! Function identity is the bare name: two functions with the same name in
//! different files or packages share one node, and the first declaration
//! seen supplies its signature.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod graph;
pub mod parser;
pub mod report;

pub use analysis::{analyze_paths, analyze_sources, is_test_file, CallGraphBuilder, HttpVerb};
pub use config::Config;
pub use error::{CallGraphError, Result};
pub use graph::{CallGraph, Edge, Node};
pub use parser::{GoParser, ParsedFile};
