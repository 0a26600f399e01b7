//! Call graph extraction from Go syntax trees.
//!
//! Each file is walked twice:
//!
//! ```text
//! ┌─────────────┐     ┌──────────────────┐     ┌───────────────────┐
//! │ ParsedFile  │────▶│ Declaration pass │────▶│ Call-site pass    │
//! └─────────────┘     │ (nodes + sigs)   │     │ (edges + routes)  │
//!                     └──────────────────┘     └───────────────────┘
//!                                                        │
//!                      after the last file               ▼
//!                     ┌──────────────────┐     ┌───────────────────┐
//!                     │ CallGraph        │◀────│ Closure           │
//!                     └──────────────────┘     └───────────────────┘
//! ```
//!
//! All run state lives in [`CallGraphBuilder`]: the graph, the
//! "current function" slot and the anonymous handler counter. None of it is
//! reset between files.

mod calls;
mod declarations;
mod routes;
pub mod stringify;

use std::path::Path;

use tracing::{debug, info};
use tree_sitter::{Language, Query};

use crate::error::{CallGraphError, Result};
use crate::graph::CallGraph;
use crate::parser::{GoParser, ParsedFile};

pub use routes::HttpVerb;

/// Paths containing this marker are never analyzed.
pub const TEST_FILE_MARKER: &str = "_test";

/// Whether a path names a test file (case-sensitive substring match).
pub fn is_test_file(path: &Path) -> bool {
    path.to_string_lossy().contains(TEST_FILE_MARKER)
}

/// Accumulates a call graph across files.
///
/// Feed files in order with [`add_file`](Self::add_file), then call
/// [`finish`](Self::finish) once.
pub struct CallGraphBuilder {
    graph: CallGraph,
    /// Name of the most recently entered function or method declaration.
    ///
    /// Updated at declaration boundaries in both passes and never restored,
    /// so calls outside any function body are attributed to whatever was
    /// entered last (or to `""` before the first declaration of the run).
    current_function: String,
    /// Next `AnonFunc<N>` suffix. Shared by the whole run.
    next_anon_id: usize,
    declaration_query: Query,
}

impl CallGraphBuilder {
    /// Create a builder for the given Go grammar.
    pub fn new(language: &Language) -> Result<Self> {
        Ok(Self {
            graph: CallGraph::new(),
            current_function: String::new(),
            next_anon_id: 0,
            declaration_query: declarations::compile_query(language)?,
        })
    }

    /// Run both passes over one file.
    pub fn add_file(&mut self, parsed: &ParsedFile) {
        let nodes_before = self.graph.nodes.len();
        let edges_before = self.graph.edges.len();

        self.collect_declarations(parsed);
        self.collect_calls(parsed);

        debug!(
            file = %parsed.path,
            nodes = self.graph.nodes.len() - nodes_before,
            edges = self.graph.edges.len() - edges_before,
            "analyzed file"
        );
    }

    /// Close the graph and hand it over.
    pub fn finish(mut self) -> CallGraph {
        let placeholders = self.graph.close();
        debug!(placeholders, "closed call graph");
        self.graph
    }

    fn next_anon_name(&mut self) -> String {
        let name = format!("AnonFunc{}", self.next_anon_id);
        self.next_anon_id += 1;
        name
    }
}

/// Build a call graph from Go files, in the order given.
///
/// Test files are skipped. The first unreadable or unparsable file aborts
/// the whole run.
pub fn analyze_paths<P: AsRef<Path>>(paths: &[P]) -> Result<CallGraph> {
    if paths.is_empty() {
        return Err(CallGraphError::NoInput);
    }

    let parser = GoParser::new();
    let mut builder = CallGraphBuilder::new(parser.language())?;
    let mut analyzed = 0usize;

    for path in paths {
        let path = path.as_ref();
        if is_test_file(path) {
            debug!(file = %path.display(), "skipping test file");
            continue;
        }
        let parsed = parser.parse_file(path)?;
        builder.add_file(&parsed);
        analyzed += 1;
    }

    let graph = builder.finish();
    info!(
        files = analyzed,
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "call graph complete"
    );
    Ok(graph)
}

/// Build a call graph from in-memory sources, as `(path, source)` pairs.
///
/// Same rules as [`analyze_paths`] without touching the filesystem.
pub fn analyze_sources<P, S>(sources: &[(P, S)]) -> Result<CallGraph>
where
    P: AsRef<Path>,
    S: AsRef<[u8]>,
{
    if sources.is_empty() {
        return Err(CallGraphError::NoInput);
    }

    let parser = GoParser::new();
    let mut builder = CallGraphBuilder::new(parser.language())?;

    for (path, source) in sources {
        let path = path.as_ref();
        if is_test_file(path) {
            debug!(file = %path.display(), "skipping test file");
            continue;
        }
        let parsed = parser.parse(path, source.as_ref())?;
        builder.add_file(&parsed);
    }

    Ok(builder.finish())
}
