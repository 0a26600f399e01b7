//! JSON output for call graphs.

use std::io::Write;

use crate::error::{CallGraphError, Result};
use crate::graph::CallGraph;

/// Encode the graph as a JSON document.
///
/// The document has exactly two top-level arrays, `nodes` and `edges`.
pub fn to_json(graph: &CallGraph, pretty: bool) -> Result<Vec<u8>> {
    let encoded = if pretty {
        serde_json::to_vec_pretty(graph)?
    } else {
        serde_json::to_vec(graph)?
    };
    Ok(encoded)
}

/// Write the graph as JSON.
///
/// The whole document is encoded before the first byte is written, so an
/// encoding failure leaves the writer untouched.
pub fn write_json<W: Write>(writer: &mut W, graph: &CallGraph, pretty: bool) -> Result<()> {
    let encoded = to_json(graph, pretty)?;
    writer.write_all(&encoded).map_err(CallGraphError::Write)?;
    writer.flush().map_err(CallGraphError::Write)
}
