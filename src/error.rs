//! Error types for call graph extraction.

use std::io;

use thiserror::Error;

/// Errors that abort a call graph run.
///
/// There is no partial-result mode: any of these stops the run before
/// anything is written to the output.
#[derive(Error, Debug)]
pub enum CallGraphError {
    #[error("no input files given")]
    NoInput,
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to load Go grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),
    #[error("invalid tree-sitter query: {0}")]
    Query(#[from] tree_sitter::QueryError),
    #[error("failed to parse {path}: {reason}")]
    Parse { path: String, reason: String },
    #[error("failed to encode call graph: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write output: {0}")]
    Write(#[source] io::Error),
}

pub type Result<T> = std::result::Result<T, CallGraphError>;
