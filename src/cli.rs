//! Command-line interface for callgraph.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Once;

use clap::{ArgAction, Parser};
use globset::GlobSet;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use walkdir::WalkDir;

use crate::analysis;
use crate::config::Config;
use crate::report;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ERROR: i32 = 2;

/// Environment variable overriding the log filter, e.g. `CALLGRAPH_LOG=debug`.
pub const LOG_ENV: &str = "CALLGRAPH_LOG";

static LOG_INIT: Once = Once::new();

/// Extract a function-level call graph from Go sources.
///
/// Prints a JSON document with `nodes` (functions, route endpoints, inline
/// route handlers) and `edges` (call sites with file and line) to stdout.
/// Files whose path contains `_test` are skipped.
#[derive(Parser, Debug)]
#[command(name = "callgraph")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Go files or directories to analyze, in order
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(short, long)]
    pub pretty: bool,

    /// Exclude paths matching this glob (repeatable)
    #[arg(short, long, value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Increase log verbosity on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Initialize stderr logging. Safe to call more than once.
///
/// `CALLGRAPH_LOG` takes precedence over the verbosity flag.
pub fn init_logging(verbose: u8) {
    LOG_INIT.call_once(|| {
        let level = match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level));

        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(io::stderr).with_target(false))
            .with(filter)
            .init();
    });
}

/// Expand the command-line paths into the ordered list of files to analyze.
///
/// Directories are walked recursively for `.go` files, sorted by name; hidden
/// directories are skipped. Explicit files are kept as given, whatever their
/// extension. Anything matching `excluded` is dropped.
pub fn collect_files(paths: &[PathBuf], excluded: &GlobSet) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for root in paths {
        if !root.is_dir() {
            if excluded.is_match(root) {
                debug!(file = %root.display(), "excluded by pattern");
            } else {
                files.push(root.clone());
            }
            continue;
        }

        for entry in WalkDir::new(root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                let name = e.file_name().to_string_lossy();
                // Skip hidden directories below the root
                !(e.depth() > 0 && e.file_type().is_dir() && name.starts_with('.'))
            })
        {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("go") {
                continue;
            }
            if excluded.is_match(path) {
                debug!(file = %path.display(), "excluded by pattern");
                continue;
            }
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}

/// Run the tool: collect files, build the graph, print it.
pub fn run(cli: &Cli) -> anyhow::Result<i32> {
    let config = Config::load(cli.config.as_deref(), Path::new("."))?;
    let excluded = config.exclusion_set(&cli.exclude)?;

    let files = collect_files(&cli.paths, &excluded)?;
    debug!(count = files.len(), "collected input files");

    let graph = analysis::analyze_paths(files.as_slice())?;

    let pretty = cli.pretty || config.pretty;
    let stdout = io::stdout();
    report::write_json(&mut stdout.lock(), &graph, pretty)?;

    Ok(EXIT_SUCCESS)
}
