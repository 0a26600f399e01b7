//! Optional YAML configuration.
//!
//! ```yaml
//! exclude:
//!   - "**/vendor/**"
//!   - "**/mocks/**"
//! pretty: true
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};

/// Config file names searched for in the working directory.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["callgraph.yaml", ".callgraph.yaml"];

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Glob patterns for paths to leave out of the graph.
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Pretty-print the JSON document.
    #[serde(default)]
    pub pretty: bool,
}

impl Config {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load `explicit` if given, otherwise the first default config found in
    /// `dir`, otherwise defaults.
    pub fn load(explicit: Option<&Path>, dir: &Path) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            return Self::parse_file(path).map_err(|e| {
                anyhow::anyhow!("cannot load config {}: {}", path.display(), e)
            });
        }
        match discover(dir) {
            Some(path) => {
                tracing::debug!(config = %path.display(), "using discovered config");
                Self::parse_file(&path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Compile the exclusion patterns, plus any `extra` patterns.
    pub fn exclusion_set(&self, extra: &[String]) -> anyhow::Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in self.exclude.iter().chain(extra) {
            let glob = Glob::new(pattern)
                .map_err(|e| anyhow::anyhow!("invalid exclude pattern {:?}: {}", pattern, e))?;
            builder.add(glob);
        }
        Ok(builder.build()?)
    }
}

/// Find a default config file in `dir`.
fn discover(dir: &Path) -> Option<PathBuf> {
    DEFAULT_CONFIG_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}
