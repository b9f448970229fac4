//! Run configuration: engine knobs, PageRank parameters, output location and
//! the list of datasets to analyse.
//!
//! Two on-disk formats are accepted:
//!
//! - `hypercent.toml`, every field optional:
//!
//!   ```toml
//!   [engine]
//!   threads = 0              # 0 = one worker per core
//!   chunk_size = 64          # sources per reduction chunk
//!   hyperedge_offset = 4000000
//!
//!   [pagerank]
//!   damping = 0.85
//!   tolerance = 1e-5
//!   max_iter = 10000
//!
//!   [output]
//!   dir = "Output"
//!
//!   [[datasets]]
//!   name = "CORUM protein complexes"
//!   graph = "corum_dataset.graph"
//!   hypergraph = "corum_dataset.hypergraph"
//!   output_name = "corum_dataset"
//!   ```
//!
//! - the older `dataset_init.txt`: records of four lines (display name,
//!   graph path, hypergraph path, output base name). Empty lines between
//!   records are skipped. Engine settings keep their defaults.
//!
//! Relative paths resolve against the directory holding the config file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::DEFAULT_HYPEREDGE_OFFSET;
use crate::error::ErrorCode;
use crate::index::ExternalId;

/// File names probed, in order, when no config path is given.
pub const CONFIG_CANDIDATES: [&str; 2] = ["hypercent.toml", "dataset_init.txt"];

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised while locating, reading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("{}: dataset record starting at line {line} is missing its {missing} line", path.display())]
    IncompleteRecord {
        path: PathBuf,
        line: usize,
        missing: &'static str,
    },

    #[error("invalid setting {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl ConfigError {
    /// Machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound(_) => ErrorCode::ConfigNotFound,
            Self::Read { .. } | Self::Parse { .. } | Self::Invalid { .. } => {
                ErrorCode::ConfigParseError
            }
            Self::IncompleteRecord { .. } => ErrorCode::IncompleteDatasetRecord,
        }
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub pagerank: PageRankSection,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Worker threads; 0 lets rayon pick one per core.
    #[serde(default)]
    pub threads: usize,
    /// Sources accumulated sequentially per reduction chunk.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// First synthetic hyperedge id.
    #[serde(default = "default_hyperedge_offset")]
    pub hyperedge_offset: ExternalId,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            threads: 0,
            chunk_size: default_chunk_size(),
            hyperedge_offset: default_hyperedge_offset(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRankSection {
    #[serde(default = "default_damping")]
    pub damping: f64,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    #[serde(default = "default_max_iter")]
    pub max_iter: usize,
}

impl Default for PageRankSection {
    fn default() -> Self {
        Self {
            damping: default_damping(),
            tolerance: default_tolerance(),
            max_iter: default_max_iter(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

/// One dataset: both representations of the same relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    /// Display name.
    pub name: String,
    /// Edge-list file.
    pub graph: PathBuf,
    /// Hyperedge-membership file.
    pub hypergraph: PathBuf,
    /// Base name for result files.
    pub output_name: String,
}

const fn default_chunk_size() -> usize {
    64
}

const fn default_hyperedge_offset() -> ExternalId {
    DEFAULT_HYPEREDGE_OFFSET
}

const fn default_damping() -> f64 {
    0.85
}

const fn default_tolerance() -> f64 {
    1e-5
}

const fn default_max_iter() -> usize {
    10_000
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("Output")
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl Config {
    /// Check value ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.chunk_size == 0 {
            return Err(ConfigError::Invalid {
                key: "engine.chunk_size",
                reason: "must be at least 1".to_string(),
            });
        }
        check_hyperedge_offset("engine.hyperedge_offset", self.engine.hyperedge_offset)?;
        let d = self.pagerank.damping;
        if !(d > 0.0 && d < 1.0) {
            return Err(ConfigError::Invalid {
                key: "pagerank.damping",
                reason: format!("must lie in (0, 1), got {d}"),
            });
        }
        if self.pagerank.tolerance.is_nan() || self.pagerank.tolerance < 0.0 {
            return Err(ConfigError::Invalid {
                key: "pagerank.tolerance",
                reason: format!("must be non-negative, got {}", self.pagerank.tolerance),
            });
        }
        Ok(())
    }

    /// Rewrite relative dataset and output paths against `base`.
    fn resolve_paths(&mut self, base: &Path) {
        self.output.dir = resolve(base, &self.output.dir);
        for ds in &mut self.datasets {
            ds.graph = resolve(base, &ds.graph);
            ds.hypergraph = resolve(base, &ds.hypergraph);
        }
    }
}

fn resolve(base: &Path, p: &Path) -> PathBuf {
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base.join(p)
    }
}

/// Reject a hyperedge offset that is not positive. `key` names where the
/// value came from (a config key or a CLI flag).
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] for `offset <= 0`.
pub fn check_hyperedge_offset(key: &'static str, offset: ExternalId) -> Result<(), ConfigError> {
    if offset <= 0 {
        return Err(ConfigError::Invalid {
            key,
            reason: format!("must be positive, got {offset}"),
        });
    }
    Ok(())
}

/// Load a config file, choosing the format by file name.
///
/// Files ending in `.toml` are TOML; anything else is read as the
/// four-line `dataset_init.txt` format.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file is missing, unreadable, malformed or
/// fails [`Config::validate`].
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));

    let mut config = if path.extension().is_some_and(|ext| ext == "toml") {
        toml::from_str::<Config>(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?
    } else {
        Config {
            datasets: parse_dataset_init(&content, path)?,
            ..Config::default()
        }
    };

    config.resolve_paths(base);
    config.validate()?;
    debug!(path = %path.display(), datasets = config.datasets.len(), "config loaded");
    Ok(config)
}

/// Parse the four-line-per-record `dataset_init.txt` format.
///
/// `origin` is only used in error messages.
///
/// # Errors
///
/// Returns [`ConfigError::IncompleteRecord`] when the input ends inside a
/// record.
pub fn parse_dataset_init(content: &str, origin: &Path) -> Result<Vec<Dataset>, ConfigError> {
    const FIELDS: [&str; 3] = ["graph path", "hypergraph path", "output name"];

    let mut datasets = Vec::new();
    let mut lines = content.lines().map(|l| l.trim_end_matches('\r')).enumerate();

    while let Some((start, name)) = lines.next() {
        if name.is_empty() {
            continue;
        }
        let mut fields = [""; 3];
        for (slot, missing) in fields.iter_mut().zip(FIELDS) {
            *slot = lines
                .next()
                .map(|(_, l)| l)
                .ok_or_else(|| ConfigError::IncompleteRecord {
                    path: origin.to_path_buf(),
                    line: start + 1,
                    missing,
                })?;
        }
        datasets.push(Dataset {
            name: name.to_string(),
            graph: PathBuf::from(fields[0].trim()),
            hypergraph: PathBuf::from(fields[1].trim()),
            output_name: fields[2].trim().to_string(),
        });
    }

    Ok(datasets)
}

/// Find the config file to use when none is given explicitly.
///
/// Probes [`CONFIG_CANDIDATES`] in `cwd`, then
/// `<config_dir>/hypercent/config.toml`.
#[must_use]
pub fn discover_config(cwd: &Path) -> Option<PathBuf> {
    CONFIG_CANDIDATES
        .iter()
        .map(|name| cwd.join(name))
        .find(|p| p.is_file())
        .or_else(|| {
            dirs::config_dir()
                .map(|dir| dir.join("hypercent/config.toml"))
                .filter(|p| p.is_file())
        })
}

/// Resolve the effective configuration.
///
/// An explicit path must exist. Without one, [`discover_config`] is
/// consulted and the defaults (no datasets) are used if nothing is found.
///
/// # Errors
///
/// Propagates [`load_config`] errors.
pub fn resolve_config(explicit: Option<&Path>, cwd: &Path) -> Result<Config, ConfigError> {
    match explicit {
        Some(path) => load_config(path),
        None => match discover_config(cwd) {
            Some(path) => load_config(&path),
            None => {
                debug!("no config file found; using defaults");
                Ok(Config::default())
            }
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
