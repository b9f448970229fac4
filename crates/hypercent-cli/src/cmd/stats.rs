//! `hcent stats`: structural summary of one input file.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Args;
use hypercent_core::config::{check_hyperedge_offset, resolve_config};
use hypercent_core::graph::{GraphStats, load};
use hypercent_core::timing::timed;
use hypercent_core::{ExternalId, Representation};
use serde::Serialize;

use crate::output::{CliError, OutputMode, Render, emit, field, section};

/// Input format for `hcent stats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum InputFormat {
    Graph,
    Hypergraph,
}

impl From<InputFormat> for Representation {
    fn from(f: InputFormat) -> Self {
        match f {
            InputFormat::Graph => Self::Graph,
            InputFormat::Hypergraph => Self::Hypergraph,
        }
    }
}

/// Arguments for `hcent stats`.
#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Edge-list or hypergraph file.
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// How to read PATH.
    #[arg(long, value_enum)]
    pub representation: InputFormat,

    /// First synthetic hyperedge id (defaults to the config value).
    #[arg(long)]
    pub offset: Option<ExternalId>,
}

/// Report payload for `hcent stats`.
#[derive(Debug, Serialize)]
pub struct StatsReport {
    pub path: PathBuf,
    #[serde(flatten)]
    pub stats: GraphStats,
    pub heap_bytes: usize,
}

/// Execute `hcent stats`.
pub fn run_stats(args: &StatsArgs, output: OutputMode, cwd: &Path) -> anyhow::Result<()> {
    let offset = match args.offset {
        Some(offset) => {
            check_hyperedge_offset("--offset", offset)?;
            offset
        }
        None => {
            resolve_config(None, cwd)
                .context("failed to load config")?
                .engine
                .hyperedge_offset
        }
    };
    let representation = Representation::from(args.representation);

    let graph = match timed("load", || load(&args.path, representation, offset)) {
        Ok(g) => g,
        Err(e) => {
            CliError::coded(e.to_string(), e.code()).report(output)?;
            return Err(e).with_context(|| format!("failed to load {}", args.path.display()));
        }
    };

    let report = StatsReport {
        path: args.path.clone(),
        stats: timed("graph.stats", || GraphStats::from_graph(&graph)),
        heap_bytes: graph.heap_bytes(),
    };

    emit(output, &report)
}

impl Render for StatsReport {
    fn text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        render_stats_text(self, w)
    }

    fn pretty(&self, w: &mut dyn Write) -> std::io::Result<()> {
        render_stats_pretty(self, w)
    }
}

fn render_stats_text(r: &StatsReport, w: &mut dyn Write) -> std::io::Result<()> {
    let s = &r.stats;
    writeln!(
        w,
        "{} {} nodes={} real={} synthetic={} edges={} hyperedges={} components={} isolated={} max_degree={} density={:.6}",
        r.path.display(),
        s.representation,
        s.node_count,
        s.real_node_count,
        s.synthetic_node_count,
        s.edge_count,
        s.hyperedge_count,
        s.component_count,
        s.isolated_node_count,
        s.max_degree,
        s.density
    )
}

fn render_stats_pretty(r: &StatsReport, w: &mut dyn Write) -> std::io::Result<()> {
    let s = &r.stats;
    section(w, &format!("Graph: {}", r.path.display()))?;
    field(w, "representation", s.representation.to_string())?;
    field(w, "nodes", s.node_count.to_string())?;
    field(w, "real", s.real_node_count.to_string())?;
    if s.representation == Representation::Hypergraph {
        field(w, "synthetic", s.synthetic_node_count.to_string())?;
        field(w, "hyperedges", s.hyperedge_count.to_string())?;
    }
    field(w, "edges", s.edge_count.to_string())?;
    field(w, "components", s.component_count.to_string())?;
    field(w, "isolated", s.isolated_node_count.to_string())?;
    field(w, "max degree", s.max_degree.to_string())?;
    field(w, "density", format!("{:.6}", s.density))?;
    field(w, "heap", format!("{} bytes", r.heap_bytes))
}
