//! `hcent run`: analyze every configured dataset and write result files.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, ValueEnum};
use hypercent_core::config::{Config, check_hyperedge_offset, resolve_config};
use hypercent_core::error::ErrorCode;
use hypercent_core::{ExternalId, Representation};
use hypercent_metrics::{AnalysisConfig, Measure, analyze_file};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::output::{CliError, OutputMode, Render, emit, field, rule, section};
use crate::writer;

/// Which representations of each dataset to analyze.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RepresentationArg {
    Graph,
    Hypergraph,
    Both,
}

impl RepresentationArg {
    const fn includes(self, representation: Representation) -> bool {
        matches!(
            (self, representation),
            (Self::Both, _)
                | (Self::Graph, Representation::Graph)
                | (Self::Hypergraph, Representation::Hypergraph)
        )
    }
}

/// Arguments for `hcent run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Config file (hypercent.toml or dataset_init.txt). Discovered in the
    /// working directory when omitted.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Plain edge-list file for a one-off dataset (ignores configured datasets).
    #[arg(long, value_name = "PATH")]
    pub graph: Option<PathBuf>,

    /// Hypergraph file for a one-off dataset (ignores configured datasets).
    #[arg(long, value_name = "PATH")]
    pub hypergraph: Option<PathBuf>,

    /// Output base name for the one-off dataset. Defaults to the input file stem.
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// Measure to compute; repeat for several. Defaults to all.
    #[arg(long = "measure", value_name = "MEASURE")]
    pub measures: Vec<Measure>,

    /// Representations to analyze.
    #[arg(long, value_enum, default_value_t = RepresentationArg::Both)]
    pub representation: RepresentationArg,

    /// Output directory (overrides `[output].dir`).
    #[arg(long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Worker threads, 0 for one per core (overrides `[engine].threads`).
    #[arg(long)]
    pub threads: Option<usize>,

    /// Sources per reduction chunk (overrides `[engine].chunk_size`).
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// First synthetic hyperedge id (overrides `[engine].hyperedge_offset`).
    #[arg(long)]
    pub offset: Option<ExternalId>,

    /// Compute and report without writing result files.
    #[arg(long)]
    pub no_write: bool,
}

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

/// Report payload for `hcent run`.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub datasets: Vec<DatasetSummary>,
    pub failed: usize,
}

#[derive(Debug, Serialize)]
pub struct DatasetSummary {
    pub name: String,
    pub output_name: String,
    pub passes: Vec<PassSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CliError>,
}

#[derive(Debug, Serialize)]
pub struct PassSummary {
    pub representation: Representation,
    pub input: PathBuf,
    pub nodes: usize,
    pub real_nodes: usize,
    pub edges: usize,
    pub components: usize,
    pub elapsed_secs: f64,
    pub approx_memory_bytes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagerank_iterations: Option<usize>,
    pub top: Vec<TopSummary>,
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct TopSummary {
    pub measure: Measure,
    pub max: Option<f64>,
    pub ids: Vec<ExternalId>,
}

/// One dataset with the inputs selected for this run.
#[derive(Debug)]
struct Job {
    name: String,
    output_name: String,
    inputs: Vec<(Representation, PathBuf)>,
}

// ---------------------------------------------------------------------------
// Execution
// ---------------------------------------------------------------------------

/// Execute `hcent run`.
pub fn run_run(args: &RunArgs, output: OutputMode, cwd: &Path) -> anyhow::Result<()> {
    let config = resolve_config(args.config.as_deref(), cwd).context("failed to load config")?;
    let analysis = analysis_config(args, &config);
    if let Some(offset) = args.offset {
        check_hyperedge_offset("--offset", offset)?;
    }
    let offset = args.offset.unwrap_or(config.engine.hyperedge_offset);
    let out_dir = cwd.join(args.out.clone().unwrap_or_else(|| config.output.dir.clone()));

    let jobs = plan_jobs(args, &config)?;
    if jobs.is_empty() {
        CliError::plain("no datasets to analyze")
            .with_hint("add [[datasets]] to hypercent.toml, or pass --graph/--hypergraph")
            .report(output)?;
        anyhow::bail!("no datasets configured");
    }

    info!(
        datasets = jobs.len(),
        out = %out_dir.display(),
        threads = analysis.exec.threads,
        "starting run"
    );

    let mut datasets = Vec::with_capacity(jobs.len());
    for job in jobs {
        datasets.push(run_job(&job, &analysis, offset, &out_dir, args.no_write, output));
    }

    let failed = datasets.iter().filter(|d| d.error.is_some()).count();
    let total = datasets.len();
    let summary = RunSummary { datasets, failed };
    emit(output, &summary)?;

    if failed > 0 {
        anyhow::bail!("{failed} of {total} datasets failed");
    }
    Ok(())
}

fn analysis_config(args: &RunArgs, config: &Config) -> AnalysisConfig {
    let mut analysis = AnalysisConfig::from_config(config);
    if let Some(threads) = args.threads {
        analysis.exec.threads = threads;
    }
    if let Some(chunk_size) = args.chunk_size {
        analysis.exec.chunk_size = chunk_size;
    }
    if !args.measures.is_empty() {
        analysis.measures.clone_from(&args.measures);
    }
    analysis
}

/// The one-off dataset from `--graph`/`--hypergraph`, or every configured one.
fn plan_jobs(args: &RunArgs, config: &Config) -> anyhow::Result<Vec<Job>> {
    let select = |inputs: Vec<(Representation, PathBuf)>| -> Vec<(Representation, PathBuf)> {
        inputs
            .into_iter()
            .filter(|(r, _)| args.representation.includes(*r))
            .collect()
    };

    if args.graph.is_some() || args.hypergraph.is_some() {
        let mut inputs = Vec::new();
        if let Some(p) = &args.graph {
            inputs.push((Representation::Graph, p.clone()));
        }
        if let Some(p) = &args.hypergraph {
            inputs.push((Representation::Hypergraph, p.clone()));
        }
        let inputs = select(inputs);
        if inputs.is_empty() {
            anyhow::bail!(
                "--representation {:?} selects no input among the given files",
                args.representation
            );
        }

        let output_name = args.name.clone().unwrap_or_else(|| {
            inputs[0]
                .1
                .file_stem()
                .map_or_else(|| "dataset".to_string(), |s| s.to_string_lossy().into_owned())
        });
        return Ok(vec![Job {
            name: output_name.clone(),
            output_name,
            inputs,
        }]);
    }

    if args.name.is_some() {
        warn!("--name only applies with --graph or --hypergraph; ignoring");
    }

    Ok(config
        .datasets
        .iter()
        .map(|d| Job {
            name: d.name.clone(),
            output_name: d.output_name.clone(),
            inputs: select(vec![
                (Representation::Graph, d.graph.clone()),
                (Representation::Hypergraph, d.hypergraph.clone()),
            ]),
        })
        .collect())
}

/// Run every selected representation of one dataset. The first failure
/// stops the dataset; later datasets still run.
fn run_job(
    job: &Job,
    analysis: &AnalysisConfig,
    offset: ExternalId,
    out_dir: &Path,
    no_write: bool,
    output: OutputMode,
) -> DatasetSummary {
    let mut summary = DatasetSummary {
        name: job.name.clone(),
        output_name: job.output_name.clone(),
        passes: Vec::new(),
        error: None,
    };

    for (representation, path) in &job.inputs {
        info!(dataset = %job.name, %representation, path = %path.display(), "analyzing");

        let (graph, report) = match analyze_file(path, *representation, offset, analysis) {
            Ok(done) => done,
            Err(e) => {
                error!(dataset = %job.name, %representation, error = %e, "analysis failed");
                let err = CliError::coded(
                    format!("{} ({representation}): {e}", job.name),
                    e.code(),
                );
                report_inline(&err, output);
                summary.error = Some(err);
                break;
            }
        };

        let files = if no_write {
            Vec::new()
        } else {
            match writer::write_report(out_dir, &job.output_name, &graph, &report) {
                Ok(files) => files,
                Err(e) => {
                    error!(dataset = %job.name, error = %format!("{e:#}"), "writing results failed");
                    let err = CliError::coded(
                        format!("{}: {e:#}", job.name),
                        ErrorCode::OutputWriteFailed,
                    );
                    report_inline(&err, output);
                    summary.error = Some(err);
                    break;
                }
            }
        };

        let top = report
            .scores
            .iter()
            .map(|s| {
                let t = s.top_nodes(&graph);
                TopSummary {
                    measure: s.measure,
                    max: t.max,
                    ids: t.ids,
                }
            })
            .collect();

        summary.passes.push(PassSummary {
            representation: *representation,
            input: path.clone(),
            nodes: report.stats.node_count,
            real_nodes: report.stats.real_node_count,
            edges: report.stats.edge_count,
            components: report.stats.component_count,
            elapsed_secs: report.elapsed.as_secs_f64(),
            approx_memory_bytes: report.approx_memory_bytes,
            pagerank_iterations: report.pagerank_iterations,
            top,
            files,
        });
    }

    summary
}

/// Print a dataset failure as it happens. JSON mode carries it in the
/// summary instead.
fn report_inline(err: &CliError, output: OutputMode) {
    if output.is_json() {
        return;
    }
    if let Err(e) = err.report(output) {
        warn!(error = %e, "could not print error to stderr");
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Show at most this many tied ids per measure in human output.
const TOP_IDS_SHOWN: usize = 8;

fn format_ids(ids: &[ExternalId]) -> String {
    let mut s = ids
        .iter()
        .take(TOP_IDS_SHOWN)
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",");
    if ids.len() > TOP_IDS_SHOWN {
        s.push_str(&format!(",+{}", ids.len() - TOP_IDS_SHOWN));
    }
    s
}

impl Render for RunSummary {
    fn text(&self, w: &mut dyn Write) -> io::Result<()> {
        render_text(self, w)
    }

    fn pretty(&self, w: &mut dyn Write) -> io::Result<()> {
        render_pretty(self, w)
    }
}

fn render_text(summary: &RunSummary, w: &mut dyn Write) -> io::Result<()> {
    for d in &summary.datasets {
        for p in &d.passes {
            writeln!(
                w,
                "{} {} nodes={} real={} secs={:.3} mem={}",
                d.output_name,
                p.representation,
                p.nodes,
                p.real_nodes,
                p.elapsed_secs,
                p.approx_memory_bytes
            )?;
            for t in &p.top {
                let max = t.max.map_or_else(|| "-".to_string(), |m| format!("{m:.9}"));
                writeln!(w, "  top {} {} {}", t.measure, max, format_ids(&t.ids))?;
            }
        }
        if let Some(e) = &d.error {
            writeln!(w, "{} FAILED {}", d.output_name, e.message)?;
        }
    }
    Ok(())
}

fn render_pretty(summary: &RunSummary, w: &mut dyn Write) -> io::Result<()> {
    for d in &summary.datasets {
        section(w, &format!("Dataset: {}", d.name))?;
        for p in &d.passes {
            field(w, "representation", p.representation.to_string())?;
            field(w, "input", p.input.display().to_string())?;
            field(
                w,
                "nodes",
                format!("{} ({} real)", p.nodes, p.real_nodes),
            )?;
            field(w, "edges", p.edges.to_string())?;
            field(w, "components", p.components.to_string())?;
            field(w, "elapsed", format!("{:.3}s", p.elapsed_secs))?;
            field(w, "memory", format!("{} bytes", p.approx_memory_bytes))?;
            if let Some(iters) = p.pagerank_iterations {
                field(w, "pagerank", format!("{iters} iterations"))?;
            }
            for t in &p.top {
                let value = match t.max {
                    Some(m) => format!("{m:.6}  [{}]", format_ids(&t.ids)),
                    None => "no nodes".to_string(),
                };
                field(w, &format!("top {}", t.measure), value)?;
            }
            if !p.files.is_empty() {
                field(w, "files", format!("{} written", p.files.len()))?;
            }
            writeln!(w)?;
        }
        if let Some(e) = &d.error {
            field(w, "FAILED", &e.message)?;
            writeln!(w)?;
        }
    }
    rule(w)?;
    writeln!(
        w,
        "{} dataset(s), {} failed",
        summary.datasets.len(),
        summary.failed
    )
}
