//! One analysis pass: every requested measure over one representation of
//! a dataset.
//!
//! ```text
//! load ─▶ Graph ─▶ GraphStats
//!                ├─▶ betweenness            (if requested)
//!                ├─▶ farness/closeness/harmonic (one BFS sweep for all three)
//!                ├─▶ degree
//!                └─▶ pagerank
//! ```
//!
//! Parallel stages share one worker pool per pass. Each stage is wrapped in
//! [`hypercent_core::timing::timed`] on the calling thread.

use std::path::Path;
use std::time::{Duration, Instant};

use hypercent_core::config::Config;
use hypercent_core::error::ErrorCode;
use hypercent_core::graph::{self, BuildError, GraphStats};
use hypercent_core::timing::timed;
use hypercent_core::{ExternalId, Graph, Representation};
use rayon::ThreadPoolBuildError;
use serde::Serialize;
use tracing::{info, instrument};

use crate::betweenness::betweenness_centrality;
use crate::degree::degree_centrality;
use crate::distance::distance_centrality;
use crate::exec::ExecutionConfig;
use crate::pagerank::{PageRankConfig, pagerank};
use crate::scores::{Measure, ScoreVector};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// What to compute and how.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub exec: ExecutionConfig,
    pub pagerank: PageRankConfig,
    /// Measures to compute, reported in [`Measure::ALL`] order regardless of
    /// the order given here.
    pub measures: Vec<Measure>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            exec: ExecutionConfig::default(),
            pagerank: PageRankConfig::default(),
            measures: Measure::ALL.to_vec(),
        }
    }
}

impl AnalysisConfig {
    /// Settings from a loaded configuration file, all measures enabled.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            exec: ExecutionConfig::from(&config.engine),
            pagerank: PageRankConfig::from(&config.pagerank),
            measures: Measure::ALL.to_vec(),
        }
    }

    #[must_use]
    pub fn with_measures(mut self, measures: Vec<Measure>) -> Self {
        self.measures = measures;
        self
    }

    fn wants(&self, measure: Measure) -> bool {
        self.measures.contains(&measure)
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that abort a representation pass.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("failed to start worker pool: {0}")]
    ThreadPool(#[from] ThreadPoolBuildError),
}

impl AnalysisError {
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Build(e) => e.code(),
            Self::ThreadPool(_) => ErrorCode::InternalUnexpected,
        }
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Everything one pass produced.
#[derive(Debug, Clone, Serialize)]
pub struct RepresentationReport {
    pub representation: Representation,
    pub stats: GraphStats,
    /// One vector per computed measure, in [`Measure::ALL`] order.
    pub scores: Vec<ScoreVector>,
    /// Wall time of the pass, including loading when run from a file.
    #[serde(serialize_with = "serialize_secs")]
    pub elapsed: Duration,
    /// Heap bytes of the graph plus the score vectors.
    pub approx_memory_bytes: usize,
    pub pagerank_iterations: Option<usize>,
    pub pagerank_converged: Option<bool>,
}

impl RepresentationReport {
    #[must_use]
    pub fn scores_for(&self, measure: Measure) -> Option<&ScoreVector> {
        self.scores.iter().find(|s| s.measure == measure)
    }
}

fn serialize_secs<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Run every requested measure over an already built graph.
///
/// # Errors
///
/// Returns [`AnalysisError::ThreadPool`] if a dedicated pool cannot be
/// started.
#[instrument(skip(graph, config), fields(representation = %graph.representation()))]
pub fn analyze(graph: &Graph, config: &AnalysisConfig) -> Result<RepresentationReport, AnalysisError> {
    let started = Instant::now();
    let workers = config.exec.workers()?;
    let exec = &config.exec;

    let stats = timed("graph.stats", || GraphStats::from_graph(graph));
    let mut scores = Vec::new();
    let mut pagerank_iterations = None;
    let mut pagerank_converged = None;

    if config.wants(Measure::Betweenness) {
        let values = timed("metric.betweenness", || {
            workers.install(|| betweenness_centrality(graph, exec))
        });
        scores.push(ScoreVector::new(Measure::Betweenness, values));
    }

    if [Measure::Farness, Measure::Closeness, Measure::Harmonic]
        .into_iter()
        .any(|m| config.wants(m))
    {
        let dc = timed("metric.distance", || {
            workers.install(|| distance_centrality(graph, exec))
        });
        for (measure, values) in [
            (Measure::Farness, dc.farness),
            (Measure::Closeness, dc.closeness),
            (Measure::Harmonic, dc.harmonic),
        ] {
            if config.wants(measure) {
                scores.push(ScoreVector::new(measure, values));
            }
        }
    }

    if config.wants(Measure::Degree) {
        let values = timed("metric.degree", || degree_centrality(graph));
        scores.push(ScoreVector::new(Measure::Degree, values));
    }

    if config.wants(Measure::PageRank) {
        let result = timed("metric.pagerank", || {
            workers.install(|| pagerank(graph, &config.pagerank))
        });
        pagerank_iterations = Some(result.iterations);
        pagerank_converged = Some(result.converged);
        scores.push(ScoreVector::new(Measure::PageRank, result.scores));
    }

    let approx_memory_bytes = graph.heap_bytes()
        + scores
            .iter()
            .map(|s| s.values.capacity() * std::mem::size_of::<f64>())
            .sum::<usize>();

    let report = RepresentationReport {
        representation: graph.representation(),
        stats,
        scores,
        elapsed: started.elapsed(),
        approx_memory_bytes,
        pagerank_iterations,
        pagerank_converged,
    };

    info!(
        nodes = graph.node_count(),
        real_nodes = graph.real_node_count(),
        workers = workers.thread_count(),
        elapsed = ?report.elapsed,
        memory_bytes = report.approx_memory_bytes,
        "analysis pass complete"
    );
    Ok(report)
}

/// Load `path` in the given representation and analyze it.
///
/// The returned report's `elapsed` covers loading as well. The graph is
/// returned alongside so callers can map indices back to external ids.
///
/// # Errors
///
/// Returns [`AnalysisError::Build`] if the file cannot be read or parsed,
/// or [`AnalysisError::ThreadPool`] if a dedicated pool cannot be started.
pub fn analyze_file(
    path: &Path,
    representation: Representation,
    offset: ExternalId,
    config: &AnalysisConfig,
) -> Result<(Graph, RepresentationReport), AnalysisError> {
    let started = Instant::now();
    let stage = match representation {
        Representation::Graph => "load.graph",
        Representation::Hypergraph => "load.hypergraph",
    };
    let graph = timed(stage, || graph::load(path, representation, offset))?;
    let mut report = analyze(&graph, config)?;
    report.elapsed = started.elapsed();
    Ok((graph, report))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use hypercent_core::graph::GraphBuilder;

    fn hyper() -> Graph {
        let mut b = GraphBuilder::hypergraph(1_000);
        b.hyperedge(&[1, 2, 3]).expect("hyperedge id");
        b.hyperedge(&[3, 4]).expect("hyperedge id");
        b.finish()
    }

    #[test]
    fn default_config_computes_every_measure_in_order() {
        let g = hyper();
        let report = analyze(&g, &AnalysisConfig::default()).expect("analyze");
        let measures: Vec<_> = report.scores.iter().map(|s| s.measure).collect();
        assert_eq!(measures, Measure::ALL.to_vec());
        assert_eq!(report.representation, Representation::Hypergraph);
        assert_eq!(report.pagerank_converged, Some(true));
        assert!(report.approx_memory_bytes >= g.heap_bytes());
    }

    #[test]
    fn measure_selection_is_honored() {
        let g = hyper();
        let cfg = AnalysisConfig::default().with_measures(vec![Measure::Harmonic, Measure::Degree]);
        let report = analyze(&g, &cfg).expect("analyze");
        let measures: Vec<_> = report.scores.iter().map(|s| s.measure).collect();
        assert_eq!(measures, vec![Measure::Harmonic, Measure::Degree]);
        assert!(report.scores_for(Measure::Betweenness).is_none());
        assert_eq!(report.pagerank_iterations, None);
    }

    #[test]
    fn bridge_member_tops_betweenness() {
        let g = hyper();
        let report = analyze(&g, &AnalysisConfig::default()).expect("analyze");
        let bc = report.scores_for(Measure::Betweenness).expect("computed");
        assert_eq!(bc.top_nodes(&g).ids, vec![3]);
    }

    #[test]
    fn missing_file_is_a_build_error() {
        let err = analyze_file(
            Path::new("/nonexistent/hypercent/input.graph"),
            Representation::Graph,
            1_000,
            &AnalysisConfig::default(),
        )
        .expect_err("must fail");
        assert!(matches!(err, AnalysisError::Build(_)));
        assert_eq!(err.code(), ErrorCode::InputNotFound);
    }

    #[test]
    fn engine_section_flows_into_execution() {
        let mut config = Config::default();
        config.engine.threads = 2;
        config.pagerank.max_iter = 5;
        let cfg = AnalysisConfig::from_config(&config);
        assert_eq!(cfg.exec.threads, 2);
        assert_eq!(cfg.pagerank.max_iter, 5);
    }
}
