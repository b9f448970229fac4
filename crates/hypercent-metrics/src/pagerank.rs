//! PageRank by power iteration over the undirected adjacency.
//!
//! # Algorithm
//!
//! Each undirected edge is treated as two arcs. Parallel arcs collapse: a
//! node's arc set is its deduplicated neighbor list, and its out-degree is
//! the size of that set. With `n` nodes and damping `d`:
//!
//! ```text
//! PR(v) = d * (Σ PR(u) / out(u) + dangling / n) + (1 - d) / n   for u ∈ N(v)
//! ```
//!
//! where `dangling` is the total rank held by nodes without arcs. Ranks
//! start uniform at `1 / n`. Iteration stops once the L1 change of a step is
//! at most `tolerance`, or after `max_iter` steps.
//!
//! Hyperedge nodes take part in the iteration like any other node. Callers
//! report real nodes only.
//!
//! # Output
//!
//! Returns a [`PageRankResult`] with one score per [`NodeIndex`] and the
//! iteration count.

use hypercent_core::config::PageRankSection;
use hypercent_core::{Graph, NodeIndex};
use rayon::prelude::*;
use tracing::{instrument, warn};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for PageRank computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageRankConfig {
    /// Damping factor (probability of following an arc vs teleporting).
    /// Default: 0.85.
    pub damping: f64,
    /// Stop when the L1 norm of the rank delta is at most this.
    /// Default: 1e-5.
    pub tolerance: f64,
    /// Maximum number of iterations.
    /// Default: 10 000.
    pub max_iter: usize,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            damping: 0.85,
            tolerance: 1e-5,
            max_iter: 10_000,
        }
    }
}

impl From<&PageRankSection> for PageRankConfig {
    fn from(section: &PageRankSection) -> Self {
        Self {
            damping: section.damping,
            tolerance: section.tolerance,
            max_iter: section.max_iter,
        }
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Result of a PageRank computation.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRankResult {
    /// PageRank score per node index.
    pub scores: Vec<f64>,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Whether the L1 change dropped to `tolerance` within `max_iter`.
    pub converged: bool,
}

// ---------------------------------------------------------------------------
// Power iteration
// ---------------------------------------------------------------------------

/// Compute PageRank for every node of `graph`.
///
/// Runs on the current rayon pool. Each step updates nodes independently,
/// so the result does not depend on the worker count.
#[must_use]
#[allow(clippy::cast_precision_loss)]
#[instrument(skip(graph, config), fields(nodes = graph.node_count()))]
pub fn pagerank(graph: &Graph, config: &PageRankConfig) -> PageRankResult {
    let n = graph.node_count();
    if n == 0 {
        return PageRankResult {
            scores: Vec::new(),
            iterations: 0,
            converged: true,
        };
    }

    let arcs = unique_arcs(graph);
    let out_degree: Vec<f64> = arcs.iter().map(|a| a.len() as f64).collect();

    let n_f64 = n as f64;
    let teleport = (1.0 - config.damping) / n_f64;

    let mut ranks = vec![1.0 / n_f64; n];
    let mut next = vec![0.0_f64; n];
    let mut iterations = 0;
    let mut delta = f64::INFINITY;

    while delta > config.tolerance && iterations < config.max_iter {
        let dangling: f64 = ranks
            .iter()
            .zip(&arcs)
            .filter(|(_, a)| a.is_empty())
            .map(|(r, _)| r)
            .sum();
        let dangling_share = dangling / n_f64;

        next.par_iter_mut().enumerate().for_each(|(v, slot)| {
            let inflow: f64 = arcs[v].iter().map(|&u| ranks[u] / out_degree[u]).sum();
            *slot = config
                .damping
                .mul_add(inflow + dangling_share, teleport);
        });

        delta = ranks
            .iter()
            .zip(&next)
            .map(|(old, new)| (old - new).abs())
            .sum();
        std::mem::swap(&mut ranks, &mut next);
        iterations += 1;
    }

    let converged = delta <= config.tolerance;
    if !converged {
        warn!(
            iterations,
            delta, "PageRank stopped at max_iter before converging"
        );
    }

    PageRankResult {
        scores: ranks,
        iterations,
        converged,
    }
}

/// Sorted, deduplicated neighbor set of every node.
fn unique_arcs(graph: &Graph) -> Vec<Vec<NodeIndex>> {
    (0..graph.node_count())
        .map(|v| {
            let mut arcs = graph.neighbors(v).to_vec();
            arcs.sort_unstable();
            arcs.dedup();
            arcs
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
