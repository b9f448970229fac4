//! Farness, closeness and harmonic centrality from level-only BFS.
//!
//! For every real source `k` and every real node `l != k` reached from it,
//! with `d` the distance in the source domain:
//!
//! ```text
//! farness[k]   = Σ d(k, l) / reachable(k)          (0 if nothing reachable)
//! closeness[k] = 1 / farness[k]                    (0 if farness is 0)
//! harmonic[k]  = Σ 1 / d(k, l) / (real_nodes - 1)  (0 if one real node)
//! ```
//!
//! Farness and closeness average over the reachable component only, while
//! harmonic divides by the whole real population.
//!
//! In the bipartite expansion every real-to-real step crosses a hyperedge
//! node, so `d = level / 2` (see `Representation::level_scale`).

use hypercent_core::{Graph, NodeIndex};
use serde::Serialize;
use tracing::instrument;

use crate::exec::{ExecutionConfig, map_sources};
use crate::traversal::BfsLevels;

/// The three distance-based measures, one entry per [`NodeIndex`].
///
/// Hyperedge nodes hold 0 in every vector.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DistanceCentrality {
    pub farness: Vec<f64>,
    pub closeness: Vec<f64>,
    pub harmonic: Vec<f64>,
}

#[derive(Debug, Clone, Copy, Default)]
struct SourceScores {
    farness: f64,
    closeness: f64,
    harmonic: f64,
}

/// Compute farness, closeness and harmonic centrality for every real node.
///
/// Runs on the current rayon pool; see [`ExecutionConfig::install`].
#[must_use]
#[instrument(skip(graph, exec), fields(representation = %graph.representation(), nodes = graph.node_count()))]
pub fn distance_centrality(graph: &Graph, exec: &ExecutionConfig) -> DistanceCentrality {
    let n = graph.node_count();
    let mut result = DistanceCentrality {
        farness: vec![0.0; n],
        closeness: vec![0.0; n],
        harmonic: vec![0.0; n],
    };
    if n == 0 {
        return result;
    }

    let sources: Vec<NodeIndex> = graph.real_nodes().collect();
    let total_real = sources.len();
    let per_source = map_sources(
        "distance",
        &sources,
        exec,
        || BfsLevels::new(n),
        |bfs, s| score_source(graph, bfs, s, total_real),
    );

    for (&s, scores) in sources.iter().zip(per_source) {
        result.farness[s] = scores.farness;
        result.closeness[s] = scores.closeness;
        result.harmonic[s] = scores.harmonic;
    }
    result
}

#[allow(clippy::cast_precision_loss)]
fn score_source(graph: &Graph, bfs: &mut BfsLevels, s: NodeIndex, total_real: usize) -> SourceScores {
    bfs.run(graph, s);
    let scale = graph.representation().level_scale();

    let mut sum = 0.0;
    let mut inverse_sum = 0.0;
    let mut reachable = 0_usize;
    for &l in bfs.reached() {
        if l == s || !graph.is_real(l) {
            continue;
        }
        let d = f64::from(bfs.levels()[l]) / scale;
        sum += d;
        inverse_sum += 1.0 / d;
        reachable += 1;
    }

    let farness = if reachable > 0 { sum / reachable as f64 } else { 0.0 };
    let closeness = if farness > 0.0 { 1.0 / farness } else { 0.0 };
    let harmonic = if total_real > 1 {
        inverse_sum / (total_real - 1) as f64
    } else {
        0.0
    };
    SourceScores {
        farness,
        closeness,
        harmonic,
    }
}
