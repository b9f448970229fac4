//! Betweenness centrality via Brandes' algorithm.
//!
//! # Overview
//!
//! Betweenness measures how often a node lies on shortest paths between
//! other pairs of real nodes. High-betweenness nodes are the bridges between
//! otherwise loosely connected regions.
//!
//! # Algorithm
//!
//! Brandes (2001) for unweighted graphs, generalized to the bipartite
//! expansion of a hypergraph:
//!
//! 1. For each real source `s`, build the shortest-path DAG with
//!    [`ShortestPathDag`].
//! 2. Walk the finishing order back to front. For each node `w` and each
//!    predecessor `v`:
//!
//!    ```text
//!    delta[v] += sigma[v] / sigma[w] * (real(w) + delta[w])
//!    ```
//!
//!    `real(w)` is 1 for real nodes and 0 for hyperedge nodes, so a path
//!    only counts when it ends at a real node.
//! 3. For `w != s`, add `delta[w] / 2` to the score. Every unordered pair is
//!    seen from both of its endpoints.
//!
//! In a plain graph every node is real and step 2 reduces to the textbook
//! recurrence.
//!
//! Complexity: O(S * (V + E)) where S is the number of real nodes.
//!
//! # Output
//!
//! One score per [`NodeIndex`]. Scores are not normalized. Hyperedge nodes
//! carry the dependency of the paths crossing them but are never reported.

use hypercent_core::{Graph, NodeIndex};
use tracing::instrument;

use crate::exec::{ExecutionConfig, chunked_sum};
use crate::traversal::ShortestPathDag;

struct Workspace {
    dag: ShortestPathDag,
    delta: Vec<f64>,
}

impl Workspace {
    fn new(n: usize) -> Self {
        Self {
            dag: ShortestPathDag::new(n),
            delta: vec![0.0; n],
        }
    }
}

/// Compute betweenness for every node of `graph`.
///
/// Runs on the current rayon pool; wrap the call in
/// [`ExecutionConfig::install`] to honor `exec.threads`. The result is
/// bit-identical for a given `exec.chunk_size` whatever the worker count.
#[must_use]
#[instrument(skip(graph, exec), fields(representation = %graph.representation(), nodes = graph.node_count()))]
pub fn betweenness_centrality(graph: &Graph, exec: &ExecutionConfig) -> Vec<f64> {
    let n = graph.node_count();
    if n == 0 {
        return Vec::new();
    }

    let sources: Vec<NodeIndex> = graph.real_nodes().collect();
    chunked_sum(
        "betweenness",
        &sources,
        n,
        exec,
        || Workspace::new(n),
        |ws, s, out| accumulate_source(graph, ws, s, out),
    )
}

/// Dependency pass for one source. See the module docs.
fn accumulate_source(graph: &Graph, ws: &mut Workspace, s: NodeIndex, out: &mut [f64]) {
    let Workspace { dag, delta } = ws;
    dag.run(graph, s);

    let order = dag.finishing_order();
    for &w in order {
        delta[w] = 0.0;
    }

    for &w in order.iter().rev() {
        let weight = if graph.is_real(w) { 1.0 } else { 0.0 };
        let sigma_w = dag.sigma(w);
        let carried = weight + delta[w];
        for &v in dag.predecessors(w) {
            delta[v] += dag.sigma(v) / sigma_w * carried;
        }
        if w != s {
            out[w] += delta[w] / 2.0;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
