//! Basic structural statistics for a loaded graph.
//!
//! # Statistics Provided
//!
//! - **node_count**: all nodes, synthetic hyperedge nodes included.
//! - **real_node_count** / **synthetic_node_count**: split by the real mask.
//! - **edge_count**: stored undirected edges (parallel edges counted). In a
//!   hypergraph this is the number of memberships.
//! - **hyperedge_count**: hyperedges read (zero for a plain graph).
//! - **component_count**: connected components over all nodes. A value
//!   greater than 1 means some real pairs are mutually unreachable, which
//!   is exactly when farness and harmonic normalization diverge.
//! - **isolated_node_count**: nodes with an empty adjacency list.
//! - **max_degree**: longest adjacency list.
//! - **density**: for a plain graph `2m / (n (n - 1))`; for a hypergraph the
//!   fraction of possible (member, hyperedge) incidences present,
//!   `m / (real * hyperedges)`. Zero when the denominator is zero.

use petgraph::{algo::connected_components, graph::UnGraph};
use serde::Serialize;

use super::{Graph, Representation};
use crate::index::ExternalId;

/// Summary statistics for a [`Graph`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStats {
    pub representation: Representation,
    pub node_count: usize,
    pub real_node_count: usize,
    pub synthetic_node_count: usize,
    pub edge_count: usize,
    pub hyperedge_count: usize,
    pub component_count: usize,
    pub isolated_node_count: usize,
    pub max_degree: usize,
    pub density: f64,
}

impl GraphStats {
    /// Compute statistics for `graph`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_graph(graph: &Graph) -> Self {
        let node_count = graph.node_count();
        let real_node_count = graph.real_node_count();
        let edge_count = graph.edge_count();

        let component_count = if node_count == 0 {
            0
        } else {
            connected_components(&to_petgraph(graph))
        };

        let isolated_node_count = (0..node_count).filter(|&v| graph.degree(v) == 0).count();
        let max_degree = (0..node_count).map(|v| graph.degree(v)).max().unwrap_or(0);

        let possible = match graph.representation() {
            Representation::Graph => {
                let n = node_count as f64;
                n * (n - 1.0) / 2.0
            }
            Representation::Hypergraph => real_node_count as f64 * graph.hyperedge_count() as f64,
        };
        let density = if possible > 0.0 {
            edge_count as f64 / possible
        } else {
            0.0
        };

        Self {
            representation: graph.representation(),
            node_count,
            real_node_count,
            synthetic_node_count: node_count - real_node_count,
            edge_count,
            hyperedge_count: graph.hyperedge_count(),
            component_count,
            isolated_node_count,
            max_degree,
            density,
        }
    }
}

/// Copy `graph` into a petgraph `UnGraph` weighted by external id.
///
/// Node `i` of the result is [`NodeIndex`](crate::NodeIndex) `i`. Parallel
/// edges are kept; self-loops are dropped.
#[must_use]
pub fn to_petgraph(graph: &Graph) -> UnGraph<ExternalId, ()> {
    let mut pg = UnGraph::with_capacity(graph.node_count(), graph.edge_count());
    let nodes: Vec<_> = graph
        .mapper()
        .iter()
        .map(|(_, id)| pg.add_node(id))
        .collect();

    for (u, &pu) in nodes.iter().enumerate() {
        for &v in graph.neighbors(u) {
            if u < v {
                pg.add_edge(pu, nodes[v], ());
            }
        }
    }
    pg
}
