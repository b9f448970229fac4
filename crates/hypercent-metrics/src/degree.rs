//! Degree centrality: adjacency-list length per node.
//!
//! Parallel edges and duplicate hyperedge members are counted, so in the
//! bipartite expansion a real node's degree is the number of hyperedge
//! memberships it was read with.

use hypercent_core::Graph;
use tracing::instrument;

/// Raw (unnormalized) degree of every node.
#[must_use]
#[allow(clippy::cast_precision_loss)]
#[instrument(skip(graph), fields(nodes = graph.node_count()))]
pub fn degree_centrality(graph: &Graph) -> Vec<f64> {
    (0..graph.node_count())
        .map(|v| graph.degree(v) as f64)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hypercent_core::graph::GraphBuilder;

    #[test]
    fn star_center_collects_every_leaf() {
        let mut b = GraphBuilder::plain();
        b.edge(0, 1).edge(0, 2).edge(0, 3);
        let g = b.finish();
        let deg = degree_centrality(&g);
        assert_eq!(deg, vec![3.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn hypergraph_degree_counts_memberships() {
        let mut b = GraphBuilder::hypergraph(10);
        b.hyperedge(&[1, 2]).expect("hyperedge id");
        b.hyperedge(&[1, 1, 3]).expect("hyperedge id");
        let g = b.finish();
        let deg = degree_centrality(&g);
        let one = g.mapper().index_of(1).expect("known id");
        let second_edge = g.mapper().index_of(11).expect("hyperedge id");
        assert!((deg[one] - 3.0).abs() < f64::EPSILON);
        assert!((deg[second_edge] - 3.0).abs() < f64::EPSILON);
    }
}
