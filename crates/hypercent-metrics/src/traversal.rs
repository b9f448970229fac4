//! Single-source unweighted BFS, the shared core of betweenness and the
//! distance measures.
//!
//! # Variants
//!
//! - [`BfsLevels`]: distance ("level") from the source and the visited set.
//! - [`ShortestPathDag`]: additionally the shortest-path count `sigma`, the
//!   predecessor lists of the shortest-path DAG and the finishing order.
//!
//! Both are reusable workspaces: allocate once per worker with the graph's
//! node count, then call `run` for each source. A run only resets the nodes
//! the previous run touched.
//!
//! # Finishing-order contract
//!
//! [`ShortestPathDag::finishing_order`] lists reached nodes in the order they
//! left the FIFO frontier, which is non-decreasing by level. Brandes'
//! dependency pass must consume it back to front so that every node is
//! settled before any of its predecessors. Reordering or splitting that pass
//! breaks accumulation for nodes whose predecessors sit at different depths
//! of the DAG.

use std::collections::VecDeque;

use fixedbitset::FixedBitSet;
use hypercent_core::{Graph, NodeIndex};

/// Level of a node the current run has not reached.
pub const UNREACHED: u32 = u32::MAX;

// ---------------------------------------------------------------------------
// Level-only BFS
// ---------------------------------------------------------------------------

/// Level-only BFS workspace.
#[derive(Debug, Clone)]
pub struct BfsLevels {
    level: Vec<u32>,
    visited: FixedBitSet,
    queue: VecDeque<NodeIndex>,
    reached: Vec<NodeIndex>,
}

impl BfsLevels {
    /// Workspace for graphs with `n` nodes.
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self {
            level: vec![UNREACHED; n],
            visited: FixedBitSet::with_capacity(n),
            queue: VecDeque::new(),
            reached: Vec::new(),
        }
    }

    /// Traverse `graph` from `source`.
    ///
    /// # Panics
    ///
    /// Panics if `source` or the graph is larger than the workspace.
    pub fn run(&mut self, graph: &Graph, source: NodeIndex) {
        for &v in &self.reached {
            self.level[v] = UNREACHED;
        }
        self.reached.clear();
        self.visited.clear();

        self.level[source] = 0;
        self.visited.insert(source);
        self.queue.push_back(source);

        while let Some(v) = self.queue.pop_front() {
            self.reached.push(v);
            let next = self.level[v] + 1;
            for &w in graph.neighbors(v) {
                if !self.visited.put(w) {
                    self.level[w] = next;
                    self.queue.push_back(w);
                }
            }
        }
    }

    /// Distance from the last source, `None` if unreached.
    #[must_use]
    pub fn level(&self, v: NodeIndex) -> Option<u32> {
        match self.level[v] {
            UNREACHED => None,
            l => Some(l),
        }
    }

    /// Raw level array; unreached nodes hold [`UNREACHED`].
    #[must_use]
    pub fn levels(&self) -> &[u32] {
        &self.level
    }

    #[must_use]
    pub const fn visited(&self) -> &FixedBitSet {
        &self.visited
    }

    #[must_use]
    pub fn is_visited(&self, v: NodeIndex) -> bool {
        self.visited.contains(v)
    }

    /// Reached nodes in dequeue order.
    #[must_use]
    pub fn reached(&self) -> &[NodeIndex] {
        &self.reached
    }
}

// ---------------------------------------------------------------------------
// BFS with predecessors
// ---------------------------------------------------------------------------

/// BFS workspace that also records the shortest-path DAG.
#[derive(Debug, Clone)]
pub struct ShortestPathDag {
    source: NodeIndex,
    level: Vec<u32>,
    visited: FixedBitSet,
    sigma: Vec<f64>,
    predecessors: Vec<Vec<NodeIndex>>,
    queue: VecDeque<NodeIndex>,
    order: Vec<NodeIndex>,
}

impl ShortestPathDag {
    /// Workspace for graphs with `n` nodes.
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self {
            source: 0,
            level: vec![UNREACHED; n],
            visited: FixedBitSet::with_capacity(n),
            sigma: vec![0.0; n],
            predecessors: vec![Vec::new(); n],
            queue: VecDeque::new(),
            order: Vec::new(),
        }
    }

    /// Traverse `graph` from `source`, counting shortest paths.
    ///
    /// Every traversed edge `(v, w)` with `level[w] == level[v] + 1` adds
    /// `sigma[v]` to `sigma[w]` and records `v` as a predecessor of `w`,
    /// including edges to nodes that were already discovered through
    /// another predecessor. Parallel edges therefore count as distinct
    /// paths.
    ///
    /// # Panics
    ///
    /// Panics if `source` or the graph is larger than the workspace.
    pub fn run(&mut self, graph: &Graph, source: NodeIndex) {
        for &v in &self.order {
            self.level[v] = UNREACHED;
            self.sigma[v] = 0.0;
            self.predecessors[v].clear();
        }
        self.order.clear();
        self.visited.clear();

        self.source = source;
        self.level[source] = 0;
        self.sigma[source] = 1.0;
        self.visited.insert(source);
        self.queue.push_back(source);

        while let Some(v) = self.queue.pop_front() {
            self.order.push(v);
            let next = self.level[v] + 1;
            for &w in graph.neighbors(v) {
                if !self.visited.put(w) {
                    self.level[w] = next;
                    self.queue.push_back(w);
                }
                if self.level[w] == next {
                    self.sigma[w] += self.sigma[v];
                    self.predecessors[w].push(v);
                }
            }
        }
    }

    #[must_use]
    pub const fn source(&self) -> NodeIndex {
        self.source
    }

    #[must_use]
    pub fn level(&self, v: NodeIndex) -> Option<u32> {
        match self.level[v] {
            UNREACHED => None,
            l => Some(l),
        }
    }

    /// Number of shortest paths from the source to `v` (0 if unreached).
    #[must_use]
    pub fn sigma(&self, v: NodeIndex) -> f64 {
        self.sigma[v]
    }

    /// Immediate predecessors of `v` on shortest paths from the source, one
    /// entry per contributing edge.
    #[must_use]
    pub fn predecessors(&self, v: NodeIndex) -> &[NodeIndex] {
        &self.predecessors[v]
    }

    #[must_use]
    pub fn is_visited(&self, v: NodeIndex) -> bool {
        self.visited.contains(v)
    }

    /// Reached nodes in dequeue order (non-decreasing level). See the
    /// module docs for the contract with the dependency pass.
    #[must_use]
    pub fn finishing_order(&self) -> &[NodeIndex] {
        &self.order
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use hypercent_core::graph::GraphBuilder;

    fn plain(edges: &[(i64, i64)]) -> Graph {
        let mut b = GraphBuilder::plain();
        for &(u, v) in edges {
            b.edge(u, v);
        }
        b.finish()
    }

    fn idx(g: &Graph, id: i64) -> NodeIndex {
        g.mapper().index_of(id).expect("known id")
    }

    #[test]
    fn levels_on_a_path() {
        let g = plain(&[(1, 2), (2, 3), (3, 4)]);
        let mut bfs = BfsLevels::new(g.node_count());
        bfs.run(&g, idx(&g, 1));
        let levels: Vec<_> = [1, 2, 3, 4].iter().map(|&id| bfs.level(idx(&g, id))).collect();
        assert_eq!(levels, vec![Some(0), Some(1), Some(2), Some(3)]);
        assert_eq!(bfs.reached().len(), 4);
    }

    #[test]
    fn unreached_nodes_keep_sentinel_after_reuse() {
        let g = plain(&[(1, 2), (3, 4)]);
        let mut bfs = BfsLevels::new(g.node_count());
        bfs.run(&g, idx(&g, 3));
        bfs.run(&g, idx(&g, 1));
        assert_eq!(bfs.level(idx(&g, 3)), None);
        assert!(!bfs.is_visited(idx(&g, 4)));
        assert_eq!(bfs.levels()[idx(&g, 4)], UNREACHED);
        assert_eq!(bfs.visited().count_ones(..), 2);
    }

    #[test]
    fn diamond_has_two_shortest_paths() {
        // 1 - 2 - 4, 1 - 3 - 4
        let g = plain(&[(1, 2), (1, 3), (2, 4), (3, 4)]);
        let mut dag = ShortestPathDag::new(g.node_count());
        dag.run(&g, idx(&g, 1));

        let four = idx(&g, 4);
        assert!((dag.sigma(four) - 2.0).abs() < f64::EPSILON);
        assert_eq!(dag.predecessors(four), &[idx(&g, 2), idx(&g, 3)]);
        assert_eq!(dag.level(four), Some(2));
        assert!(dag.predecessors(idx(&g, 1)).is_empty());
    }

    #[test]
    fn finishing_order_is_level_monotone() {
        let g = plain(&[(1, 2), (1, 3), (2, 4), (3, 5), (4, 6), (5, 6), (6, 7)]);
        let mut dag = ShortestPathDag::new(g.node_count());
        dag.run(&g, idx(&g, 1));
        let levels: Vec<_> = dag
            .finishing_order()
            .iter()
            .map(|&v| dag.level(v).expect("reached"))
            .collect();
        assert!(levels.windows(2).all(|w| w[0] <= w[1]), "{levels:?}");
        assert_eq!(dag.finishing_order()[0], dag.source());
    }

    #[test]
    fn parallel_edges_multiply_path_counts() {
        let g = plain(&[(1, 2), (1, 2), (2, 3)]);
        let mut dag = ShortestPathDag::new(g.node_count());
        dag.run(&g, idx(&g, 1));
        assert!((dag.sigma(idx(&g, 2)) - 2.0).abs() < f64::EPSILON);
        assert!((dag.sigma(idx(&g, 3)) - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn reuse_resets_sigma_and_predecessors() {
        let g = plain(&[(1, 2), (2, 3), (3, 1)]);
        let mut dag = ShortestPathDag::new(g.node_count());
        dag.run(&g, idx(&g, 1));
        dag.run(&g, idx(&g, 2));
        assert!((dag.sigma(idx(&g, 2)) - 1.0).abs() < f64::EPSILON);
        assert!(dag.predecessors(idx(&g, 2)).is_empty());
        assert_eq!(dag.predecessors(idx(&g, 1)), &[idx(&g, 2)]);
    }

    #[test]
    fn self_loop_does_not_count_as_a_path() {
        let g = plain(&[(1, 1), (1, 2)]);
        let mut dag = ShortestPathDag::new(g.node_count());
        dag.run(&g, idx(&g, 1));
        assert!((dag.sigma(idx(&g, 1)) - 1.0).abs() < f64::EPSILON);
        assert!((dag.sigma(idx(&g, 2)) - 1.0).abs() < f64::EPSILON);
    }
}
