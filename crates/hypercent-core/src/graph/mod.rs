//! Graph module: the shared adjacency structure every measure runs on.
//!
//! # Overview
//!
//! A [`Graph`] is an undirected adjacency-list graph over dense
//! [`NodeIndex`] values, plus a real-node mask. It is produced in one of two
//! [`Representation`]s:
//!
//! ```text
//! edge list  "n m\n u v\n u v ..."   ──build::read_edge_list──▶ Graph (every node real)
//! hyperedges "a b c\n d e\n ..."     ──build::read_hypergraph──▶ Graph (bipartite expansion)
//!                                                                 ├─ real nodes: members
//!                                                                 └─ synthetic: one per hyperedge
//!        ↓  stats::GraphStats::from_graph()
//! GraphStats (components, isolated nodes, density, …)
//! ```
//!
//! A graph is immutable once built. Re-reading a dataset or switching
//! representation builds a new value rather than clearing shared state.

pub mod build;
pub mod stats;

use std::fmt;
use std::io;
use std::path::PathBuf;

use fixedbitset::FixedBitSet;
use serde::Serialize;

use crate::error::ErrorCode;
use crate::index::{ExternalId, IndexMapper, NodeIndex};

pub use build::{GraphBuilder, load, read_edge_list, read_hypergraph};
pub use stats::GraphStats;

// ---------------------------------------------------------------------------
// Representation
// ---------------------------------------------------------------------------

/// Which view of a dataset a [`Graph`] was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Representation {
    /// Plain undirected edge list.
    Graph,
    /// Hyperedge membership lines, expanded into a bipartite graph.
    Hypergraph,
}

impl Representation {
    /// Tag used in result file names (`<name>.<tag>.<measure>.txt`).
    #[must_use]
    pub const fn file_tag(self) -> &'static str {
        match self {
            Self::Graph => "ungraph",
            Self::Hypergraph => "cmty",
        }
    }

    /// Factor between a BFS level and the distance in the source domain.
    ///
    /// Every real-to-real hop in the bipartite expansion crosses one
    /// hyperedge node, so levels between real nodes are exactly twice the
    /// hypergraph distance.
    #[must_use]
    pub const fn level_scale(self) -> f64 {
        match self {
            Self::Graph => 1.0,
            Self::Hypergraph => 2.0,
        }
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Graph => "graph",
            Self::Hypergraph => "hypergraph",
        })
    }
}

// ---------------------------------------------------------------------------
// BuildError
// ---------------------------------------------------------------------------

/// Errors raised while reading a graph or hypergraph file.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The input file could not be opened.
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reading from an opened input failed.
    #[error("read error at line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: io::Error,
    },

    /// A token is not a base-10 integer.
    #[error("line {line}: invalid node id {token:?}")]
    InvalidToken { line: usize, token: String },

    /// A hyperedge member id falls inside the synthetic hyperedge id range.
    #[error("line {line}: node id {id} collides with hyperedge ids starting at {offset}")]
    ReservedId {
        line: usize,
        id: ExternalId,
        offset: ExternalId,
    },

    /// `offset + k` no longer fits in an [`ExternalId`].
    #[error("hyperedge {hyperedge} has no id: {offset} + {hyperedge} overflows i64")]
    HyperedgeIdOverflow {
        hyperedge: usize,
        offset: ExternalId,
    },
}

impl BuildError {
    /// Machine-readable code for this error.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Open { source, .. } if source.kind() == io::ErrorKind::NotFound => {
                ErrorCode::InputNotFound
            }
            Self::Open { .. } | Self::Read { .. } => ErrorCode::InputUnreadable,
            Self::InvalidToken { .. } => ErrorCode::InvalidToken,
            Self::ReservedId { .. } => ErrorCode::ReservedNodeId,
            Self::HyperedgeIdOverflow { .. } => ErrorCode::HyperedgeIdOverflow,
        }
    }
}

// ---------------------------------------------------------------------------
// Graph
// ---------------------------------------------------------------------------

/// Undirected adjacency-list graph with a real-node mask.
///
/// Every edge is stored in both endpoints' lists, in insertion order.
/// Parallel edges (repeated pairs, duplicate hyperedge members) are kept:
/// they count towards degree and shortest-path multiplicity but never
/// change a distance.
#[derive(Debug, Clone)]
pub struct Graph {
    representation: Representation,
    adjacency: Vec<Vec<NodeIndex>>,
    mapper: IndexMapper,
    real: FixedBitSet,
    edge_count: usize,
    hyperedge_count: usize,
}

impl Graph {
    pub(crate) fn empty(representation: Representation) -> Self {
        Self {
            representation,
            adjacency: Vec::new(),
            mapper: IndexMapper::new(),
            real: FixedBitSet::new(),
            edge_count: 0,
            hyperedge_count: 0,
        }
    }

    /// Map `id`, growing the per-node structures on first sight.
    ///
    /// `real` only ever sets the mask bit; a node marked real stays real.
    pub(crate) fn intern(&mut self, id: ExternalId, real: bool) -> NodeIndex {
        let idx = self.mapper.internal_index(id);
        if idx == self.adjacency.len() {
            self.adjacency.push(Vec::new());
            self.real.grow(idx + 1);
        }
        if real {
            self.real.insert(idx);
        }
        idx
    }

    pub(crate) fn add_edge(&mut self, u: NodeIndex, v: NodeIndex) {
        self.adjacency[u].push(v);
        self.adjacency[v].push(u);
        self.edge_count += 1;
    }

    pub(crate) fn bump_hyperedges(&mut self) {
        self.hyperedge_count += 1;
    }

    #[must_use]
    pub const fn representation(&self) -> Representation {
        self.representation
    }

    /// Total node count, synthetic hyperedge nodes included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of stored undirected edges (parallel edges counted).
    #[must_use]
    pub const fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Number of hyperedges read (zero for a plain graph).
    #[must_use]
    pub const fn hyperedge_count(&self) -> usize {
        self.hyperedge_count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Neighbors of `v` in adjacency-list order.
    #[must_use]
    pub fn neighbors(&self, v: NodeIndex) -> &[NodeIndex] {
        &self.adjacency[v]
    }

    /// Adjacency-list length of `v`, parallel edges included.
    #[must_use]
    pub fn degree(&self, v: NodeIndex) -> usize {
        self.adjacency[v].len()
    }

    /// Whether `v` is an original entity rather than a hyperedge node.
    #[must_use]
    pub fn is_real(&self, v: NodeIndex) -> bool {
        self.real.contains(v)
    }

    /// The real-node mask, one bit per [`NodeIndex`].
    #[must_use]
    pub const fn real_mask(&self) -> &FixedBitSet {
        &self.real
    }

    #[must_use]
    pub fn real_node_count(&self) -> usize {
        self.real.count_ones(..)
    }

    /// Real node indices in ascending order.
    pub fn real_nodes(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.real.ones()
    }

    #[must_use]
    pub const fn mapper(&self) -> &IndexMapper {
        &self.mapper
    }

    /// External id of `v`. See [`IndexMapper::external_id`].
    #[must_use]
    pub fn external_id(&self, v: NodeIndex) -> ExternalId {
        self.mapper.external_id(v)
    }

    /// Approximate heap footprint of adjacency lists, mapping and mask.
    #[must_use]
    pub fn heap_bytes(&self) -> usize {
        let lists: usize = self
            .adjacency
            .iter()
            .map(|l| l.capacity() * std::mem::size_of::<NodeIndex>())
            .sum();
        lists
            + self.adjacency.capacity() * std::mem::size_of::<Vec<NodeIndex>>()
            + self.mapper.heap_bytes()
            + self.real.len().div_ceil(8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_grows_structures_and_keeps_real_bit() {
        let mut g = Graph::empty(Representation::Hypergraph);
        let e = g.intern(4_000_000, false);
        let a = g.intern(1, true);
        assert_eq!((e, a), (0, 1));
        assert!(!g.is_real(e));
        assert!(g.is_real(a));

        // Seen again as synthetic: stays real.
        assert_eq!(g.intern(1, false), a);
        assert!(g.is_real(a));
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.real_node_count(), 1);
    }

    #[test]
    fn edges_are_stored_in_both_lists() {
        let mut g = Graph::empty(Representation::Graph);
        let a = g.intern(10, true);
        let b = g.intern(20, true);
        g.add_edge(a, b);
        g.add_edge(a, b);
        assert_eq!(g.neighbors(a), &[b, b]);
        assert_eq!(g.neighbors(b), &[a, a]);
        assert_eq!(g.degree(a), 2);
        assert_eq!(g.edge_count(), 2);
    }

    #[test]
    fn representation_tags_and_scale() {
        assert_eq!(Representation::Graph.file_tag(), "ungraph");
        assert_eq!(Representation::Hypergraph.file_tag(), "cmty");
        assert!((Representation::Hypergraph.level_scale() - 2.0).abs() < f64::EPSILON);
        assert_eq!(Representation::Hypergraph.to_string(), "hypergraph");
    }

    #[test]
    fn open_error_codes_distinguish_missing_files() {
        let missing = BuildError::Open {
            path: PathBuf::from("nope"),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert_eq!(missing.code(), ErrorCode::InputNotFound);

        let denied = BuildError::Open {
            path: PathBuf::from("nope"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert_eq!(denied.code(), ErrorCode::InputUnreadable);
    }
}
