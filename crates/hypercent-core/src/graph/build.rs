//! Graph construction from edge-list and hyperedge-membership files.
//!
//! # Overview
//!
//! Two input formats feed the same [`Graph`] type:
//!
//! - **Edge list** (`.graph`): a `<node_count> <edge_count>` header followed
//!   by whitespace-separated integer pairs. Pairs are read until end of
//!   input, so the header counts are never trusted; a trailing unpaired
//!   token is dropped.
//! - **Hypergraph** (`.hypergraph`): one hyperedge per line, members
//!   separated by whitespace. Hyperedge `k` becomes a synthetic node with
//!   external id `offset + k` linked to each member (the bipartite
//!   expansion). Empty lines are skipped and do not advance `k`; a line of
//!   only whitespace is a hyperedge with no members.
//!
//! ## Index Order
//!
//! Ids are interned in reading order: for an edge, `u` then `v`; for a
//! hyperedge, the synthetic node first and then each member. Result tables
//! are emitted in this order.

#![allow(clippy::module_name_repetitions)]

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info, instrument, warn};

use super::{BuildError, Graph, Representation};
use crate::index::{ExternalId, NodeIndex};

// ---------------------------------------------------------------------------
// GraphBuilder
// ---------------------------------------------------------------------------

/// Incremental builder for either representation.
///
/// The file readers below drive a builder; tests and benchmarks use it
/// directly to assemble graphs in memory.
#[derive(Debug)]
pub struct GraphBuilder {
    graph: Graph,
    offset: ExternalId,
}

impl GraphBuilder {
    /// Builder for a plain graph: every node is real.
    #[must_use]
    pub fn plain() -> Self {
        Self {
            graph: Graph::empty(Representation::Graph),
            offset: ExternalId::MAX,
        }
    }

    /// Builder for a bipartite-expanded hypergraph whose synthetic hyperedge
    /// ids start at `offset`.
    #[must_use]
    pub fn hypergraph(offset: ExternalId) -> Self {
        Self {
            graph: Graph::empty(Representation::Hypergraph),
            offset,
        }
    }

    /// Add the undirected edge `u`-`v`, interning both endpoints as real.
    pub fn edge(&mut self, u: ExternalId, v: ExternalId) -> &mut Self {
        let ui = self.graph.intern(u, true);
        let vi = self.graph.intern(v, true);
        self.graph.add_edge(ui, vi);
        self
    }

    /// Add one hyperedge and return the index of its synthetic node.
    ///
    /// Members are not checked against the synthetic id range; the file
    /// reader rejects colliding ids before calling this.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::HyperedgeIdOverflow`] when `offset + k` does not
    /// fit in an [`ExternalId`]. Nothing is added in that case.
    pub fn hyperedge(&mut self, members: &[ExternalId]) -> Result<NodeIndex, BuildError> {
        let seq = self.graph.hyperedge_count();
        let id = ExternalId::try_from(seq)
            .ok()
            .and_then(|k| self.offset.checked_add(k))
            .ok_or(BuildError::HyperedgeIdOverflow {
                hyperedge: seq,
                offset: self.offset,
            })?;
        let he = self.graph.intern(id, false);
        for &m in members {
            let mi = self.graph.intern(m, true);
            self.graph.add_edge(he, mi);
        }
        self.graph.bump_hyperedges();
        Ok(he)
    }

    /// First synthetic hyperedge id.
    #[must_use]
    pub fn offset(&self) -> ExternalId {
        self.offset
    }

    #[must_use]
    pub fn finish(self) -> Graph {
        self.graph
    }
}

// ---------------------------------------------------------------------------
// Readers
// ---------------------------------------------------------------------------

/// Open `path` and read it in the given representation.
///
/// # Errors
///
/// Returns [`BuildError::Open`] if the file cannot be opened, and any error
/// from [`read_edge_list`] / [`read_hypergraph`].
#[instrument(skip(path), fields(path = %path.display()))]
pub fn load(
    path: &Path,
    representation: Representation,
    offset: ExternalId,
) -> Result<Graph, BuildError> {
    let file = File::open(path).map_err(|source| BuildError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    let graph = match representation {
        Representation::Graph => read_edge_list(reader)?,
        Representation::Hypergraph => read_hypergraph(reader, offset)?,
    };

    info!(
        nodes = graph.node_count(),
        real = graph.real_node_count(),
        edges = graph.edge_count(),
        hyperedges = graph.hyperedge_count(),
        "graph loaded"
    );
    Ok(graph)
}

/// Read a plain edge list.
///
/// # Errors
///
/// Returns [`BuildError::Read`] on I/O failure and
/// [`BuildError::InvalidToken`] for a non-integer endpoint.
pub fn read_edge_list<R: BufRead>(mut reader: R) -> Result<Graph, BuildError> {
    let mut builder = GraphBuilder::plain();
    let mut buf = String::new();
    let mut line = 0usize;
    let mut header_left = 2u8;
    let mut pending: Option<ExternalId> = None;

    loop {
        buf.clear();
        line += 1;
        let read = reader
            .read_line(&mut buf)
            .map_err(|source| BuildError::Read { line, source })?;
        if read == 0 {
            break;
        }

        for token in buf.split_whitespace() {
            if header_left > 0 {
                header_left -= 1;
                continue;
            }
            let id = parse_id(token, line)?;
            match pending.take() {
                Some(u) => {
                    builder.edge(u, id);
                }
                None => pending = Some(id),
            }
        }
    }

    if let Some(dangling) = pending {
        warn!(id = dangling, "edge list ends with an unpaired node id; ignored");
    }

    let graph = builder.finish();
    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "edge list parsed"
    );
    Ok(graph)
}

/// Read hyperedge-membership lines and expand them into a bipartite graph.
///
/// # Errors
///
/// Returns [`BuildError::Read`] on I/O failure,
/// [`BuildError::InvalidToken`] for a non-integer member,
/// [`BuildError::ReservedId`] for a member id `>= offset` and
/// [`BuildError::HyperedgeIdOverflow`] once `offset + k` passes `i64::MAX`.
pub fn read_hypergraph<R: BufRead>(mut reader: R, offset: ExternalId) -> Result<Graph, BuildError> {
    let mut builder = GraphBuilder::hypergraph(offset);
    let mut buf = String::new();
    let mut members: Vec<ExternalId> = Vec::new();
    let mut line = 0usize;

    loop {
        buf.clear();
        line += 1;
        let read = reader
            .read_line(&mut buf)
            .map_err(|source| BuildError::Read { line, source })?;
        if read == 0 {
            break;
        }

        let content = buf.trim_end_matches(['\n', '\r']);
        if content.is_empty() {
            continue;
        }

        members.clear();
        for token in content.split_whitespace() {
            let id = parse_id(token, line)?;
            if id >= offset {
                return Err(BuildError::ReservedId { line, id, offset });
            }
            members.push(id);
        }
        builder.hyperedge(&members)?;
    }

    let graph = builder.finish();
    debug!(
        nodes = graph.node_count(),
        hyperedges = graph.hyperedge_count(),
        "hypergraph parsed"
    );
    Ok(graph)
}

fn parse_id(token: &str, line: usize) -> Result<ExternalId, BuildError> {
    token.parse().map_err(|_| BuildError::InvalidToken {
        line,
        token: token.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
