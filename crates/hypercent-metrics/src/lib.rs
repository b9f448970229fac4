#![forbid(unsafe_code)]
//! Centrality metrics over a [`Graph`](hypercent_core::Graph).
//!
//! # Overview
//!
//! Every metric takes a graph in either representation and returns one
//! `f64` per [`NodeIndex`](hypercent_core::NodeIndex):
//!
//! - **Betweenness** (`betweenness`): Brandes' accumulation over the
//!   shortest-path DAG from every real source.
//! - **Farness / closeness / harmonic** (`distance`): level sums from a
//!   level-only BFS per real source, with the bipartite halving/doubling
//!   correction for hypergraphs.
//! - **Degree** (`degree`): adjacency-list length.
//! - **PageRank** (`pagerank`): power iteration over the same adjacency.
//!
//! Betweenness and the distance triad share the BFS core in
//! [`traversal`]. Sources are processed in parallel on the current rayon
//! pool (see [`exec`]); results do not depend on the worker count.
//!
//! # Usage
//!
//! ```rust,ignore
//! use hypercent_core::graph::read_hypergraph;
//! use hypercent_metrics::analysis::{AnalysisConfig, analyze};
//!
//! let graph = read_hypergraph(reader, hypercent_core::DEFAULT_HYPEREDGE_OFFSET)?;
//! let report = analyze(&graph, &AnalysisConfig::default())?;
//! for scores in &report.scores {
//!     println!("{}: {:?}", scores.measure, scores.top_nodes(&graph));
//! }
//! ```

pub mod analysis;
pub mod betweenness;
pub mod degree;
pub mod distance;
pub mod exec;
pub mod pagerank;
pub mod scores;
pub mod traversal;

pub use analysis::{AnalysisConfig, AnalysisError, RepresentationReport, analyze, analyze_file};
pub use scores::{Measure, ScoreVector, TopNodes};
