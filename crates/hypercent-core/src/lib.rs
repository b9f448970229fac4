#![forbid(unsafe_code)]
//! hypercent-core library.
//!
//! Shared ingestion layer for every centrality measure: the dense
//! [`index::IndexMapper`], the adjacency-list [`graph::Graph`] with its
//! real-node mask, the two input parsers in [`graph::build`], dataset
//! configuration, and stage timing.
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` enums at the library seams
//!   ([`graph::BuildError`], [`config::ConfigError`]) carrying an
//!   [`error::ErrorCode`]; callers wrap them in `anyhow` with path context.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod error;
pub mod graph;
pub mod index;
pub mod timing;

pub use graph::{Graph, Representation};
pub use index::{ExternalId, IndexMapper, NodeIndex};

/// Default offset separating synthetic hyperedge ids from real node ids.
///
/// Hyperedge `k` (zero-based, counting non-empty lines) receives the external
/// id `DEFAULT_HYPEREDGE_OFFSET + k`.
pub const DEFAULT_HYPEREDGE_OFFSET: ExternalId = 4_000_000;
