//! Dense node indexing.
//!
//! Every external identifier seen during ingestion (real node ids and the
//! synthesized hyperedge ids alike) is assigned the next free [`NodeIndex`]
//! on first sight. Indices are dense and zero-based, so every per-node
//! structure downstream is a plain `Vec` or bit set of length
//! [`IndexMapper::len`].

use std::collections::HashMap;

/// Dense internal node index in `[0, N)`.
pub type NodeIndex = usize;

/// Identifier supplied by the input data (or synthesized for hyperedges).
pub type ExternalId = i64;

/// Bidirectional, insertion-ordered mapping between external ids and dense
/// indices. Write-once for the lifetime of a graph: there is no removal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexMapper {
    to_index: HashMap<ExternalId, NodeIndex>,
    to_external: Vec<ExternalId>,
}

impl IndexMapper {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mapper with room for `capacity` ids.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            to_index: HashMap::with_capacity(capacity),
            to_external: Vec::with_capacity(capacity),
        }
    }

    /// Return the index for `id`, assigning the next free one on first sight.
    pub fn internal_index(&mut self, id: ExternalId) -> NodeIndex {
        let next = self.to_external.len();
        let idx = *self.to_index.entry(id).or_insert(next);
        if idx == next {
            self.to_external.push(id);
        }
        idx
    }

    /// Look up an already-assigned index without inserting.
    #[must_use]
    pub fn index_of(&self, id: ExternalId) -> Option<NodeIndex> {
        self.to_index.get(&id).copied()
    }

    /// External id for an assigned index.
    ///
    /// # Panics
    ///
    /// Panics if `idx` was never assigned. Callers only hold indices handed
    /// out by this mapper, so an out-of-range index is a programming error.
    #[must_use]
    pub fn external_id(&self, idx: NodeIndex) -> ExternalId {
        self.to_external[idx]
    }

    /// Non-panicking variant of [`IndexMapper::external_id`].
    #[must_use]
    pub fn get(&self, idx: NodeIndex) -> Option<ExternalId> {
        self.to_external.get(idx).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.to_external.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_external.is_empty()
    }

    /// `(index, external id)` pairs in insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (NodeIndex, ExternalId)> + '_ {
        self.to_external.iter().copied().enumerate()
    }

    /// Rough heap footprint of both directions of the mapping.
    #[must_use]
    pub fn heap_bytes(&self) -> usize {
        let entry = std::mem::size_of::<ExternalId>() + std::mem::size_of::<NodeIndex>();
        // hashbrown stores one control byte per bucket next to each entry.
        self.to_index.capacity() * (entry + 1)
            + self.to_external.capacity() * std::mem::size_of::<ExternalId>()
    }
}
