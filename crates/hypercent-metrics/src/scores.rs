//! Named score vectors and top-node selection.

use std::fmt;
use std::str::FromStr;

use hypercent_core::{ExternalId, Graph, NodeIndex};
use serde::Serialize;

/// Absolute tolerance when comparing a score against the maximum.
pub const TIE_EPSILON: f64 = 1e-9;

/// Every centrality measure the engine can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Measure {
    Betweenness,
    Farness,
    Closeness,
    Harmonic,
    Degree,
    PageRank,
}

impl Measure {
    /// All measures in reporting order.
    pub const ALL: [Self; 6] = [
        Self::Betweenness,
        Self::Farness,
        Self::Closeness,
        Self::Harmonic,
        Self::Degree,
        Self::PageRank,
    ];

    /// Directory a measure's result files are written under.
    #[must_use]
    pub const fn dir_name(self) -> &'static str {
        match self {
            Self::Betweenness => "Betweenness",
            Self::Farness => "Farness",
            Self::Closeness => "Closeness",
            Self::Harmonic => "Harmonic",
            Self::Degree => "Degree",
            Self::PageRank => "PageRank",
        }
    }

    /// Last component of a result file name before `.txt`.
    #[must_use]
    pub const fn file_suffix(self) -> &'static str {
        match self {
            Self::Betweenness => "betweenness",
            Self::Farness => "farness",
            Self::Closeness => "closeness",
            Self::Harmonic => "harmonic",
            Self::Degree => "degree",
            Self::PageRank => "pagerank",
        }
    }

    /// Whether the measure needs one BFS per real source.
    #[must_use]
    pub const fn is_path_based(self) -> bool {
        matches!(
            self,
            Self::Betweenness | Self::Farness | Self::Closeness | Self::Harmonic
        )
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_suffix())
    }
}

/// Error returned when parsing an unknown measure name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown measure {0:?} (expected one of: betweenness, farness, closeness, harmonic, degree, pagerank)")]
pub struct UnknownMeasure(pub String);

impl FromStr for Measure {
    type Err = UnknownMeasure;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| m.file_suffix() == lower)
            .ok_or_else(|| UnknownMeasure(s.to_string()))
    }
}

/// One measure's scores, indexed by [`NodeIndex`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreVector {
    pub measure: Measure,
    pub values: Vec<f64>,
}

/// The real nodes sharing the maximum score of a measure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopNodes {
    /// Maximum score over real nodes; `None` when there are none.
    pub max: Option<f64>,
    /// Every real node within [`TIE_EPSILON`] of `max`, in insertion order.
    pub ids: Vec<ExternalId>,
}

impl ScoreVector {
    #[must_use]
    pub const fn new(measure: Measure, values: Vec<f64>) -> Self {
        Self { measure, values }
    }

    /// `(external id, score)` for each real node in insertion order.
    pub fn iter_real<'a>(&'a self, graph: &'a Graph) -> impl Iterator<Item = (ExternalId, f64)> + 'a {
        graph
            .real_nodes()
            .map(move |v| (graph.external_id(v), self.values[v]))
    }

    /// Score of the node with external id `id`, if it exists.
    #[must_use]
    pub fn by_external_id(&self, graph: &Graph, id: ExternalId) -> Option<f64> {
        let v: NodeIndex = graph.mapper().index_of(id)?;
        self.values.get(v).copied()
    }

    /// Real nodes holding the maximum score.
    #[must_use]
    pub fn top_nodes(&self, graph: &Graph) -> TopNodes {
        let max = self
            .iter_real(graph)
            .map(|(_, s)| s)
            .fold(None, |acc: Option<f64>, s| Some(acc.map_or(s, |m| m.max(s))));

        let ids = max.map_or_else(Vec::new, |m| {
            self.iter_real(graph)
                .filter(|&(_, s)| (s - m).abs() < TIE_EPSILON)
                .map(|(id, _)| id)
                .collect()
        });

        TopNodes { max, ids }
    }
}
