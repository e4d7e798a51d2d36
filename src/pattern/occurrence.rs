//! Occurrences of a pattern and their output-state descriptors.

use super::code::PatternCode;
use crate::error::{RankError, Result};

/// Identifier of a vertex in the host circuit graph.
pub type VertexId = u32;

/// One concrete embedding of a pattern: the circuit vertex matched by each
/// operation node, in the pattern's pre-order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Occurrence(Vec<VertexId>);

impl Occurrence {
    pub fn new(vertices: Vec<VertexId>) -> Self {
        Self(vertices)
    }

    pub fn vertices(&self) -> &[VertexId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<VertexId>> for Occurrence {
    fn from(vertices: Vec<VertexId>) -> Self {
        Self(vertices)
    }
}

/// Anything that can stand in an entry's occurrence collection.
///
/// Implemented by plain [`Occurrence`]s and by the output-state
/// descriptors, so count- and size-based rules rank either kind.
pub trait Embedding: Send + Sync {
    /// The matched circuit vertices.
    fn vertices(&self) -> &[VertexId];

    /// Checks that this embedding fits `code`.
    ///
    /// The default requires one vertex per operation node.
    fn validate(&self, code: &PatternCode) -> std::result::Result<(), String> {
        let expected = code.operation_node_count();
        let actual = self.vertices().len();
        if actual != expected {
            return Err(format!(
                "maps {actual} vertices, pattern has {expected} operation nodes"
            ));
        }
        Ok(())
    }
}

impl Embedding for Occurrence {
    fn vertices(&self) -> &[VertexId] {
        &self.0
    }
}

/// Per-occurrence wiring descriptor used by the state-aware profit rules.
pub trait OutputState: Embedding {
    /// How many block outputs this occurrence needs (at least one: the root).
    fn output_count(&self) -> usize;
}

/// Occurrence whose only externally visible value is the pattern root.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateSingleOutput {
    occurrence: Occurrence,
}

impl StateSingleOutput {
    pub fn new(occurrence: Occurrence) -> Self {
        Self { occurrence }
    }

    pub fn occurrence(&self) -> &Occurrence {
        &self.occurrence
    }
}

impl Embedding for StateSingleOutput {
    fn vertices(&self) -> &[VertexId] {
        self.occurrence.vertices()
    }
}

impl OutputState for StateSingleOutput {
    fn output_count(&self) -> usize {
        1
    }
}

/// Occurrence where internal operation nodes also feed logic outside the
/// match, so a replacing block must expose them as extra outputs.
///
/// `exposed` holds 0-based pre-order operation-node indices. Index 0 is the
/// root, which is always an output; duplicates count once.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "RawMultiOutput")
)]
pub struct StateMultiOutput {
    occurrence: Occurrence,
    exposed: Vec<usize>,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawMultiOutput {
    occurrence: Occurrence,
    exposed: Vec<usize>,
}

#[cfg(feature = "serde")]
impl From<RawMultiOutput> for StateMultiOutput {
    fn from(raw: RawMultiOutput) -> Self {
        Self::new(raw.occurrence, raw.exposed)
    }
}

impl StateMultiOutput {
    pub fn new(occurrence: Occurrence, mut exposed: Vec<usize>) -> Self {
        exposed.sort_unstable();
        exposed.dedup();
        Self {
            occurrence,
            exposed,
        }
    }

    pub fn occurrence(&self) -> &Occurrence {
        &self.occurrence
    }

    /// Sorted, deduplicated exposed node indices.
    pub fn exposed(&self) -> &[usize] {
        &self.exposed
    }
}

impl Embedding for StateMultiOutput {
    fn vertices(&self) -> &[VertexId] {
        self.occurrence.vertices()
    }

    fn validate(&self, code: &PatternCode) -> std::result::Result<(), String> {
        let nodes = code.operation_node_count();
        let actual = self.occurrence.len();
        if actual != nodes {
            return Err(format!(
                "maps {actual} vertices, pattern has {nodes} operation nodes"
            ));
        }
        if let Some(&bad) = self.exposed.iter().find(|&&i| i >= nodes) {
            return Err(format!(
                "exposes node {bad}, pattern has {nodes} operation nodes"
            ));
        }
        Ok(())
    }
}

impl OutputState for StateMultiOutput {
    fn output_count(&self) -> usize {
        let extra = self.exposed.iter().filter(|&&i| i != 0).count();
        1 + extra
    }
}

/// Checks every embedding in `items` against `code`.
pub(crate) fn validate_all<O: Embedding>(code: &PatternCode, items: &[O]) -> Result<()> {
    for (index, item) in items.iter().enumerate() {
        item.validate(code)
            .map_err(|reason| RankError::MalformedOccurrence {
                pattern: code.clone(),
                index,
                reason,
            })?;
    }
    Ok(())
}
