//! Error type shared by the pattern, cost, and ranking modules.

use crate::pattern::PatternCode;
use std::fmt;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RankError>;

/// Which side table a scoring rule needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SideTable {
    /// Pattern → [`EmulatableBlock`](crate::cost::EmulatableBlock).
    Emulation,
    /// Pattern → [`UseBlock`](crate::cost::UseBlock).
    UseBlock,
}

impl fmt::Display for SideTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SideTable::Emulation => f.write_str("emulation"),
            SideTable::UseBlock => f.write_str("use-block"),
        }
    }
}

/// Errors reported by pattern validation, cost configuration, and ranking.
///
/// Empty occurrence or state collections are never an error: every scoring
/// rule has a defined fallback for them.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RankError {
    /// The token sequence is not a well-formed pattern encoding.
    #[error("malformed pattern code at token {position}: {reason}")]
    MalformedPattern {
        /// Index of the offending token (the sequence length for truncation).
        position: usize,
        /// What was wrong.
        reason: String,
    },

    /// An occurrence or state descriptor does not fit its pattern.
    #[error("malformed occurrence #{index} for pattern {pattern}: {reason}")]
    MalformedOccurrence {
        /// The pattern the occurrence was paired with.
        pattern: PatternCode,
        /// Position of the occurrence in its collection.
        index: usize,
        /// What was wrong.
        reason: String,
    },

    /// The side table exists but has no entry for this pattern.
    #[error("missing cost metadata: pattern {pattern} has no {table} entry")]
    MissingCostMetadata {
        /// The table that was consulted.
        table: SideTable,
        /// The pattern that was looked up.
        pattern: PatternCode,
    },

    /// A rule needs a side table that the ranking context does not carry.
    #[error("ranking context has no {0} table")]
    MissingSideTable(SideTable),

    /// A configuration value is out of range.
    #[error("invalid cost configuration: {0}")]
    InvalidConfig(String),
}

impl RankError {
    /// Returns `true` for the missing-metadata conditions.
    pub fn is_missing_metadata(&self) -> bool {
        matches!(
            self,
            RankError::MissingCostMetadata { .. } | RankError::MissingSideTable(_)
        )
    }
}
