//! Ranking units: a pattern with its occurrence (or state) collection.

use super::code::PatternCode;
use super::occurrence::{validate_all, Embedding};
use crate::error::Result;
use std::collections::HashMap;

/// One pattern paired with everything the miner found for it.
///
/// `O` is usually [`Occurrence`](super::Occurrence); the state-aware
/// rules rank entries of [`StateSingleOutput`](super::StateSingleOutput)
/// or [`StateMultiOutput`](super::StateMultiOutput) instead.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(
        try_from = "RawEntry<O>",
        bound(deserialize = "O: Embedding + serde::Deserialize<'de>")
    )
)]
pub struct PatternEntry<O> {
    code: PatternCode,
    occurrences: Vec<O>,
}

/// Wire form of [`PatternEntry`]; converted through [`PatternEntry::new`]
/// so a deserialized entry is checked like a constructed one.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawEntry<O> {
    code: PatternCode,
    occurrences: Vec<O>,
}

#[cfg(feature = "serde")]
impl<O: Embedding> TryFrom<RawEntry<O>> for PatternEntry<O> {
    type Error = crate::error::RankError;

    fn try_from(raw: RawEntry<O>) -> Result<Self> {
        Self::new(raw.code, raw.occurrences)
    }
}

impl<O: Embedding> PatternEntry<O> {
    /// Pairs `code` with `occurrences`, checking each one fits the pattern.
    pub fn new(code: PatternCode, occurrences: Vec<O>) -> Result<Self> {
        validate_all(&code, &occurrences)?;
        Ok(Self { code, occurrences })
    }

    /// Pairs without validation, for collections already checked upstream.
    pub fn unchecked(code: PatternCode, occurrences: Vec<O>) -> Self {
        Self { code, occurrences }
    }
}

impl<O> PatternEntry<O> {
    pub fn code(&self) -> &PatternCode {
        &self.code
    }

    pub fn occurrences(&self) -> &[O] {
        &self.occurrences
    }

    /// Number of occurrences (the pattern's multiplicity).
    pub fn count(&self) -> usize {
        self.occurrences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty()
    }

    pub fn into_parts(self) -> (PatternCode, Vec<O>) {
        (self.code, self.occurrences)
    }
}

/// The miner's output: pattern → occurrence collection.
///
/// # Examples
///
/// ```
/// use pattern_rank::pattern::{Occurrence, PatternCode, PatternTable};
///
/// let add = PatternCode::parse(&[1, 0, 0]).unwrap();
/// let mut table = PatternTable::new();
/// table.insert(add.clone(), Occurrence::new(vec![3]));
/// table.insert(add.clone(), Occurrence::new(vec![9]));
///
/// let entries = table.entries().unwrap();
/// assert_eq!(entries.len(), 1);
/// assert_eq!(entries[0].count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct PatternTable<O> {
    patterns: HashMap<PatternCode, Vec<O>>,
}

impl<O: Embedding + Clone> PatternTable<O> {
    pub fn new() -> Self {
        Self {
            patterns: HashMap::new(),
        }
    }

    /// Appends one occurrence to `code`'s collection.
    pub fn insert(&mut self, code: PatternCode, occurrence: O) {
        self.patterns.entry(code).or_default().push(occurrence);
    }

    /// Registers `code` with no occurrences (if it is not already present).
    pub fn insert_pattern(&mut self, code: PatternCode) {
        self.patterns.entry(code).or_default();
    }

    pub fn get(&self, code: &PatternCode) -> Option<&[O]> {
        self.patterns.get(code).map(Vec::as_slice)
    }

    /// Number of distinct patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Validated entries, ordered by pattern code.
    ///
    /// The order is independent of insertion and hashing, so a stable sort
    /// over the result is reproducible.
    pub fn entries(&self) -> Result<Vec<PatternEntry<O>>> {
        let mut codes: Vec<&PatternCode> = self.patterns.keys().collect();
        codes.sort();
        codes
            .into_iter()
            .map(|code| PatternEntry::new(code.clone(), self.patterns[code].clone()))
            .collect()
    }
}

impl<O: Embedding + Clone> Default for PatternTable<O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: Embedding + Clone> FromIterator<(PatternCode, O)> for PatternTable<O> {
    fn from_iter<I: IntoIterator<Item = (PatternCode, O)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (code, occurrence) in iter {
            table.insert(code, occurrence);
        }
        table
    }
}
