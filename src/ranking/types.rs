//! Core ranking types: the scoring trait, direction, tie-breaking, and the
//! sort-time context.

use crate::cost::{CostModel, EmulatableBlock, EmulationTable, UseBlock, UseBlockTable};
use crate::error::{RankError, Result, SideTable};
use crate::pattern::{PatternCode, PatternEntry};
use std::cmp::Ordering;
use tracing::{trace, warn};

/// A scoring rule that maps an entry to a scalar.
///
/// Scores are compared in ascending order; [`Direction::Descending`] flips
/// the comparison, never the score itself. A rule must be deterministic and
/// must not fail on an empty collection.
///
/// # Type Parameters
///
/// * `O` - The element type of the entry's collection
///
/// # Examples
///
/// ```ignore
/// // Rank by how many distinct circuit vertices the occurrences cover
/// struct Coverage;
///
/// impl PatternScore<Occurrence> for Coverage {
///     fn name(&self) -> &str { "Coverage" }
///     fn score(&self, entry: &PatternEntry<Occurrence>, _ctx: &RankContext<'_>) -> Result<f64> {
///         let vertices: HashSet<_> = entry.occurrences().iter()
///             .flat_map(|o| o.vertices().iter().copied())
///             .collect();
///         Ok(vertices.len() as f64)
///     }
/// }
/// ```
pub trait PatternScore<O>: Send + Sync {
    /// Returns the name of this rule.
    fn name(&self) -> &str;

    /// Computes the score of one entry.
    fn score(&self, entry: &PatternEntry<O>, context: &RankContext<'_>) -> Result<f64>;
}

impl<O, R: PatternScore<O> + ?Sized> PatternScore<O> for Box<R> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn score(&self, entry: &PatternEntry<O>, context: &RankContext<'_>) -> Result<f64> {
        (**self).score(entry, context)
    }
}

impl<O, R: PatternScore<O> + ?Sized> PatternScore<O> for &R {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn score(&self, entry: &PatternEntry<O>, context: &RankContext<'_>) -> Result<f64> {
        (**self).score(entry, context)
    }
}

/// Sort direction.
///
/// `Ascending` puts the lowest score first (cheapest or least profitable,
/// useful for pruning); `Descending` puts the highest first, the usual
/// greedy replacement order for profits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

impl Direction {
    pub fn reverse(self) -> Self {
        match self {
            Direction::Ascending => Direction::Descending,
            Direction::Descending => Direction::Ascending,
        }
    }

    /// Maps an ascending comparison into this direction.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Direction::Ascending => ordering,
            Direction::Descending => ordering.reverse(),
        }
    }

    pub fn is_ascending(self) -> bool {
        self == Direction::Ascending
    }
}

/// `true` is ascending.
impl From<bool> for Direction {
    fn from(ascending: bool) -> Self {
        if ascending {
            Direction::Ascending
        } else {
            Direction::Descending
        }
    }
}

/// Strategy for entries whose scores are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TieBreaker {
    /// Keep the input order (stable sort). Comparators report ties as equal.
    #[default]
    PreserveOrder,

    /// Order ties by pattern code, so the result does not depend on the
    /// input order. The direction applies to this key as well.
    ByCode,
}

impl TieBreaker {
    pub(crate) fn compare<O>(self, a: &PatternEntry<O>, b: &PatternEntry<O>) -> Ordering {
        match self {
            TieBreaker::PreserveOrder => Ordering::Equal,
            TieBreaker::ByCode => a.code().cmp(b.code()),
        }
    }
}

/// Compares two scores as a total order.
///
/// Signed zeros compare equal; NaN sorts above every number so a bad score
/// cannot break the ordering contract.
pub(crate) fn compare_scores(a: f64, b: f64) -> Ordering {
    normalize(a).total_cmp(&normalize(b))
}

/// Scores `entry` with `rule`, tracing every score and warning on
/// non-finite ones.
pub(crate) fn score_logged<O, R: PatternScore<O> + ?Sized>(
    rule: &R,
    entry: &PatternEntry<O>,
    ctx: &RankContext<'_>,
) -> Result<f64> {
    let score = rule.score(entry, ctx)?;
    if !score.is_finite() {
        warn!(rule = rule.name(), pattern = %entry.code(), score, "non-finite score");
    }
    trace!(rule = rule.name(), pattern = %entry.code(), score, "scored pattern");
    Ok(score)
}

fn normalize(score: f64) -> f64 {
    if score == 0.0 {
        0.0
    } else if score.is_nan() {
        f64::NAN.copysign(1.0)
    } else {
        score
    }
}

/// Read-only inputs a rule may need while scoring.
///
/// Side tables are passed at sort time rather than stored in a comparator,
/// so the caller controls their lifetime and must keep them unmodified for
/// the duration of the sort.
///
/// # Examples
///
/// ```
/// use pattern_rank::cost::{EmulationTable, GateCostModel};
/// use pattern_rank::ranking::RankContext;
///
/// let model = GateCostModel::default();
/// let emulation = EmulationTable::new();
/// let ctx = RankContext::new(&model).with_emulation(&emulation);
/// assert!(ctx.has_emulation());
/// assert!(!ctx.has_use_blocks());
/// ```
#[derive(Clone, Copy)]
pub struct RankContext<'a> {
    model: &'a dyn CostModel,
    emulation: Option<&'a EmulationTable>,
    use_blocks: Option<&'a UseBlockTable>,
}

impl<'a> RankContext<'a> {
    pub fn new(model: &'a dyn CostModel) -> Self {
        Self {
            model,
            emulation: None,
            use_blocks: None,
        }
    }

    pub fn with_emulation(mut self, table: &'a EmulationTable) -> Self {
        self.emulation = Some(table);
        self
    }

    pub fn with_use_blocks(mut self, table: &'a UseBlockTable) -> Self {
        self.use_blocks = Some(table);
        self
    }

    pub fn model(&self) -> &'a dyn CostModel {
        self.model
    }

    pub fn has_emulation(&self) -> bool {
        self.emulation.is_some()
    }

    pub fn has_use_blocks(&self) -> bool {
        self.use_blocks.is_some()
    }

    /// Looks up the emulating block for `code`.
    pub fn emulation_block(&self, code: &PatternCode) -> Result<&'a EmulatableBlock> {
        let table = self
            .emulation
            .ok_or(RankError::MissingSideTable(SideTable::Emulation))?;
        table
            .get(code)
            .ok_or_else(|| RankError::MissingCostMetadata {
                table: SideTable::Emulation,
                pattern: code.clone(),
            })
    }

    /// Looks up the decided block usage for `code`.
    pub fn use_block(&self, code: &PatternCode) -> Result<&'a UseBlock> {
        let table = self
            .use_blocks
            .ok_or(RankError::MissingSideTable(SideTable::UseBlock))?;
        table
            .get(code)
            .ok_or_else(|| RankError::MissingCostMetadata {
                table: SideTable::UseBlock,
                pattern: code.clone(),
            })
    }
}

impl std::fmt::Debug for RankContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RankContext")
            .field("emulation", &self.emulation.map(|t| t.len()))
            .field("use_blocks", &self.use_blocks.map(|t| t.len()))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::GateCostModel;

    #[test]
    fn test_score_logged_passes_scores_through() {
        use crate::pattern::Occurrence;
        use crate::ranking::Metric;

        let model = GateCostModel::default();
        let ctx = RankContext::new(&model);
        let add = PatternCode::parse(&[1, 0, 0]).unwrap();
        let entry = PatternEntry::new(add, vec![Occurrence::new(vec![1]); 3]).unwrap();
        assert_eq!(score_logged(&Metric::OccurrenceCount, &entry, &ctx).unwrap(), 3.0);

        let table = UseBlockTable::new();
        let ctx = ctx.with_use_blocks(&table);
        assert!(score_logged(&Metric::UseBlockProfit, &entry, &ctx).is_err());
    }

    #[test]
    fn test_direction_from_bool() {
        assert_eq!(Direction::from(true), Direction::Ascending);
        assert_eq!(Direction::from(false), Direction::Descending);
        assert_eq!(Direction::default(), Direction::Ascending);
        assert_eq!(Direction::Ascending.reverse(), Direction::Descending);
    }

    #[test]
    fn test_direction_apply() {
        assert_eq!(Direction::Ascending.apply(Ordering::Less), Ordering::Less);
        assert_eq!(Direction::Descending.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(Direction::Descending.apply(Ordering::Equal), Ordering::Equal);
    }

    #[test]
    fn test_compare_scores_signed_zero() {
        assert_eq!(compare_scores(-0.0, 0.0), Ordering::Equal);
        assert_eq!(compare_scores(-1.0, 0.0), Ordering::Less);
    }

    #[test]
    fn test_compare_scores_nan_is_greatest() {
        assert_eq!(compare_scores(f64::NAN, f64::INFINITY), Ordering::Greater);
        assert_eq!(compare_scores(-f64::NAN, f64::NAN), Ordering::Equal);
    }

    #[test]
    fn test_context_missing_table() {
        let model = GateCostModel::default();
        let ctx = RankContext::new(&model);
        let code = PatternCode::parse(&[1, 0, 0]).unwrap();
        assert_eq!(
            ctx.emulation_block(&code).unwrap_err(),
            RankError::MissingSideTable(SideTable::Emulation)
        );
        assert_eq!(
            ctx.use_block(&code).unwrap_err(),
            RankError::MissingSideTable(SideTable::UseBlock)
        );
    }

    #[test]
    fn test_context_missing_entry() {
        let model = GateCostModel::default();
        let table = UseBlockTable::new();
        let ctx = RankContext::new(&model).with_use_blocks(&table);
        let code = PatternCode::parse(&[1, 0, 0]).unwrap();
        assert!(matches!(
            ctx.use_block(&code),
            Err(RankError::MissingCostMetadata {
                table: SideTable::UseBlock,
                ..
            })
        ));
    }
}
