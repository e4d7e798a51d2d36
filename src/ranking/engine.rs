//! Multi-rule ranking engine.

use super::types::{
    compare_scores, score_logged, Direction, PatternScore, RankContext, TieBreaker,
};
use crate::error::Result;
use crate::pattern::PatternEntry;
use std::cmp::Ordering;
use tracing::debug;

/// How a [`Ranker`] folds its rules into one ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EvaluationMode {
    /// Lexicographic: the second rule only separates patterns the first
    /// rule scores equally, and so on.
    #[default]
    Sequential,

    /// One combined score per pattern: the weighted sum of every rule.
    Weighted,
}

/// A scoring rule and its factor in the weighted sum.
struct WeightedRule<O> {
    rule: Box<dyn PatternScore<O>>,
    weight: f64,
}

/// Ranks pattern entries by several scoring rules at once.
///
/// Scores are compared exactly (no epsilon), so every mode yields a strict
/// weak ordering and the sort can never be handed an inconsistent order.
///
/// # Examples
///
/// ```
/// use pattern_rank::cost::GateCostModel;
/// use pattern_rank::pattern::{Occurrence, PatternCode, PatternEntry};
/// use pattern_rank::ranking::{Direction, Metric, RankContext, Ranker};
///
/// // Most profitable first; among equal profits, the larger pattern first.
/// let ranker = Ranker::new()
///     .with_rule(Metric::Profit)
///     .with_rule(Metric::PatternSize)
///     .with_direction(Direction::Descending);
///
/// let model = GateCostModel::default();
/// let ctx = RankContext::new(&model);
/// let small = PatternCode::parse(&[1, 0, 0]).unwrap();
/// let large = PatternCode::parse(&[1, 3, 0, 0, 0]).unwrap();
///
/// let entries = vec![
///     PatternEntry::<Occurrence>::new(small, vec![]).unwrap(),
///     PatternEntry::<Occurrence>::new(large, vec![]).unwrap(),
/// ];
/// assert_eq!(ranker.sort_indices(&entries, &ctx).unwrap(), vec![1, 0]);
/// ```
pub struct Ranker<O> {
    rules: Vec<WeightedRule<O>>,
    mode: EvaluationMode,
    direction: Direction,
    tie_breaker: TieBreaker,
}

impl<O> Ranker<O> {
    /// An empty ranker: lexicographic, ascending, ties kept in input order.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            mode: EvaluationMode::Sequential,
            direction: Direction::Ascending,
            tie_breaker: TieBreaker::PreserveOrder,
        }
    }

    /// Switches between lexicographic and weighted-sum combination.
    pub fn with_mode(mut self, mode: EvaluationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the direction; `true` means ascending.
    pub fn with_direction(mut self, direction: impl Into<Direction>) -> Self {
        self.direction = direction.into();
        self
    }

    /// Decides how patterns with identical scores are ordered.
    pub fn with_tie_breaker(mut self, tb: TieBreaker) -> Self {
        self.tie_breaker = tb;
        self
    }

    /// Appends a scoring rule; in weighted mode it counts once.
    pub fn with_rule<R: PatternScore<O> + 'static>(self, rule: R) -> Self {
        self.with_weighted_rule(rule, 1.0)
    }

    /// Appends a scoring rule scaled by `weight` in the weighted sum.
    ///
    /// A negative weight flips that rule's contribution, e.g. "high profit,
    /// then low size" in one weighted score.
    pub fn with_weighted_rule<R: PatternScore<O> + 'static>(
        mut self,
        rule: R,
        weight: f64,
    ) -> Self {
        self.rules.push(WeightedRule {
            rule: Box::new(rule),
            weight,
        });
        self
    }

    /// Number of scoring rules.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Rule names, most significant first.
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|wr| wr.rule.name()).collect()
    }

    /// Score key of one pattern: every rule's score (lexicographic mode) or
    /// just the weighted sum.
    fn compute_scores(&self, entry: &PatternEntry<O>, ctx: &RankContext<'_>) -> Result<Vec<f64>> {
        match self.mode {
            EvaluationMode::Sequential => self
                .rules
                .iter()
                .map(|wr| score_logged(&*wr.rule, entry, ctx))
                .collect(),
            EvaluationMode::Weighted => {
                let mut sum = 0.0;
                for wr in &self.rules {
                    sum += score_logged(&*wr.rule, entry, ctx)? * wr.weight;
                }
                Ok(vec![sum])
            }
        }
    }

    fn order(&self, sa: &[f64], sb: &[f64], a: &PatternEntry<O>, b: &PatternEntry<O>) -> Ordering {
        let ascending = sa
            .iter()
            .zip(sb)
            .map(|(&va, &vb)| compare_scores(va, vb))
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.tie_breaker.compare(a, b));
        self.direction.apply(ascending)
    }

    /// Where `a` ranks relative to `b`, including direction and tie-break.
    pub fn compare(
        &self,
        a: &PatternEntry<O>,
        b: &PatternEntry<O>,
        ctx: &RankContext<'_>,
    ) -> Result<Ordering> {
        let sa = self.compute_scores(a, ctx)?;
        let sb = self.compute_scores(b, ctx)?;
        Ok(self.order(&sa, &sb, a, b))
    }

    /// Positions of `entries` in ranked order.
    ///
    /// Every pattern is scored before anything moves, so a missing side-table
    /// row aborts the ranking. Without rules the input order is kept.
    pub fn sort_indices(
        &self,
        entries: &[PatternEntry<O>],
        ctx: &RankContext<'_>,
    ) -> Result<Vec<usize>> {
        if self.rules.is_empty() {
            return Ok((0..entries.len()).collect());
        }
        debug!(
            rules = ?self.rule_names(),
            mode = ?self.mode,
            entries = entries.len(),
            "ranking patterns"
        );

        let scores: Vec<Vec<f64>> = entries
            .iter()
            .map(|entry| self.compute_scores(entry, ctx))
            .collect::<Result<_>>()?;

        let mut indices: Vec<usize> = (0..entries.len()).collect();
        indices.sort_by(|&a, &b| self.order(&scores[a], &scores[b], &entries[a], &entries[b]));
        Ok(indices)
    }

    /// The entries themselves, best-ranked first.
    pub fn rank<'e>(
        &self,
        entries: &'e [PatternEntry<O>],
        ctx: &RankContext<'_>,
    ) -> Result<Vec<&'e PatternEntry<O>>> {
        Ok(self
            .sort_indices(entries, ctx)?
            .into_iter()
            .map(|i| &entries[i])
            .collect())
    }

    /// Position of the pattern that ranks first, or `None` for no entries.
    pub fn select_best(
        &self,
        entries: &[PatternEntry<O>],
        ctx: &RankContext<'_>,
    ) -> Result<Option<usize>> {
        Ok(self.sort_indices(entries, ctx)?.first().copied())
    }

    /// The pattern's headline score: the weighted sum, or in lexicographic
    /// mode the most significant rule's score (0 without rules).
    pub fn score(&self, entry: &PatternEntry<O>, ctx: &RankContext<'_>) -> Result<f64> {
        let scores = self.compute_scores(entry, ctx)?;
        Ok(scores.first().copied().unwrap_or(0.0))
    }
}

impl<O> Default for Ranker<O> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::{GateCostModel, UseBlockTable};
    use crate::error::RankError;
    use crate::pattern::{Occurrence, PatternCode};
    use crate::ranking::Metric;

    fn entry(tokens: &[i32], n: usize) -> PatternEntry<Occurrence> {
        let code = PatternCode::parse(tokens).unwrap();
        let len = code.operation_node_count() as u32;
        let occurrences = (0..n as u32)
            .map(|i| Occurrence::new((0..len).map(|v| i * len + v).collect()))
            .collect();
        PatternEntry::new(code, occurrences).unwrap()
    }

    fn test_entries() -> Vec<PatternEntry<Occurrence>> {
        vec![
            entry(&[1, 0, 0], 4),           // count 4, size 1
            entry(&[1, 3, 0, 0, 0], 2),     // count 2, size 2
            entry(&[3, 0, 0], 2),           // count 2, size 1
            entry(&[11, 1, 0, 0, 0, 0], 3), // count 3, size 2
        ]
    }

    /// Scores empty entries as NaN, everything else by count.
    struct NanWhenEmpty;

    impl PatternScore<Occurrence> for NanWhenEmpty {
        fn name(&self) -> &str {
            "NanWhenEmpty"
        }

        fn score(&self, entry: &PatternEntry<Occurrence>, _ctx: &RankContext<'_>) -> Result<f64> {
            if entry.is_empty() {
                Ok(f64::NAN)
            } else {
                Ok(entry.count() as f64)
            }
        }
    }

    #[test]
    fn test_single_rule_sort() {
        let model = GateCostModel::default();
        let ctx = RankContext::new(&model);
        let ranker = Ranker::new().with_rule(Metric::OccurrenceCount);
        let entries = test_entries();
        let ranked = ranker.rank(&entries, &ctx).unwrap();

        let counts: Vec<usize> = ranked.iter().map(|e| e.count()).collect();
        assert_eq!(counts, vec![2, 2, 3, 4]);
    }

    #[test]
    fn test_sequential_tie_breaking() {
        // Entries 1 and 2 both have count 2; PatternSize breaks the tie
        let model = GateCostModel::default();
        let ctx = RankContext::new(&model);
        let ranker = Ranker::new()
            .with_rule(Metric::OccurrenceCount)
            .with_rule(Metric::PatternSize);
        let indices = ranker.sort_indices(&test_entries(), &ctx).unwrap();
        assert_eq!(indices, vec![2, 1, 3, 0]);
    }

    #[test]
    fn test_descending_reverses_everything() {
        let model = GateCostModel::default();
        let ctx = RankContext::new(&model);
        let ranker = Ranker::new()
            .with_rule(Metric::OccurrenceCount)
            .with_rule(Metric::PatternSize)
            .with_direction(false);
        let indices = ranker.sort_indices(&test_entries(), &ctx).unwrap();
        assert_eq!(indices, vec![0, 3, 1, 2]);
    }

    #[test]
    fn test_weighted_mode() {
        let model = GateCostModel::default();
        let ctx = RankContext::new(&model);
        let ranker = Ranker::new()
            .with_mode(EvaluationMode::Weighted)
            .with_weighted_rule(Metric::OccurrenceCount, 1.0)
            .with_weighted_rule(Metric::PatternSize, 3.0);
        let entries = test_entries();

        // Weighted score = count + 3 * size: 7, 8, 5, 9
        let scores: Vec<f64> = entries
            .iter()
            .map(|e| ranker.score(e, &ctx).unwrap())
            .collect();
        assert_eq!(scores, vec![7.0, 8.0, 5.0, 9.0]);
        assert_eq!(ranker.sort_indices(&entries, &ctx).unwrap(), vec![2, 0, 1, 3]);
    }

    #[test]
    fn test_select_best() {
        let model = GateCostModel::default();
        let ctx = RankContext::new(&model);
        let ranker = Ranker::new()
            .with_rule(Metric::OccurrenceCount)
            .with_direction(Direction::Descending);
        let best = ranker.select_best(&test_entries(), &ctx).unwrap();
        assert_eq!(best, Some(0));
    }

    #[test]
    fn test_select_best_empty() {
        let model = GateCostModel::default();
        let ctx = RankContext::new(&model);
        let ranker = Ranker::<Occurrence>::new().with_rule(Metric::Profit);
        assert!(ranker.select_best(&[], &ctx).unwrap().is_none());
    }

    #[test]
    fn test_no_rules() {
        let model = GateCostModel::default();
        let ctx = RankContext::new(&model);
        let ranker = Ranker::<Occurrence>::new();
        let indices = ranker.sort_indices(&test_entries(), &ctx).unwrap();

        // Without rules, preserve original order
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_rule_names() {
        let ranker = Ranker::<Occurrence>::new()
            .with_rule(Metric::Profit)
            .with_rule(Metric::PatternSize);

        assert_eq!(ranker.rule_names(), vec!["Profit", "PatternSize"]);
        assert_eq!(ranker.rule_count(), 2);
    }

    #[test]
    fn test_by_code_tie_breaker() {
        let model = GateCostModel::default();
        let ctx = RankContext::new(&model);
        let entries = vec![entry(&[3, 0, 0], 1), entry(&[2, 0, 0], 1), entry(&[1, 0, 0], 1)];
        let ranker = Ranker::new()
            .with_rule(Metric::OccurrenceCount)
            .with_tie_breaker(TieBreaker::ByCode);
        assert_eq!(ranker.sort_indices(&entries, &ctx).unwrap(), vec![2, 1, 0]);
    }

    #[test]
    fn test_missing_metadata_propagates() {
        let model = GateCostModel::default();
        let table = UseBlockTable::new();
        let ctx = RankContext::new(&model).with_use_blocks(&table);
        let ranker = Ranker::new()
            .with_rule(Metric::OccurrenceCount)
            .with_rule(Metric::UseBlockProfit);
        let err = ranker.sort_indices(&test_entries(), &ctx).unwrap_err();
        assert!(matches!(err, RankError::MissingCostMetadata { .. }));
    }

    #[test]
    fn test_non_finite_scores_sort_last() {
        let model = GateCostModel::default();
        let ctx = RankContext::new(&model);
        let entries = vec![entry(&[1, 0, 0], 0), entry(&[3, 0, 0], 3), entry(&[2, 0, 0], 1)];

        let sequential = Ranker::new().with_rule(NanWhenEmpty);
        assert_eq!(sequential.sort_indices(&entries, &ctx).unwrap(), vec![2, 1, 0]);

        let weighted = Ranker::new()
            .with_mode(EvaluationMode::Weighted)
            .with_weighted_rule(NanWhenEmpty, 2.0);
        assert!(weighted.score(&entries[0], &ctx).unwrap().is_nan());
        assert_eq!(weighted.sort_indices(&entries, &ctx).unwrap(), vec![2, 1, 0]);
    }

    #[test]
    fn test_compare_matches_sort() {
        let model = GateCostModel::default();
        let ctx = RankContext::new(&model);
        let ranker = Ranker::new()
            .with_rule(Metric::Profit)
            .with_rule(Metric::OccurrenceCount);
        let entries = test_entries();
        let ranked = ranker.rank(&entries, &ctx).unwrap();
        for pair in ranked.windows(2) {
            assert_ne!(
                ranker.compare(pair[0], pair[1], &ctx).unwrap(),
                Ordering::Greater
            );
        }
    }
}
