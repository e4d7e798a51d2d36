//! Single-rule comparator and sorting.

use super::types::{
    compare_scores, score_logged, Direction, PatternScore, RankContext, TieBreaker,
};
use crate::error::Result;
use crate::pattern::{Embedding, PatternEntry, PatternTable};
use std::cmp::Ordering;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Orders pattern entries by one scoring rule.
///
/// The comparator holds only the rule, the direction and the tie-breaker;
/// cost model and side tables come in through a [`RankContext`] at sort
/// time. Descending is the exact inverse of ascending for every pair,
/// including tie-broken pairs.
///
/// # Examples
///
/// ```
/// use pattern_rank::cost::GateCostModel;
/// use pattern_rank::pattern::{Occurrence, PatternCode, PatternEntry};
/// use pattern_rank::ranking::{Metric, PatternOrder, RankContext};
///
/// let model = GateCostModel::default();
/// let ctx = RankContext::new(&model);
///
/// let add = PatternCode::parse(&[1, 0, 0]).unwrap();
/// let mac = PatternCode::parse(&[1, 3, 0, 0, 0]).unwrap();
/// let mut entries = vec![
///     PatternEntry::new(add, vec![Occurrence::new(vec![1]); 50]).unwrap(),
///     PatternEntry::new(mac.clone(), vec![Occurrence::new(vec![2, 3]); 10]).unwrap(),
/// ];
///
/// // Most profitable first: the adder alone never pays for its own block.
/// PatternOrder::descending(Metric::Profit).sort(&mut entries, &ctx).unwrap();
/// assert_eq!(entries[0].code(), &mac);
/// ```
#[derive(Debug, Clone)]
pub struct PatternOrder<R> {
    rule: R,
    direction: Direction,
    tie_breaker: TieBreaker,
    parallel: bool,
}

impl<R> PatternOrder<R> {
    /// Creates an ascending comparator that preserves input order on ties.
    pub fn new(rule: R) -> Self {
        Self {
            rule,
            direction: Direction::Ascending,
            tie_breaker: TieBreaker::PreserveOrder,
            parallel: false,
        }
    }

    pub fn ascending(rule: R) -> Self {
        Self::new(rule)
    }

    pub fn descending(rule: R) -> Self {
        Self::new(rule).with_direction(Direction::Descending)
    }

    /// Sets the direction; `true` means ascending.
    pub fn with_direction(mut self, direction: impl Into<Direction>) -> Self {
        self.direction = direction.into();
        self
    }

    pub fn with_tie_breaker(mut self, tb: TieBreaker) -> Self {
        self.tie_breaker = tb;
        self
    }

    /// Computes scores on the rayon pool (requires the `parallel` feature;
    /// ignored otherwise).
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// The same comparator with the opposite direction.
    pub fn reversed(mut self) -> Self {
        self.direction = self.direction.reverse();
        self
    }

    pub fn rule(&self) -> &R {
        &self.rule
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn tie_breaker(&self) -> TieBreaker {
        self.tie_breaker
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    fn order<O>(&self, sa: f64, sb: f64, a: &PatternEntry<O>, b: &PatternEntry<O>) -> Ordering {
        let ascending = compare_scores(sa, sb).then_with(|| self.tie_breaker.compare(a, b));
        self.direction.apply(ascending)
    }

    /// Three-way comparison of two entries.
    pub fn compare<O>(
        &self,
        a: &PatternEntry<O>,
        b: &PatternEntry<O>,
        ctx: &RankContext<'_>,
    ) -> Result<Ordering>
    where
        R: PatternScore<O>,
    {
        let sa = self.rule.score(a, ctx)?;
        let sb = self.rule.score(b, ctx)?;
        Ok(self.order(sa, sb, a, b))
    }

    /// [`compare`](Self::compare) as a negative/zero/positive integer.
    pub fn compare_sign<O>(
        &self,
        a: &PatternEntry<O>,
        b: &PatternEntry<O>,
        ctx: &RankContext<'_>,
    ) -> Result<i32>
    where
        R: PatternScore<O>,
    {
        Ok(self.compare(a, b, ctx)? as i32)
    }

    /// Scores every entry, failing on the first entry that cannot be scored.
    pub fn scores<O: Sync>(
        &self,
        entries: &[PatternEntry<O>],
        ctx: &RankContext<'_>,
    ) -> Result<Vec<f64>>
    where
        R: PatternScore<O>,
    {
        #[cfg(feature = "parallel")]
        {
            if self.parallel {
                return entries
                    .par_iter()
                    .map(|entry| self.score_one(entry, ctx))
                    .collect();
            }
        }

        entries
            .iter()
            .map(|entry| self.score_one(entry, ctx))
            .collect()
    }

    fn score_one<O>(&self, entry: &PatternEntry<O>, ctx: &RankContext<'_>) -> Result<f64>
    where
        R: PatternScore<O>,
    {
        score_logged(&self.rule, entry, ctx)
    }

    /// Returns indices into `entries` in ranked order.
    ///
    /// Every entry is scored once up front; nothing is reordered if any
    /// score fails.
    pub fn sort_indices<O: Sync>(
        &self,
        entries: &[PatternEntry<O>],
        ctx: &RankContext<'_>,
    ) -> Result<Vec<usize>>
    where
        R: PatternScore<O>,
    {
        debug!(
            rule = self.rule.name(),
            entries = entries.len(),
            direction = ?self.direction,
            "ranking patterns"
        );
        let scores = self.scores(entries, ctx)?;

        let mut indices: Vec<usize> = (0..entries.len()).collect();
        indices.sort_by(|&a, &b| self.order(scores[a], scores[b], &entries[a], &entries[b]));
        Ok(indices)
    }

    /// Sorts `entries` in place.
    pub fn sort<O: Sync>(
        &self,
        entries: &mut Vec<PatternEntry<O>>,
        ctx: &RankContext<'_>,
    ) -> Result<()>
    where
        R: PatternScore<O>,
    {
        let order = self.sort_indices(entries, ctx)?;
        let mut slots: Vec<Option<PatternEntry<O>>> = entries.drain(..).map(Some).collect();
        entries.extend(order.into_iter().filter_map(|i| slots[i].take()));
        Ok(())
    }

    /// Returns references to `entries` in ranked order.
    pub fn rank<'e, O: Sync>(
        &self,
        entries: &'e [PatternEntry<O>],
        ctx: &RankContext<'_>,
    ) -> Result<Vec<&'e PatternEntry<O>>>
    where
        R: PatternScore<O>,
    {
        Ok(self
            .sort_indices(entries, ctx)?
            .into_iter()
            .map(|i| &entries[i])
            .collect())
    }

    /// Index of the first entry in ranked order, `None` if `entries` is empty.
    pub fn select_best<O: Sync>(
        &self,
        entries: &[PatternEntry<O>],
        ctx: &RankContext<'_>,
    ) -> Result<Option<usize>>
    where
        R: PatternScore<O>,
    {
        let scores = self.scores(entries, ctx)?;
        Ok((0..entries.len())
            .min_by(|&a, &b| self.order(scores[a], scores[b], &entries[a], &entries[b])))
    }
}

impl<O: Embedding + Clone> PatternTable<O> {
    /// Materializes this table's entries and sorts them with `order`.
    pub fn rank<R: PatternScore<O>>(
        &self,
        order: &PatternOrder<R>,
        ctx: &RankContext<'_>,
    ) -> Result<Vec<PatternEntry<O>>> {
        let mut entries = self.entries()?;
        order.sort(&mut entries, ctx)?;
        Ok(entries)
    }
}
