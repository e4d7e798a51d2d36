//! The built-in scoring strategies.

use super::types::{compare_scores, Direction, PatternScore, RankContext};
use crate::cost::{
    operation_node_count, pattern_emulation_profit, pattern_occurrence_cost, pattern_profit,
    pattern_profit_state, CostModel,
};
use crate::error::Result;
use crate::pattern::{Embedding, OutputState, PatternEntry, StateMultiOutput, StateSingleOutput};
use std::cmp::Ordering;
use tracing::debug;

/// Strategy tag for the occurrence-based rules.
///
/// Works for any collection element implementing [`Embedding`], so state
/// entries can be ranked by count or size too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Metric {
    /// Primitive-operator cost at the stored multiplicity.
    OccurrenceCost,

    /// Primitive cost minus emulation cost, times multiplicity.
    ///
    /// Needs the emulation table; a missing entry is an error.
    EmulationProfit,

    /// Raw multiplicity.
    OccurrenceCount,

    /// Length of the first occurrence, or the operation-node count when
    /// there are none.
    PatternSize,

    /// Dedicated-block profit under the primitive-cost model.
    Profit,

    /// The precomputed profit of the decided block usage.
    ///
    /// Needs the use-block table; a missing entry is an error.
    UseBlockProfit,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::OccurrenceCost,
        Metric::EmulationProfit,
        Metric::OccurrenceCount,
        Metric::PatternSize,
        Metric::Profit,
        Metric::UseBlockProfit,
    ];
}

impl<O: Embedding> PatternScore<O> for Metric {
    fn name(&self) -> &str {
        match self {
            Metric::OccurrenceCost => "OccurrenceCost",
            Metric::EmulationProfit => "EmulationProfit",
            Metric::OccurrenceCount => "OccurrenceCount",
            Metric::PatternSize => "PatternSize",
            Metric::Profit => "Profit",
            Metric::UseBlockProfit => "UseBlockProfit",
        }
    }

    fn score(&self, entry: &PatternEntry<O>, ctx: &RankContext<'_>) -> Result<f64> {
        let code = entry.code();
        let score = match self {
            Metric::OccurrenceCost => pattern_occurrence_cost(ctx.model(), code, entry.count()),
            Metric::EmulationProfit => {
                let block = ctx.emulation_block(code).inspect_err(|e| {
                    debug!(pattern = %code, error = %e, "emulation profit unavailable");
                })?;
                pattern_emulation_profit(ctx.model(), code, block, entry.count())
            }
            Metric::OccurrenceCount => entry.count() as f64,
            Metric::PatternSize => match entry.occurrences().first() {
                Some(first) => first.vertices().len() as f64,
                None => operation_node_count(code) as f64,
            },
            Metric::Profit => pattern_profit(ctx.model(), code, entry.occurrences()),
            Metric::UseBlockProfit => {
                let usage = ctx.use_block(code).inspect_err(|e| {
                    debug!(pattern = %code, error = %e, "use-block profit unavailable");
                })?;
                usage.profit
            }
        };
        Ok(score)
    }
}

/// Wiring-aware profit over single-output state descriptors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SingleOutputProfit;

impl PatternScore<StateSingleOutput> for SingleOutputProfit {
    fn name(&self) -> &str {
        "SingleOutputProfit"
    }

    fn score(&self, entry: &PatternEntry<StateSingleOutput>, ctx: &RankContext<'_>) -> Result<f64> {
        Ok(pattern_profit_state(ctx.model(), entry.code(), entry.occurrences()))
    }
}

/// Wiring-aware profit over multi-output state descriptors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MultiOutputProfit;

impl PatternScore<StateMultiOutput> for MultiOutputProfit {
    fn name(&self) -> &str {
        "MultiOutputProfit"
    }

    fn score(&self, entry: &PatternEntry<StateMultiOutput>, ctx: &RankContext<'_>) -> Result<f64> {
        Ok(pattern_profit_state(ctx.model(), entry.code(), entry.occurrences()))
    }
}

/// State-profit comparison that evaluates *both* patterns against `b`'s
/// state collection.
///
/// Reproduces the ordering of an older ranking pass for regression
/// comparisons. It is not a valid sort order (it can disagree with itself
/// when the arguments are swapped), so no sorting API uses it; rank with
/// [`SingleOutputProfit`] or [`MultiOutputProfit`] instead.
pub fn compare_state_profit_mirrored<M, S>(
    a: &PatternEntry<S>,
    b: &PatternEntry<S>,
    model: &M,
    direction: Direction,
) -> Ordering
where
    M: CostModel + ?Sized,
    S: OutputState,
{
    let pa = pattern_profit_state(model, a.code(), b.occurrences());
    let pb = pattern_profit_state(model, b.code(), b.occurrences());
    direction.apply(compare_scores(pa, pb))
}
