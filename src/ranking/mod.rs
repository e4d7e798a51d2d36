//! Comparator strategies for ordering mined patterns.
//!
//! Every strategy is a [`PatternScore`] rule: a pure function from an entry
//! (plus a read-only [`RankContext`]) to a scalar. A [`PatternOrder`] turns
//! one rule into a three-way comparator with a [`Direction`] and a
//! [`TieBreaker`]; a [`Ranker`] combines several rules.
//!
//! # Strategies
//!
//! | Rule | Score |
//! |---|---|
//! | [`Metric::OccurrenceCost`] | primitive cost at the stored multiplicity |
//! | [`Metric::EmulationProfit`] | (primitive − emulation) × multiplicity |
//! | [`Metric::OccurrenceCount`] | multiplicity |
//! | [`Metric::PatternSize`] | first occurrence length, else operation-node count |
//! | [`Metric::Profit`] | (primitive − specialized) × multiplicity |
//! | [`SingleOutputProfit`] | wiring-aware profit, single-output states |
//! | [`MultiOutputProfit`] | wiring-aware profit, multi-output states |
//! | [`Metric::UseBlockProfit`] | precomputed [`UseBlock`](crate::cost::UseBlock) profit |
//!
//! Empty collections never fail: they score 0 (size falls back to the
//! pattern's structure). Missing side-table entries always fail.
//!
//! # Concurrency
//!
//! Rules and comparators hold no mutable state. Independent sorts may run
//! on separate threads as long as the side tables behind the context are
//! not modified meanwhile, which the shared borrows in [`RankContext`]
//! enforce.

mod engine;
mod metric;
mod order;
mod types;

pub use engine::{EvaluationMode, Ranker};
pub use metric::{compare_state_profit_mirrored, Metric, MultiOutputProfit, SingleOutputProfit};
pub use order::PatternOrder;
pub use types::{Direction, PatternScore, RankContext, TieBreaker};
