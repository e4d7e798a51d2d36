//! Cost/profit scoring and ranking of mined arithmetic-circuit patterns.
//!
//! A pattern miner finds recurring subgraph shapes in a circuit and lists
//! their occurrences. This crate estimates what specializing each pattern
//! would save in hardware cost and orders the candidates, so a replacement
//! engine can consume them as a greedy worklist.
//!
//! - **Pattern**: canonical pattern codes, occurrences, output-state
//!   descriptors, and the entries being ranked.
//! - **Cost**: a pluggable per-occurrence cost model and the evaluation
//!   functions (occurrence cost, profit, emulation cost, wiring-aware profit).
//! - **Ranking**: eight scoring strategies, a single-rule comparator with
//!   direction and tie-breaking, and a multi-rule engine.
//!
//! # Example
//!
//! ```
//! use pattern_rank::cost::GateCostModel;
//! use pattern_rank::pattern::{Occurrence, PatternCode, PatternTable};
//! use pattern_rank::ranking::{Metric, PatternOrder, RankContext};
//!
//! let mut table = PatternTable::new();
//! let mac = PatternCode::parse(&[1, 3, 0, 0, 0]).unwrap(); // a * b + c
//! let add = PatternCode::parse(&[1, 0, 0]).unwrap();       // a + b
//! for v in 0..8 {
//!     table.insert(mac.clone(), Occurrence::new(vec![2 * v, 2 * v + 1]));
//!     table.insert(add.clone(), Occurrence::new(vec![100 + v]));
//! }
//!
//! let model = GateCostModel::default();
//! let ctx = RankContext::new(&model);
//! let worklist = table.rank(&PatternOrder::descending(Metric::Profit), &ctx).unwrap();
//! assert_eq!(worklist[0].code(), &mac);
//! ```
//!
//! This crate never modifies the circuit and does not judge whether a
//! pattern is valid; it only compares candidates that already exist.

pub mod cost;
pub mod error;
pub mod pattern;
pub mod ranking;

pub use error::{RankError, Result, SideTable};
