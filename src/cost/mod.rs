//! Hardware cost and profit evaluation.
//!
//! The [`CostModel`] trait describes a single occurrence of a pattern; the
//! evaluation functions scale it by multiplicity and combine it into the
//! costs and profits the ranking rules compare.
//!
//! # Evaluation functions
//!
//! - [`pattern_occurrence_cost`]: `n` occurrences built from primitives
//! - [`pattern_profit`]: saving of one dedicated block type, times multiplicity
//! - [`pattern_block_cost`]: `n` occurrences through an existing emulating block
//! - [`pattern_emulation_profit`]: primitive cost minus emulation cost, times `n`
//! - [`pattern_profit_state`]: wiring-aware profit over output-state descriptors
//! - [`operation_node_count`]: structural size of a pattern

mod blocks;
mod config;
mod eval;
mod model;

pub use blocks::{EmulatableBlock, EmulationTable, UseBlock, UseBlockTable};
pub use config::CostConfig;
pub use eval::{
    operation_node_count, pattern_block_cost, pattern_emulation_profit, pattern_occurrence_cost,
    pattern_profit, pattern_profit_state,
};
pub use model::{CostModel, GateCostModel};
