//! Cost and profit evaluation functions.
//!
//! All functions are pure. Costs are never negative; profits are negative
//! when specializing a pattern does not pay off.

use super::blocks::EmulatableBlock;
use super::model::CostModel;
use crate::pattern::{OutputState, PatternCode};

/// Total cost of `n` occurrences built from primitive operators.
///
/// Non-decreasing in `n` for any model with non-negative costs.
pub fn pattern_occurrence_cost<M: CostModel + ?Sized>(
    model: &M,
    code: &PatternCode,
    n: usize,
) -> f64 {
    model.primitive_cost(code) * n as f64
}

/// Net saving of replacing every occurrence with one dedicated block type:
/// `(primitive - specialized) * occurrences.len()`.
///
/// # Example
///
/// ```
/// use pattern_rank::cost::{pattern_profit, GateCostModel};
/// use pattern_rank::pattern::{Occurrence, PatternCode};
///
/// let model = GateCostModel::default();
/// let mac = PatternCode::parse(&[1, 3, 0, 0, 0]).unwrap();
/// let occurrences = vec![Occurrence::new(vec![1, 2]); 10];
///
/// // (7.0 - 5.8) * 10
/// assert!((pattern_profit(&model, &mac, &occurrences) - 12.0).abs() < 1e-9);
/// ```
pub fn pattern_profit<M: CostModel + ?Sized, O>(
    model: &M,
    code: &PatternCode,
    occurrences: &[O],
) -> f64 {
    if occurrences.is_empty() {
        return 0.0;
    }
    let per_occurrence = model.primitive_cost(code) - model.specialized_cost(code);
    per_occurrence * occurrences.len() as f64
}

/// Cost of realizing `n` occurrences through an existing emulating block.
pub fn pattern_block_cost<M: CostModel + ?Sized>(
    model: &M,
    block: &EmulatableBlock,
    n: usize,
) -> f64 {
    model.emulation_cost(block) * n as f64
}

/// Saving of emulating `n` occurrences with `block` instead of building
/// them from primitives.
pub fn pattern_emulation_profit<M: CostModel + ?Sized>(
    model: &M,
    code: &PatternCode,
    block: &EmulatableBlock,
    n: usize,
) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let per_occurrence =
        pattern_occurrence_cost(model, code, 1) - pattern_block_cost(model, block, 1);
    per_occurrence * n as f64
}

/// Wiring-aware profit over output-state descriptors.
///
/// Each descriptor contributes `primitive - specialized` minus the port
/// cost of every output beyond the root. An empty collection scores 0.
pub fn pattern_profit_state<M: CostModel + ?Sized, S: OutputState>(
    model: &M,
    code: &PatternCode,
    states: &[S],
) -> f64 {
    if states.is_empty() {
        return 0.0;
    }
    let base = model.primitive_cost(code) - model.specialized_cost(code);
    let port = model.output_port_cost();
    states
        .iter()
        .map(|s| base - port * s.output_count().saturating_sub(1) as f64)
        .sum()
}

/// Number of operation nodes in `code`.
pub fn operation_node_count(code: &PatternCode) -> usize {
    code.operation_node_count()
}
