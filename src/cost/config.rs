//! Cost-model configuration.

use crate::error::{RankError, Result};
use crate::pattern::Operator;
use std::collections::BTreeMap;

/// Parameters of the gate-level cost model.
///
/// Costs are in relative area units (an adder is 1.0). All values must be
/// finite and non-negative; `fusion_ratio` must lie in `[0, 1]`.
///
/// # Examples
///
/// ```
/// use pattern_rank::cost::CostConfig;
/// use pattern_rank::pattern::Operator;
///
/// let config = CostConfig::default()
///     .with_operator_cost(Operator::Mul, 8.0)
///     .with_block_overhead(3.0)
///     .with_fusion_ratio(0.4);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.operator_cost(Operator::Mul), 8.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct CostConfig {
    /// Cost of one primitive instance of each operator.
    pub operator_costs: BTreeMap<Operator, f64>,

    /// Fixed cost of introducing a new dedicated block type.
    pub block_overhead: f64,

    /// Fraction of the primitive datapath cost a fused block still pays.
    ///
    /// Fusing removes intermediate registers and routing, so a dedicated
    /// block is cheaper than its parts. 1.0 means no saving.
    pub fusion_ratio: f64,

    /// Cost of each primary input port on a block.
    pub input_port_cost: f64,

    /// Cost of tying one input of an emulating block to a constant.
    pub tied_input_cost: f64,

    /// Cost of each block output beyond the first.
    pub output_port_cost: f64,
}

impl Default for CostConfig {
    fn default() -> Self {
        let operator_costs = Operator::ALL
            .iter()
            .map(|&op| (op, default_operator_cost(op)))
            .collect();
        Self {
            operator_costs,
            block_overhead: 2.0,
            fusion_ratio: 0.5,
            input_port_cost: 0.1,
            tied_input_cost: 0.05,
            output_port_cost: 0.5,
        }
    }
}

fn default_operator_cost(op: Operator) -> f64 {
    match op {
        Operator::Add | Operator::Sub | Operator::Lt => 1.0,
        Operator::Mul => 6.0,
        Operator::Neg | Operator::Xor => 0.5,
        Operator::Mux => 0.75,
        Operator::Shl | Operator::Shr | Operator::And | Operator::Or => 0.25,
        Operator::Not => 0.125,
    }
}

impl CostConfig {
    pub fn with_operator_cost(mut self, op: Operator, cost: f64) -> Self {
        self.operator_costs.insert(op, cost);
        self
    }

    pub fn with_block_overhead(mut self, cost: f64) -> Self {
        self.block_overhead = cost;
        self
    }

    pub fn with_fusion_ratio(mut self, ratio: f64) -> Self {
        self.fusion_ratio = ratio;
        self
    }

    pub fn with_input_port_cost(mut self, cost: f64) -> Self {
        self.input_port_cost = cost;
        self
    }

    pub fn with_tied_input_cost(mut self, cost: f64) -> Self {
        self.tied_input_cost = cost;
        self
    }

    pub fn with_output_port_cost(mut self, cost: f64) -> Self {
        self.output_port_cost = cost;
        self
    }

    /// Cost of one primitive `op`. Unconfigured operators cost nothing;
    /// [`validate`](Self::validate) rejects such configs.
    pub fn operator_cost(&self, op: Operator) -> f64 {
        self.operator_costs.get(&op).copied().unwrap_or(0.0)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        for op in Operator::ALL {
            match self.operator_costs.get(&op) {
                None => {
                    return Err(RankError::InvalidConfig(format!("no cost for operator {op:?}")))
                }
                Some(&cost) => check_cost(&format!("{op:?} cost"), cost)?,
            }
        }
        check_cost("block_overhead", self.block_overhead)?;
        check_cost("input_port_cost", self.input_port_cost)?;
        check_cost("tied_input_cost", self.tied_input_cost)?;
        check_cost("output_port_cost", self.output_port_cost)?;
        if !(0.0..=1.0).contains(&self.fusion_ratio) {
            return Err(RankError::InvalidConfig(format!(
                "fusion_ratio must be in [0, 1], got {}",
                self.fusion_ratio
            )));
        }
        Ok(())
    }
}

fn check_cost(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(RankError::InvalidConfig(format!(
            "{name} must be finite and non-negative, got {value}"
        )));
    }
    Ok(())
}
