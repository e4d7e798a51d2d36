//! The cost-model seam and the default gate-level model.

use super::blocks::EmulatableBlock;
use super::config::CostConfig;
use crate::error::Result;
use crate::pattern::PatternCode;

/// Per-occurrence hardware costs of a pattern.
///
/// The evaluation functions in [`cost`](crate::cost) scale and combine
/// these; implementors only describe a single occurrence. Every method
/// must be pure and return finite, non-negative values.
///
/// # Examples
///
/// ```ignore
/// // Fixed costs from an external synthesis report
/// struct Reported(HashMap<PatternCode, (f64, f64)>);
///
/// impl CostModel for Reported {
///     fn primitive_cost(&self, code: &PatternCode) -> f64 { self.0[code].0 }
///     fn specialized_cost(&self, code: &PatternCode) -> f64 { self.0[code].1 }
///     fn emulation_cost(&self, block: &EmulatableBlock) -> f64 { self.0[&block.host].1 }
///     fn output_port_cost(&self) -> f64 { 0.5 }
/// }
/// ```
pub trait CostModel: Send + Sync {
    /// Cost of one occurrence built from primitive operators.
    fn primitive_cost(&self, code: &PatternCode) -> f64;

    /// Cost of one occurrence realized as a single dedicated block.
    fn specialized_cost(&self, code: &PatternCode) -> f64;

    /// Cost of one occurrence realized by reusing `block`.
    fn emulation_cost(&self, block: &EmulatableBlock) -> f64;

    /// Wiring cost of each block output beyond the first.
    fn output_port_cost(&self) -> f64;
}

/// Gate-level cost model driven by a [`CostConfig`].
///
/// - primitive: sum of operator costs over the operation nodes
/// - specialized: `block_overhead + fusion_ratio * primitive + input_port_cost * leaves`
/// - emulation: the host's fused datapath and ports plus tied inputs, without
///   `block_overhead` since the host block already exists
///
/// Shared sub-expressions (back-references) are free: the node they point
/// to is already counted once.
#[derive(Debug, Clone)]
pub struct GateCostModel {
    config: CostConfig,
}

impl GateCostModel {
    /// Creates a model after validating `config`.
    pub fn new(config: CostConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CostConfig {
        &self.config
    }

    fn fused_datapath(&self, code: &PatternCode) -> f64 {
        self.config.fusion_ratio * self.primitive_cost(code)
            + self.config.input_port_cost * code.leaf_count() as f64
    }
}

impl Default for GateCostModel {
    fn default() -> Self {
        Self {
            config: CostConfig::default(),
        }
    }
}

impl CostModel for GateCostModel {
    fn primitive_cost(&self, code: &PatternCode) -> f64 {
        code.operators().map(|op| self.config.operator_cost(op)).sum()
    }

    fn specialized_cost(&self, code: &PatternCode) -> f64 {
        self.config.block_overhead + self.fused_datapath(code)
    }

    fn emulation_cost(&self, block: &EmulatableBlock) -> f64 {
        self.fused_datapath(&block.host) + self.config.tied_input_cost * block.tied_inputs as f64
    }

    fn output_port_cost(&self) -> f64 {
        self.config.output_port_cost
    }
}
