//! Emulation and block-usage metadata produced by the emulation pass.

use crate::pattern::PatternCode;
use std::collections::HashMap;

/// An existing block that can compute a pattern when some of its inputs
/// are tied to constants.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EmulatableBlock {
    /// The block's own pattern.
    pub host: PatternCode,
    /// Host inputs tied to constants to specialize it to the pattern.
    pub tied_inputs: usize,
}

impl EmulatableBlock {
    pub fn new(host: PatternCode, tied_inputs: usize) -> Self {
        Self { host, tied_inputs }
    }
}

/// A decided block usage with its precomputed profit.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UseBlock {
    pub host: PatternCode,
    pub profit: f64,
}

impl UseBlock {
    pub fn new(host: PatternCode, profit: f64) -> Self {
        Self { host, profit }
    }
}

/// Pattern → block able to emulate it.
pub type EmulationTable = HashMap<PatternCode, EmulatableBlock>;

/// Pattern → decided block usage.
pub type UseBlockTable = HashMap<PatternCode, UseBlock>;
