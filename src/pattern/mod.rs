//! Pattern codes, occurrences, and the entries being ranked.
//!
//! Everything here is produced upstream (by the miner and the
//! output-state pass) and only read by the cost and ranking modules.
//!
//! # Key Types
//!
//! - [`PatternCode`]: canonical, content-keyed encoding of a pattern shape
//! - [`Occurrence`]: one embedding of a pattern in the circuit
//! - [`StateSingleOutput`] / [`StateMultiOutput`]: wiring-aware descriptors
//! - [`PatternEntry`]: a pattern with its collection, the unit being ranked
//! - [`PatternTable`]: pattern → collection map as delivered by the miner

mod code;
mod entry;
mod occurrence;

pub use code::{Operator, PatternCode, LEAF};
pub use entry::{PatternEntry, PatternTable};
pub use occurrence::{
    Embedding, Occurrence, OutputState, StateMultiOutput, StateSingleOutput, VertexId,
};
