//! Canonical pattern encoding.

use crate::error::{RankError, Result};
use std::fmt;
use std::sync::Arc;

/// Token for a primary-input leaf.
pub const LEAF: i32 = 0;

/// Primitive arithmetic/logic operators a pattern is built from.
///
/// Each operator has a fixed positive tag used in [`PatternCode`] tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Neg,
    Shl,
    Shr,
    And,
    Or,
    Xor,
    Not,
    /// Two-way multiplexer: `sel ? a : b`.
    Mux,
    /// Less-than comparison.
    Lt,
}

impl Operator {
    /// Every operator, in tag order.
    pub const ALL: [Operator; 12] = [
        Operator::Add,
        Operator::Sub,
        Operator::Mul,
        Operator::Neg,
        Operator::Shl,
        Operator::Shr,
        Operator::And,
        Operator::Or,
        Operator::Xor,
        Operator::Not,
        Operator::Mux,
        Operator::Lt,
    ];

    /// Returns the operator for a positive token, if the tag is known.
    pub fn from_tag(tag: i32) -> Option<Self> {
        if tag < 1 {
            return None;
        }
        Self::ALL.get((tag - 1) as usize).copied()
    }

    /// The positive token encoding this operator.
    pub fn tag(self) -> i32 {
        self as i32 + 1
    }

    /// Number of operands.
    pub fn arity(self) -> usize {
        match self {
            Operator::Neg | Operator::Not => 1,
            Operator::Mux => 3,
            _ => 2,
        }
    }
}

/// Immutable canonical encoding of a pattern's shape.
///
/// Tokens are read in pre-order:
///
/// - `0` ([`LEAF`]) is a primary input of the pattern,
/// - a positive token is an [`Operator`] tag followed by its operands,
/// - a negative token `-k` refers back to the `k`-th operation node
///   (1-based, pre-order), which must already be complete. This is how
///   shared sub-expressions are expressed.
///
/// Equality, hashing and ordering are by content, so codes work as map
/// keys no matter where the tokens came from. Cloning is a reference
/// count bump.
///
/// # Examples
///
/// ```
/// use pattern_rank::pattern::PatternCode;
///
/// // (a + b) * (a + b), sharing the adder: Mul(Add(a, b), #2)
/// let code = PatternCode::parse(&[3, 1, 0, 0, -2]).unwrap();
/// assert_eq!(code.operation_node_count(), 2);
/// assert_eq!(code.leaf_count(), 2);
/// assert_eq!(code.reference_count(), 1);
/// ```
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<i32>", into = "Vec<i32>")
)]
pub struct PatternCode(Arc<[i32]>);

impl PatternCode {
    /// Validates `tokens` and wraps them as a pattern code.
    pub fn parse(tokens: &[i32]) -> Result<Self> {
        validate_tokens(tokens)?;
        Ok(Self(Arc::from(tokens)))
    }

    /// The raw token sequence.
    pub fn tokens(&self) -> &[i32] {
        &self.0
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`: a valid code has at least one operation node.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of internal (operation) nodes.
    pub fn operation_node_count(&self) -> usize {
        self.0.iter().filter(|&&t| t > LEAF).count()
    }

    /// Number of primary-input leaves.
    pub fn leaf_count(&self) -> usize {
        self.0.iter().filter(|&&t| t == LEAF).count()
    }

    /// Number of back-references to shared operation nodes.
    pub fn reference_count(&self) -> usize {
        self.0.iter().filter(|&&t| t < LEAF).count()
    }

    /// Operation nodes in pre-order.
    pub fn operators(&self) -> impl Iterator<Item = Operator> + '_ {
        self.0.iter().filter_map(|&t| Operator::from_tag(t))
    }
}

impl fmt::Debug for PatternCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PatternCode({:?})", &self.0[..])
    }
}

impl fmt::Display for PatternCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", &self.0[..])
    }
}

impl TryFrom<Vec<i32>> for PatternCode {
    type Error = RankError;

    fn try_from(tokens: Vec<i32>) -> Result<Self> {
        validate_tokens(&tokens)?;
        Ok(Self(Arc::from(tokens)))
    }
}

impl From<PatternCode> for Vec<i32> {
    fn from(code: PatternCode) -> Self {
        code.0.to_vec()
    }
}

fn malformed(position: usize, reason: impl Into<String>) -> RankError {
    RankError::MalformedPattern {
        position,
        reason: reason.into(),
    }
}

fn validate_tokens(tokens: &[i32]) -> Result<()> {
    if tokens.is_empty() {
        return Err(malformed(0, "empty token sequence"));
    }

    // (node number, operands still expected)
    let mut pending: Vec<(usize, usize)> = Vec::new();
    let mut completed: Vec<bool> = Vec::new();
    let mut root_done = false;

    for (pos, &token) in tokens.iter().enumerate() {
        if root_done {
            return Err(malformed(pos, "trailing tokens after the root expression"));
        }

        if token > LEAF {
            let op = Operator::from_tag(token)
                .ok_or_else(|| malformed(pos, format!("unknown operator tag {token}")))?;
            completed.push(false);
            pending.push((completed.len(), op.arity()));
            continue;
        }

        if token == LEAF {
            if pos == 0 {
                return Err(malformed(0, "pattern has no operation node"));
            }
        } else {
            let target = token.unsigned_abs() as usize;
            if target > completed.len() {
                return Err(malformed(
                    pos,
                    format!("reference to node {target}, only {} exist", completed.len()),
                ));
            }
            if !completed[target - 1] {
                return Err(malformed(
                    pos,
                    format!("reference to node {target} before it is complete"),
                ));
            }
        }

        // A leaf or reference finished one operand; close every node it completes.
        loop {
            match pending.last_mut() {
                None => {
                    root_done = true;
                    break;
                }
                Some((node, remaining)) => {
                    *remaining -= 1;
                    if *remaining > 0 {
                        break;
                    }
                    completed[*node - 1] = true;
                    pending.pop();
                    if pending.is_empty() {
                        root_done = true;
                        break;
                    }
                }
            }
        }
    }

    if !root_done {
        return Err(malformed(tokens.len(), "truncated: operands missing"));
    }
    Ok(())
}
