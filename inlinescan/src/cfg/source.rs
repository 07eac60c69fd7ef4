use std::fmt;

/// A block record as delivered by a CFG frontend, before fingerprinting.
#[derive(Debug, Clone, Default)]
pub struct RawBlock {
    /// Block id; dense small non-negative integers.
    pub id: u32,
    /// Start address (inclusive).
    pub start: u64,
    /// End address (exclusive).
    pub end: u64,
    /// Display label.
    pub label: Option<String>,
    /// Successor ids. Must reference declared blocks only.
    pub succs: Vec<u32>,
    /// Predecessor ids. Must reference declared blocks only.
    pub preds: Vec<u32>,
    /// Raw bytes of the block, when the frontend has them.
    pub bytes: Option<Vec<u8>>,
}

/// Produces the basic blocks of the function containing `entry`.
///
/// The record for the block containing `entry` must be present; edge lists
/// may name any declared block. A failure here is propagated to the caller
/// unchanged; no partial graph is built.
pub trait CfgSource {
    /// Enumerate the function's blocks.
    fn build_cfg(&self, entry: u64) -> Result<Vec<RawBlock>, BuildError>;
}

/// Failure to build a function's CFG.
#[derive(Debug)]
pub enum BuildError {
    /// No function covers the requested entry address.
    NoFunctionAt(u64),
    /// An edge references a block id that was never declared.
    UnknownBlock(u32),
    /// Frontend-specific failure.
    Frontend(String),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoFunctionAt(addr) => write!(f, "no function at {addr:#x}"),
            Self::UnknownBlock(id) => write!(f, "edge references undeclared block {id}"),
            Self::Frontend(msg) => write!(f, "CFG frontend error: {msg}"),
        }
    }
}

impl std::error::Error for BuildError {}
