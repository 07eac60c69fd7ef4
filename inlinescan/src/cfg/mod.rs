//! Control-flow graph store for a single function.
//!
//! The store owns every [`BlockDef`] of one function's CFG and keeps the
//! successor/predecessor lists consistent in both directions. Blocks carry a
//! fingerprint context computed when they are inserted; nothing else is
//! mutated after insertion.
//!
//! Building the graph is an external concern: a [`CfgSource`] hands the store
//! raw block records, the way a disassembler frontend would.

mod source;
mod store;
mod types;

pub use source::{BuildError, CfgSource, RawBlock};
pub use store::CfgStore;
pub use types::{BlockContext, BlockDef};

#[cfg(test)]
mod tests;
