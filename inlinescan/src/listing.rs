//! Declarative function listings.
//!
//! A listing is a JSON document describing one function: its blocks, the
//! decoded instructions of each block, and the successor edges. It is the
//! CLI's input format and doubles as a compact way to describe synthetic
//! functions in tests. A listing yields both sides of the matcher's seam:
//! a [`TableDecoder`] and a [`CfgSource`].

use std::fs;
use std::path::Path;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::cfg::{BuildError, CfgSource, RawBlock};
use crate::decode::{DecodedInsn, OperandSlot, TableDecoder};

/// One decoded instruction in a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingInsn {
    /// Instruction-type code.
    pub itype: u32,
    /// Present operands as `[index, kind]` pairs.
    #[serde(default)]
    pub ops: Vec<(u8, u8)>,
    /// Encoded size in bytes.
    pub size: u32,
}

/// One basic block in a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingBlock {
    /// Block id; dense small non-negative integers.
    pub id: u32,
    /// Start address.
    pub start: u64,
    /// End address; derived from the instruction sizes when omitted.
    #[serde(default)]
    pub end: Option<u64>,
    /// Display label.
    #[serde(default)]
    pub label: Option<CompactString>,
    /// Instructions from `start`, in address order.
    #[serde(default)]
    pub insns: Vec<ListingInsn>,
    /// Successor block ids. Predecessors are derived.
    #[serde(default)]
    pub succs: Vec<u32>,
    /// Raw bytes of the block.
    #[serde(default)]
    pub bytes: Option<Vec<u8>>,
}

impl ListingBlock {
    /// End address: explicit, or start plus the instruction sizes.
    #[must_use]
    pub fn end_addr(&self) -> u64 {
        self.end.unwrap_or_else(|| {
            self.start + self.insns.iter().map(|i| u64::from(i.size)).sum::<u64>()
        })
    }
}

/// A whole-function listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionListing {
    /// Function label.
    #[serde(default)]
    pub name: Option<CompactString>,
    /// Function entry address.
    pub entry: u64,
    /// The function's basic blocks.
    pub blocks: Vec<ListingBlock>,
}

/// Listing frontend failure.
#[derive(Debug)]
pub enum ListingError {
    /// Reading the listing file failed.
    Io(std::io::Error),
    /// The document is not valid listing JSON.
    Parse(serde_json::Error),
    /// Two blocks share an id.
    DuplicateBlock(u32),
    /// An edge references an undeclared block.
    UnknownBlock {
        /// Edge source.
        from: u32,
        /// Undeclared edge target.
        to: u32,
    },
    /// An instruction declares a zero size.
    ZeroSizeInsn {
        /// Block carrying the instruction.
        block: u32,
    },
}

impl std::fmt::Display for ListingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "cannot read listing: {e}"),
            Self::Parse(e) => write!(f, "invalid listing: {e}"),
            Self::DuplicateBlock(id) => write!(f, "duplicate block id {id}"),
            Self::UnknownBlock { from, to } => {
                write!(f, "block {from} links to undeclared block {to}")
            }
            Self::ZeroSizeInsn { block } => {
                write!(f, "block {block} declares a zero-size instruction")
            }
        }
    }
}

impl std::error::Error for ListingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl FunctionListing {
    /// Parse and validate a listing document.
    pub fn parse(input: &str) -> Result<Self, ListingError> {
        let listing: Self = serde_json::from_str(input).map_err(ListingError::Parse)?;
        listing.validate()?;
        Ok(listing)
    }

    /// Read, parse, and validate a listing file.
    pub fn from_path(path: &Path) -> Result<Self, ListingError> {
        let content = fs::read_to_string(path).map_err(ListingError::Io)?;
        Self::parse(&content)
    }

    fn validate(&self) -> Result<(), ListingError> {
        let mut seen = rustc_hash::FxHashSet::default();
        for block in &self.blocks {
            if !seen.insert(block.id) {
                return Err(ListingError::DuplicateBlock(block.id));
            }
            if block.insns.iter().any(|i| i.size == 0) {
                return Err(ListingError::ZeroSizeInsn { block: block.id });
            }
        }
        for block in &self.blocks {
            for &succ in &block.succs {
                if !seen.contains(&succ) {
                    return Err(ListingError::UnknownBlock {
                        from: block.id,
                        to: succ,
                    });
                }
            }
        }
        Ok(())
    }

    /// Decoder over every instruction the listing declares.
    #[must_use]
    pub fn decoder(&self) -> TableDecoder {
        let mut table = TableDecoder::new();
        for block in &self.blocks {
            let mut addr = block.start;
            for insn in &block.insns {
                table.insert(
                    addr,
                    DecodedInsn {
                        itype: insn.itype,
                        operands: insn
                            .ops
                            .iter()
                            .map(|&(index, kind)| OperandSlot { index, kind })
                            .collect(),
                        size: insn.size,
                    },
                );
                addr += u64::from(insn.size);
            }
        }
        table
    }
}

impl CfgSource for FunctionListing {
    fn build_cfg(&self, entry: u64) -> Result<Vec<RawBlock>, BuildError> {
        if !self.blocks.is_empty()
            && !self
                .blocks
                .iter()
                .any(|b| b.start <= entry && entry < b.end_addr().max(b.start + 1))
        {
            return Err(BuildError::NoFunctionAt(entry));
        }
        Ok(self
            .blocks
            .iter()
            .map(|block| RawBlock {
                id: block.id,
                start: block.start,
                end: block.end_addr(),
                label: block.label.as_ref().map(|l| l.to_string()),
                succs: block.succs.clone(),
                preds: Vec::new(),
                bytes: block.bytes.clone(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::InsnDecoder;

    const MINIMAL: &str = r#"{
        "name": "demo",
        "entry": 4096,
        "blocks": [
            { "id": 0, "start": 4096,
              "insns": [ { "itype": 16, "ops": [[0, 1]], "size": 2 },
                         { "itype": 7, "size": 3 } ],
              "succs": [1] },
            { "id": 1, "start": 4101,
              "insns": [ { "itype": 9, "size": 1 } ] }
        ]
    }"#;

    #[test]
    fn parses_and_derives_ends() {
        let listing = FunctionListing::parse(MINIMAL).map_err(|e| e.to_string());
        let listing = match listing {
            Ok(l) => l,
            Err(e) => panic!("parse failed: {e}"),
        };
        assert_eq!(listing.blocks[0].end_addr(), 4101);
        assert_eq!(listing.blocks[1].end_addr(), 4102);
    }

    #[test]
    fn decoder_serves_declared_instructions() {
        let Ok(listing) = FunctionListing::parse(MINIMAL) else {
            panic!("parse failed");
        };
        let decoder = listing.decoder();
        assert_eq!(decoder.decode(4096).map(|i| i.itype), Some(16));
        assert_eq!(decoder.decode(4098).map(|i| i.itype), Some(7));
        assert_eq!(decoder.decode(4101).map(|i| i.itype), Some(9));
        assert!(decoder.decode(4100).is_none());
    }

    #[test]
    fn unknown_successor_is_rejected() {
        let doc = r#"{ "entry": 0, "blocks": [
            { "id": 0, "start": 0, "insns": [{ "itype": 1, "size": 1 }], "succs": [9] }
        ] }"#;
        assert!(matches!(
            FunctionListing::parse(doc),
            Err(ListingError::UnknownBlock { from: 0, to: 9 })
        ));
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let doc = r#"{ "entry": 0, "blocks": [
            { "id": 3, "start": 0 }, { "id": 3, "start": 8 }
        ] }"#;
        assert!(matches!(
            FunctionListing::parse(doc),
            Err(ListingError::DuplicateBlock(3))
        ));
    }

    #[test]
    fn entry_outside_every_block_fails_build() {
        let Ok(listing) = FunctionListing::parse(MINIMAL) else {
            panic!("parse failed");
        };
        assert!(listing.build_cfg(4096).is_ok());
        assert!(matches!(
            listing.build_cfg(0x9999),
            Err(BuildError::NoFunctionAt(0x9999))
        ));
    }
}
