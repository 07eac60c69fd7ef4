use compact_str::CompactString;

use crate::fingerprint::FingerprintKind;

/// Fingerprint context attached to a basic block.
///
/// Computed in full when the block is inserted; the only later mutation is
/// the on-demand `freq_hash` binding during frequency matching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockContext {
    /// Raw bytes of the block, when the frontend provides them.
    pub bytes: Option<Vec<u8>>,
    /// Instruction-type sequence hash, 40 hex chars.
    pub hash_itype1: String,
    /// Prime-characteristic product hash, 40 hex chars.
    pub hash_itype2: String,
    /// Decoded instruction count.
    pub inst_count: u32,
    /// Synthetic fingerprint bound when a frequency match succeeds.
    pub freq_hash: Option<String>,
}

/// One basic block of a function's CFG.
#[derive(Debug, Clone, Default)]
pub struct BlockDef {
    /// Stable identifier within the function.
    pub id: u32,
    /// Start address (inclusive).
    pub start: u64,
    /// End address (exclusive). `start < end` for real blocks.
    pub end: u64,
    /// Display label.
    pub label: CompactString,
    /// Predecessor block ids.
    pub preds: Vec<u32>,
    /// Successor block ids.
    pub succs: Vec<u32>,
    /// Fingerprint context; absent only before insertion completes.
    pub ctx: Option<BlockContext>,
}

impl BlockDef {
    /// Byte size of the block.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.end - self.start
    }

    /// Whether `addr` falls inside the block.
    #[must_use]
    pub const fn contains(&self, addr: u64) -> bool {
        self.start <= addr && addr < self.end
    }

    /// The block's fingerprint of the given kind, when available.
    ///
    /// `Freq` resolves to the synthetic hash bound by a prior frequency
    /// match; it is absent until then.
    #[must_use]
    pub fn fingerprint(&self, kind: FingerprintKind) -> Option<&str> {
        let ctx = self.ctx.as_ref()?;
        match kind {
            FingerprintKind::Itype1 => Some(&ctx.hash_itype1),
            FingerprintKind::Itype2 => Some(&ctx.hash_itype2),
            FingerprintKind::Freq => ctx.freq_hash.as_deref(),
        }
    }
}
