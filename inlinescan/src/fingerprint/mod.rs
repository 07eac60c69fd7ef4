//! Basic-block fingerprinting.
//!
//! Three progressively looser similarity measures over a block's byte range:
//!
//! - `itype1`: SHA-1 over the instruction-type sequence. Order-preserving.
//! - `itype2`: SHA-1 over the product of per-instruction prime
//!   characteristics. Considers operand slots and kinds as well, so it is
//!   more discriminating than `itype1`.
//! - `freq`: instruction count plus a histogram keyed by prime
//!   characteristic. Order-insensitive; the fuzzy fallback.
//!
//! A decode failure inside a block truncates the traversal; fingerprints
//! cover the prefix actually decoded and no error is raised.

mod freq;
mod hashes;

pub use freq::{coverage_threshold, match_block_frequencies, BlockFrequency};
pub use hashes::{
    block_frequency, hash_itype1, hash_itype2, instruction_count, intersection_fingerprint,
    prime_characteristic, sha1_hex,
};

/// Which fingerprint to compare two blocks by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FingerprintKind {
    /// Instruction-type sequence hash.
    Itype1,
    /// Prime-characteristic product hash.
    Itype2,
    /// Frequency-histogram similarity with a synthetic bound hash.
    Freq,
}

impl FingerprintKind {
    /// Short name for diagnostics.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Itype1 => "itype1",
            Self::Itype2 => "itype2",
            Self::Freq => "freq",
        }
    }
}

#[cfg(test)]
mod tests;
