use std::collections::BTreeMap;
use std::fmt::Write as _;

use num_bigint::BigUint;
use sha1::{Digest, Sha1};

use crate::decode::{DecodedInsn, InsnDecoder, InsnWalker, OPERAND_KIND_LAST};
use crate::fingerprint::BlockFrequency;
use crate::primes::{PrimeTable, OPERAND_PRIME_OFFSET};

/// SHA-1 of `data` as a 40-character lowercase hex string.
#[must_use]
pub fn sha1_hex(data: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(data);
    let digest = hasher.finalize();
    let mut out = String::with_capacity(40);
    for byte in digest {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// Multiplicative characteristic of one instruction.
///
/// The instruction type and every present `(operand index, operand kind)`
/// pair each contribute a distinct prime; the product identifies the
/// attribute tuple. Computed in `BigUint` so products never wrap.
///
/// The prime pool must cover every itype the decoder can produce.
#[must_use]
pub fn prime_characteristic(insn: &DecodedInsn, primes: &PrimeTable) -> BigUint {
    let mut r = BigUint::from(primes[insn.itype as usize]);
    for op in &insn.operands {
        let slot = OPERAND_PRIME_OFFSET
            + usize::from(op.index) * OPERAND_KIND_LAST
            + usize::from(op.kind);
        r *= primes[slot];
    }
    r
}

/// Hash a block based on its instruction-type sequence.
#[must_use]
pub fn hash_itype1(decoder: &dyn InsnDecoder, start: u64, end: u64) -> String {
    let mut buf = String::new();
    for insn in InsnWalker::new(decoder, start, end) {
        let _ = write!(buf, "{}", insn.itype);
    }
    sha1_hex(buf.as_bytes())
}

/// Hash a block based on its accumulated prime characteristics.
///
/// The accumulator starts at 1, so an empty or undecodable block hashes the
/// string `"1"`.
#[must_use]
pub fn hash_itype2(decoder: &dyn InsnDecoder, primes: &PrimeTable, start: u64, end: u64) -> String {
    let mut r = BigUint::from(1u32);
    for insn in InsnWalker::new(decoder, start, end) {
        r *= prime_characteristic(&insn, primes);
    }
    sha1_hex(r.to_str_radix(10).as_bytes())
}

/// Instruction count and characteristic-frequency histogram of a block.
#[must_use]
pub fn block_frequency(
    decoder: &dyn InsnDecoder,
    primes: &PrimeTable,
    start: u64,
    end: u64,
) -> BlockFrequency {
    let mut histogram: BTreeMap<BigUint, u32> = BTreeMap::new();
    let mut total = 0u32;
    for insn in InsnWalker::new(decoder, start, end) {
        let r = prime_characteristic(&insn, primes);
        *histogram.entry(r).or_insert(0) += 1;
        total += 1;
    }
    BlockFrequency { total, histogram }
}

/// Number of decodable instructions in `[start, end)`.
#[must_use]
pub fn instruction_count(decoder: &dyn InsnDecoder, start: u64, end: u64) -> u32 {
    u32::try_from(InsnWalker::new(decoder, start, end).count()).unwrap_or(u32::MAX)
}

/// Synthetic fingerprint bound to a pair of blocks matched by frequency:
/// SHA-1 of the ascending common histogram keys, decimal, comma-joined.
#[must_use]
pub fn intersection_fingerprint(a: &BlockFrequency, b: &BlockFrequency) -> String {
    let mut joined = String::new();
    for key in a.histogram.keys() {
        if !b.histogram.contains_key(key) {
            continue;
        }
        if !joined.is_empty() {
            joined.push(',');
        }
        let _ = write!(joined, "{}", key.to_str_radix(10));
    }
    sha1_hex(joined.as_bytes())
}
