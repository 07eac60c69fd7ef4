//! Prime number pool used to build multiplicative instruction fingerprints.
//!
//! Every small integer attribute of an instruction (its type code, and each
//! `(operand index, operand kind)` pair) is mapped to a distinct prime, so a
//! product of those primes uniquely identifies the attribute multiset.

use std::ops::Index;
use std::sync::OnceLock;

use crate::decode::{MAX_OPERANDS, OPERAND_KIND_LAST};

/// Total number of primes in the default pool. Large enough to cover the
/// instruction-type space of common disassembler backends.
pub const MAX_PRIMES: usize = 8_117;

/// Offset into the pool where operand primes start.
///
/// The tail of the pool reserves one prime per `(operand index, operand kind)`
/// slot: `MAX_OPERANDS` indices times `OPERAND_KIND_LAST + 1` kinds.
pub const OPERAND_PRIME_OFFSET: usize = MAX_PRIMES - MAX_OPERANDS * (OPERAND_KIND_LAST + 1);

/// An immutable, indexable pool of the first `n` primes.
#[derive(Debug, Clone)]
pub struct PrimeTable {
    primes: Vec<u64>,
}

impl PrimeTable {
    /// Sieve the first `count` primes.
    #[must_use]
    pub fn with_count(count: usize) -> Self {
        Self {
            primes: sieve_first(count),
        }
    }

    /// Number of primes in the pool.
    #[must_use]
    pub fn len(&self) -> usize {
        self.primes.len()
    }

    /// Whether the pool is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primes.is_empty()
    }

    /// The `idx`-th prime, or `None` past the end of the pool.
    #[must_use]
    pub fn get(&self, idx: usize) -> Option<u64> {
        self.primes.get(idx).copied()
    }
}

impl Index<usize> for PrimeTable {
    type Output = u64;

    fn index(&self, idx: usize) -> &u64 {
        &self.primes[idx]
    }
}

/// Process-wide pool of [`MAX_PRIMES`] primes, built on first use.
///
/// The table is immutable and freely shared between matcher instances.
pub fn shared_primes() -> &'static PrimeTable {
    static PRIMES: OnceLock<PrimeTable> = OnceLock::new();
    PRIMES.get_or_init(|| PrimeTable::with_count(MAX_PRIMES))
}

/// Sieve of Eratosthenes sized from the upper bound on the n-th prime:
/// `n (ln n + ln ln n)` for `n >= 6`.
fn sieve_first(count: usize) -> Vec<u64> {
    if count == 0 {
        return Vec::new();
    }
    let n = count.max(6) as f64;
    let bound = (n * (n.ln() + n.ln().ln())).ceil() as usize + 16;

    let mut composite = vec![false; bound + 1];
    let mut primes = Vec::with_capacity(count);
    for candidate in 2..=bound {
        if composite[candidate] {
            continue;
        }
        primes.push(candidate as u64);
        if primes.len() == count {
            break;
        }
        let mut multiple = candidate * candidate;
        while multiple <= bound {
            composite[multiple] = true;
            multiple += candidate;
        }
    }
    primes
}
